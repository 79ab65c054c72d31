use ntru_encrypt::params::{
    EES1087EP2, EES1171EP1, EES401EP1, EES449EP1, EES659EP1, EES677EP1,
};
use ntru_encrypt::source::RngSource;
use ntru_encrypt::{decrypt, encrypt, generate_key, Error, PrivateKey, PublicKey};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn test_source(seed: u64) -> RngSource<ChaCha20Rng> {
    RngSource::new(ChaCha20Rng::seed_from_u64(seed))
}

#[test]
fn roundtrip_ees401ep1() {
    let mut src = test_source(0x401);
    let key = generate_key(&mut src, &EES401EP1).unwrap();
    let msg = b"the quick brown fox jumps over the lazy dog";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_ees659ep1() {
    let mut src = test_source(0x659);
    let key = generate_key(&mut src, &EES659EP1).unwrap();
    let msg = b"sparse private keys use the listed encoding";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_ees449ep1() {
    let mut src = test_source(0x449);
    let key = generate_key(&mut src, &EES449EP1).unwrap();
    let msg = b"nine-bit index generation";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_ees677ep1() {
    let mut src = test_source(0x677);
    let key = generate_key(&mut src, &EES677EP1).unwrap();
    let msg = b"mid-size sha-256 parameter set";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_ees1087ep2() {
    let mut src = test_source(0x1087);
    let key = generate_key(&mut src, &EES1087EP2).unwrap();
    let msg = b"block-exact message envelope";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_ees1171ep1() {
    let mut src = test_source(0x1171);
    let key = generate_key(&mut src, &EES1171EP1).unwrap();
    let msg = b"sha-256 parameter set";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn roundtrip_boundary_message_lengths() {
    let mut src = test_source(7);
    let key = generate_key(&mut src, &EES401EP1).unwrap();

    let empty: &[u8] = &[];
    let ct = encrypt(&mut src, key.public_key(), empty).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), empty);

    let longest = vec![0xa5u8; EES401EP1.max_msg_len_bytes];
    let ct = encrypt(&mut src, key.public_key(), &longest).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), longest);

    let too_long = vec![0u8; EES401EP1.max_msg_len_bytes + 1];
    assert_eq!(
        encrypt(&mut src, key.public_key(), &too_long),
        Err(Error::MessageTooLong)
    );
}

#[test]
fn encryption_is_randomized() {
    let mut src = test_source(8);
    let key = generate_key(&mut src, &EES401EP1).unwrap();
    let msg = b"same plaintext, fresh randomness";
    let a = encrypt(&mut src, key.public_key(), msg).unwrap();
    let b = encrypt(&mut src, key.public_key(), msg).unwrap();
    assert_ne!(a, b);
    assert_eq!(decrypt(&key, &a).unwrap(), msg);
    assert_eq!(decrypt(&key, &b).unwrap(), msg);
}

#[test]
fn tampered_ciphertext_fails_generically() {
    let mut src = test_source(9);
    let key = generate_key(&mut src, &EES401EP1).unwrap();
    let msg = b"integrity matters";
    let ct = encrypt(&mut src, key.public_key(), msg).unwrap();

    // Flip one bit at a random position per trial; at least 99% of the
    // tampered ciphertexts must be rejected.
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    let trials = 200;
    let mut rejected = 0;
    for _ in 0..trials {
        let mut bad = ct.clone();
        let bit = rng.gen_range(0..bad.len() * 8);
        bad[bit / 8] ^= 1 << (bit % 8);
        if decrypt(&key, &bad) == Err(Error::DecryptionFailure) {
            rejected += 1;
        }
    }
    assert!(rejected * 100 >= trials * 99);

    assert_eq!(
        decrypt(&key, &ct[..ct.len() - 1]),
        Err(Error::DecryptionFailure)
    );
}

#[test]
fn public_key_blob_roundtrip() {
    let mut src = test_source(10);
    let key = generate_key(&mut src, &EES401EP1).unwrap();
    let blob = key.public_key().bytes();
    assert_eq!(blob.len(), key.public_key().size());

    let decoded = PublicKey::from_bytes(&blob).unwrap();
    assert_eq!(decoded.bytes(), blob);

    // A key decoded from its blob encrypts for the original private key.
    let msg = b"blob transported public key";
    let ct = encrypt(&mut src, &decoded, msg).unwrap();
    assert_eq!(decrypt(&key, &ct).unwrap(), msg);
}

#[test]
fn private_key_blob_roundtrip_packed_encoding() -> anyhow::Result<()> {
    // ees401ep1 has a dense F, stored five trits per byte.
    let mut src = test_source(11);
    let key = generate_key(&mut src, &EES401EP1)?;
    let blob = key.bytes();
    assert_eq!(blob.len(), key.size());

    let decoded = PrivateKey::from_bytes(&blob)?;
    assert_eq!(decoded.public_key().bytes(), key.public_key().bytes());
    assert_eq!(decoded.bytes(), blob);

    let msg = b"restored from packed blob";
    let ct = encrypt(&mut src, key.public_key(), msg)?;
    assert_eq!(decrypt(&decoded, &ct)?, msg);
    Ok(())
}

#[test]
fn private_key_blob_roundtrip_listed_encoding() -> anyhow::Result<()> {
    // ees659ep1 has a sparse F, stored as bit-packed index lists.
    let mut src = test_source(12);
    let key = generate_key(&mut src, &EES659EP1)?;
    let blob = key.bytes();
    assert_eq!(blob.len(), key.size());

    let decoded = PrivateKey::from_bytes(&blob)?;
    assert_eq!(decoded.public_key().bytes(), key.public_key().bytes());

    let msg = b"restored from listed blob";
    let ct = encrypt(&mut src, key.public_key(), msg)?;
    assert_eq!(decrypt(&decoded, &ct)?, msg);
    Ok(())
}

#[test]
fn truncated_blobs_are_rejected() {
    let mut src = test_source(13);
    let key = generate_key(&mut src, &EES401EP1).unwrap();

    let pub_blob = key.public_key().bytes();
    assert!(matches!(
        PublicKey::from_bytes(&pub_blob[..pub_blob.len() - 1]),
        Err(Error::MalformedBlob(_))
    ));

    let priv_blob = key.bytes();
    assert!(matches!(
        PrivateKey::from_bytes(&priv_blob[..priv_blob.len() - 1]),
        Err(Error::MalformedBlob(_))
    ));

    // A private blob is never a valid public blob and vice versa.
    assert!(PublicKey::from_bytes(&priv_blob).is_err());
    assert!(PrivateKey::from_bytes(&pub_blob).is_err());
}
