//! NTRUEncrypt, the lattice-based public-key cryptosystem of IEEE 1363.1 /
//! X9.92, over the truncated polynomial ring Z[X]/(X^N - 1).
//!
//! The crate provides the three protocol operations ([`generate_key`],
//! [`encrypt`], [`decrypt`]) over the standard EESS #1 parameter sets,
//! plus the binary blob formats for keys and ciphertexts. Randomness comes
//! in through the [`source::ByteSource`] trait; any [`rand::RngCore`] can
//! be adapted with [`source::RngSource`].
//!
//! Secret-bearing buffers (private keys, sampled trinomials, formatted
//! messages) are zeroized when they go out of scope.

pub mod bitpack;
pub mod bpgm3;
pub mod convert;
pub mod error;
pub mod igf;
pub mod inverse;
pub mod mgf;
pub mod params;
pub mod poly;
pub mod source;

use zeroize::Zeroize;

pub use error::Error;
pub use params::KeyParams;
pub use poly::Polynomial;

use igf::Igf2;
use inverse::InverterModPowerOfPrime;
use mgf::Mgf1;
use params::param_from_oid;
use poly::convolution_mod;
use source::{ByteSource, SliceSource};

const BLOB_HEADER_LEN: usize = 4;
const BLOB_PUBLIC_KEY_V1: u8 = 1;
const BLOB_PRIVATE_KEY_DEFAULT_V1: u8 = 2;

/// An NTRUEncrypt public key: the parameter set and H = p * g * f^-1 mod q.
#[derive(Debug, Clone)]
pub struct PublicKey {
    pub params: &'static KeyParams,
    h: Polynomial,
}

impl PublicKey {
    pub fn h(&self) -> &Polynomial {
        &self.h
    }

    /// Length of the binary representation of this key.
    pub fn size(&self) -> usize {
        BLOB_HEADER_LEN + bitpack::packed_length(self.params.n, self.params.q as usize)
    }

    /// Binary representation: tag | OID | bit-packed H.
    pub fn bytes(&self) -> Vec<u8> {
        let mut ret = vec![0u8; self.size()];
        ret[0] = BLOB_PUBLIC_KEY_V1;
        ret[1..4].copy_from_slice(&self.params.oid_bytes);
        bitpack::pack(
            self.params.n,
            self.params.q as usize,
            &self.h.coeffs,
            &mut ret[BLOB_HEADER_LEN..],
        );
        ret
    }

    /// Decodes a public key from its binary representation.
    pub fn from_bytes(raw: &[u8]) -> Result<PublicKey, Error> {
        if raw.len() < BLOB_HEADER_LEN {
            return Err(Error::MalformedBlob("public key"));
        }
        if raw[0] != BLOB_PUBLIC_KEY_V1 {
            return Err(Error::MalformedBlob("public key"));
        }
        let params = param_from_oid(&raw[1..4]).ok_or(Error::UnsupportedParameterSet)?;

        let packed_h_len = bitpack::packed_length(params.n, params.q as usize);
        if BLOB_HEADER_LEN + packed_h_len != raw.len() {
            return Err(Error::MalformedBlob("public key"));
        }

        let mut h = Polynomial::new(params.n);
        bitpack::unpack(
            params.n,
            params.q as usize,
            &raw[BLOB_HEADER_LEN..],
            &mut h.coeffs,
        );
        Ok(PublicKey { params, h })
    }

    /// Formats a plaintext into M = b | len | msg | p0. The whole buffer is
    /// drawn from the source first, so the Db-bit prefix b stays random.
    fn generate_m<S: ByteSource>(&self, msg: &[u8], source: &mut S) -> Result<Vec<u8>, Error> {
        let db = self.params.db >> 3;
        let llen = self.params.llen;
        let mut m = vec![0u8; self.params.formatted_msg_len()];
        source.read_exact(&mut m)?;

        let mut l = msg.len();
        for i in (0..llen).rev() {
            m[db + i] = (l & 0xff) as u8;
            l >>= 8;
        }
        m[db + llen..db + llen + msg.len()].copy_from_slice(msg);
        for b in m[db + llen + msg.len()..].iter_mut() {
            *b = 0;
        }
        Ok(m)
    }

    /// Forms sData = OID | m | b | hTrunc, the deterministic seed that
    /// binds the blinding polynomial r to the plaintext and this key.
    fn form_s_data(&self, m: &[u8], b: &[u8]) -> Vec<u8> {
        let b_len = self.params.db >> 3;
        let h_len = self.params.pk_len >> 3;

        let mut s_data = Vec::with_capacity(3 + m.len() + b_len + h_len);
        s_data.extend_from_slice(&self.params.oid_bytes);
        s_data.extend_from_slice(m);
        s_data.extend_from_slice(&b[..b_len]);

        let offset = s_data.len();
        s_data.resize(offset + h_len, 0);
        bitpack::pack_n(
            self.params.n,
            self.params.q as usize,
            h_len,
            &self.h.coeffs,
            &mut s_data[offset..],
        );
        s_data
    }

    /// Derives the masking trinomial from R: MGF-TP-1 over an MGF1 seeded
    /// with R mod 4, packed two bits per coefficient.
    fn calc_encryption_mask(&self, r: &Polynomial) -> Result<Polynomial, Error> {
        let r4 = r.mod4_packed();
        let mut mgf = Mgf1::new(self.params.hash, self.params.min_calls_mask, true, &r4);
        mgf::gen_trinomial(self.params.n, &mut mgf)
    }
}

/// An NTRUEncrypt private key. The stored polynomial is f = 1 + p*F; the
/// sparse trinomial F is recovered on demand for serialization. Dropping
/// the key wipes it.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    public: PublicKey,
    f: Polynomial,
}

impl PrivateKey {
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn params(&self) -> &'static KeyParams {
        self.public.params
    }

    /// Size of F in the packed encoding, five trits per byte.
    fn packed_size(&self) -> usize {
        mgf::encoded_length(self.f.coeffs.len())
    }

    /// Size of F in the listed encoding, 2*Df bit-packed indices.
    fn listed_size(&self) -> usize {
        let params = self.public.params;
        bitpack::listed_length(params.df, params.df, params.n)
    }

    /// Length of the binary representation of this key.
    pub fn size(&self) -> usize {
        self.public.size() + self.packed_size().min(self.listed_size())
    }

    /// Binary representation: tag | OID | bit-packed H | F, where F uses
    /// whichever of the packed and listed encodings is smaller.
    pub fn bytes(&self) -> Vec<u8> {
        let params = self.public.params;
        let mut ret = vec![0u8; self.size()];
        ret[0] = BLOB_PRIVATE_KEY_DEFAULT_V1;
        ret[1..4].copy_from_slice(&params.oid_bytes);
        let mut f_off = BLOB_HEADER_LEN;
        f_off += bitpack::pack(
            params.n,
            params.q as usize,
            &self.public.h.coeffs,
            &mut ret[f_off..],
        );

        let big_f = self.recover_f();
        if self.packed_size() < self.listed_size() {
            let mut buf = Vec::with_capacity(self.packed_size());
            mgf::encode_trinomial(&big_f, &mut buf);
            ret[f_off..f_off + buf.len()].copy_from_slice(&buf);
            buf.zeroize();
        } else {
            bitpack::pack_listed_coefficients(&big_f, params.df, params.df, &mut ret[f_off..]);
        }
        ret
    }

    /// Decodes a private key from its binary representation and recomputes
    /// f = 1 + p*F.
    pub fn from_bytes(raw: &[u8]) -> Result<PrivateKey, Error> {
        if raw.len() < BLOB_HEADER_LEN {
            return Err(Error::MalformedBlob("private key"));
        }
        if raw[0] != BLOB_PRIVATE_KEY_DEFAULT_V1 {
            return Err(Error::MalformedBlob("private key"));
        }
        let params = param_from_oid(&raw[1..4]).ok_or(Error::UnsupportedParameterSet)?;

        let packed_h_len = bitpack::packed_length(params.n, params.q as usize);
        let packed_f_len = mgf::encoded_length(params.n);
        let listed_f_len = bitpack::listed_length(params.df, params.df, params.n);
        let exp_len = BLOB_HEADER_LEN + packed_h_len + packed_f_len.min(listed_f_len);
        if exp_len != raw.len() {
            return Err(Error::MalformedBlob("private key"));
        }

        let mut h = Polynomial::new(params.n);
        let f_off = BLOB_HEADER_LEN
            + bitpack::unpack(
                params.n,
                params.q as usize,
                &raw[BLOB_HEADER_LEN..],
                &mut h.coeffs,
            );

        let mut big_f = if packed_f_len < listed_f_len {
            let mut src = SliceSource::new(&raw[f_off..]);
            mgf::gen_trinomial(params.n, &mut src)
                .map_err(|_| Error::MalformedBlob("private key"))?
        } else {
            let mut f = Polynomial::new(params.n);
            bitpack::unpack_listed_coefficients(
                &mut f,
                params.n,
                params.df,
                params.df,
                &raw[f_off..],
            )
            .ok_or(Error::MalformedBlob("private key"))?;
            f
        };

        for c in big_f.coeffs.iter_mut() {
            *c = (params.p * *c) & 0x0fff;
        }
        big_f.coeffs[0] += 1;

        Ok(PrivateKey {
            public: PublicKey { params, h },
            f: big_f,
        })
    }

    /// Recovers F = (f - 1) / p from the stored f, truncating each
    /// coefficient to its low byte first to undo the 12-bit mask.
    fn recover_f(&self) -> Polynomial {
        let p = self.public.params.p as i8;
        let mut big_f = Polynomial::new(self.f.coeffs.len());
        big_f.coeffs[0] = ((self.f.coeffs[0].wrapping_sub(1) as u8 as i8) / p) as i16;
        for i in 1..big_f.coeffs.len() {
            big_f.coeffs[i] = ((self.f.coeffs[i] as u8 as i8) / p) as i16;
        }
        big_f
    }

    /// Reads the declared message length out of a formatted message.
    fn parse_msg_length(&self, m: &[u8]) -> i32 {
        let params = self.public.params;
        let db = params.db >> 3;
        if m.len() < db + params.llen {
            return -1;
        }
        let mut l: i32 = 0;
        for i in db..db + params.llen {
            l = (l << 8) | m[i] as i32;
        }
        l
    }

    /// Validates the b | len | msg | p0 envelope. Every check runs; the
    /// result is `None` when any of them failed.
    fn verify_m_format(&self, m: &[u8]) -> Option<usize> {
        let params = self.public.params;
        let db = params.db >> 3;
        let mut ok = true;

        if m.len() != params.formatted_msg_len() {
            ok = false;
        }

        let mut m_len = self.parse_msg_length(m);
        if m_len < 0 || m_len as usize > params.max_msg_len_bytes {
            // Keep a usable length so the caller's remaining steps stay
            // well-defined; the failure is reported through `ok`.
            m_len = 1;
            ok = false;
        }

        for i in db + params.llen + m_len as usize..m.len() {
            ok &= m[i] == 0;
        }

        if ok {
            Some(m_len as usize)
        } else {
            None
        }
    }
}

/// Generates a private key for the given parameter set, drawing all
/// randomness from `source`.
///
/// Both trinomials are resampled until invertible; inversion failure is
/// expected and handled, never surfaced. Source exhaustion is fatal.
pub fn generate_key<S: ByteSource>(
    source: &mut S,
    params: &'static KeyParams,
) -> Result<PrivateKey, Error> {
    let inverter = InverterModPowerOfPrime::new(params.q, 2, vec![0, 1]);
    let mut igf = Igf2::from_source(params.n, params.c, source);

    // Trinomial g, 1s = Dg+1, -1s = Dg, kept only if invertible mod q.
    let g = loop {
        let g = bpgm3::gen_trinomial(params.n, params.dg + 1, params.dg, &mut igf)?;
        if inverter.invert(&g).is_some() {
            break g;
        }
    };

    // Trinomial F with f = 1 + p*F, resampled until f is invertible mod q.
    let (f, f_inv) = loop {
        let big_f = bpgm3::gen_trinomial(params.n, params.df, params.df, &mut igf)?;
        let mut f = Polynomial::new(params.n);
        for i in 0..params.n {
            f.coeffs[i] = (params.p * big_f.coeffs[i]) & 0x0fff;
        }
        f.coeffs[0] += 1;
        if let Some(f_inv) = inverter.invert(&f) {
            break (f, f_inv);
        }
    };

    // h = f^-1 * g * p mod q. f_inv and the raw F are wiped on drop.
    let mut h = convolution_mod(&f_inv, &g, params.q as i32);
    for c in h.coeffs.iter_mut() {
        let mut v = (*c as i32 * params.p as i32) % params.q as i32;
        if v < 0 {
            v += params.q as i32;
        }
        *c = v as i16;
    }

    Ok(PrivateKey {
        public: PublicKey { params, h },
        f,
    })
}

/// Encrypts a plaintext under a public key. The blinding polynomial r is
/// derived deterministically from sData; `source` only feeds the random
/// prefix of the formatted message. Candidate messages failing the Dm0
/// count are discarded and reformatted with fresh randomness.
pub fn encrypt<S: ByteSource>(
    source: &mut S,
    pub_key: &PublicKey,
    msg: &[u8],
) -> Result<Vec<u8>, Error> {
    let params = pub_key.params;
    if pub_key.h.coeffs.len() != params.n {
        return Err(Error::InvalidKey);
    }
    if msg.len() > params.max_msg_len_bytes {
        return Err(Error::MessageTooLong);
    }

    let (big_r, m_prime) = loop {
        // M = b | len | msg | p0, then its trinomial form.
        let mut m = pub_key.generate_m(msg, source)?;
        let mut tri = convert::binary_to_trinary(params.n, &m);
        let m_trin = Polynomial::from_coeffs(&tri);
        tri.zeroize();

        // r is bound to the plaintext and the key through sData.
        let mut s_data = pub_key.form_s_data(msg, &m);
        m.zeroize();
        let mut igf = Igf2::new(params.n, params.c, params.hash, params.min_calls_r, &s_data);
        s_data.zeroize();
        let r = bpgm3::gen_trinomial(params.n, params.dr, params.dr, &mut igf)?;

        // R = r * h mod q, and the mask it seeds.
        let big_r = convolution_mod(&r, &pub_key.h, params.q as i32);
        let mask = pub_key.calc_encryption_mask(&big_r)?;

        // m' = M + mask (mod p).
        let m_prime = m_trin.add_and_recenter(&mask, params.p as i32, -1);
        if m_prime.meets_dm0(params.dm0) {
            break (big_r, m_prime);
        }
    };

    // e = R + m' (mod q), bit-packed.
    let e = big_r.add(&m_prime, params.q as i32);
    let mut out = vec![0u8; bitpack::packed_length(params.n, params.q as usize)];
    bitpack::pack(params.n, params.q as usize, &e.coeffs, &mut out);
    Ok(out)
}

/// Decrypts a ciphertext. The Dm0 count, the message format check and the
/// R-consistency check are all evaluated unconditionally; any failure is
/// reported as the single generic [`Error::DecryptionFailure`] only after
/// every step has run.
pub fn decrypt(priv_key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    let params = priv_key.public.params;
    if priv_key.f.coeffs.len() != params.n || priv_key.public.h.coeffs.len() != params.n {
        return Err(Error::InvalidKey);
    }
    if ciphertext.len() != bitpack::packed_length(params.n, params.q as usize) {
        return Err(Error::DecryptionFailure);
    }

    let mut fail = false;

    let mut e = Polynomial::new(params.n);
    let consumed = bitpack::unpack(params.n, params.q as usize, ciphertext, &mut e.coeffs);
    if consumed != ciphertext.len() {
        return Err(Error::DecryptionFailure);
    }

    // a = f * e mod q, recentered into [-q/2, q/2), then reduced mod p
    // into {-1, 0, 1}: the message candidate.
    let mut ci = convolution_mod(&priv_key.f, &e, params.q as i32);
    for c in ci.coeffs.iter_mut() {
        if *c >= params.q / 2 {
            *c -= params.q;
        }
    }
    for c in ci.coeffs.iter_mut() {
        *c = match *c % params.p {
            2 => -1,
            -2 => 1,
            v => v,
        };
    }

    if !ci.meets_dm0(params.dm0) {
        fail = true;
    }

    // Candidate for R = r*h: cR = e - ci.
    let c_r = e.subtract(&ci, params.q as i32);

    // Undo the mask and recover the formatted message bytes.
    let mask = priv_key.public.calc_encryption_mask(&c_r)?;
    let c_m_trin = ci.subtract_and_recenter(&mask, params.p as i32, -1);
    let mut c_m = convert::trinary_to_binary(&c_m_trin.coeffs, params.formatted_msg_len());

    let m_offset = params.db / 8 + params.llen;
    let m_len = match priv_key.verify_m_format(&c_m) {
        Some(l) => l,
        None => {
            fail = true;
            1
        }
    };

    // Rederive r from the candidate message and check R's consistency.
    let mut s_data = priv_key
        .public
        .form_s_data(&c_m[m_offset..m_offset + m_len], &c_m);
    let mut igf = Igf2::new(params.n, params.c, params.hash, params.min_calls_r, &s_data);
    s_data.zeroize();
    let cr_trin = match bpgm3::gen_trinomial(params.n, params.dr, params.dr, &mut igf) {
        Ok(p) => p,
        Err(_) => {
            fail = true;
            Polynomial::new(params.n)
        }
    };

    let c_r_prime = convolution_mod(&cr_trin, &priv_key.public.h, params.q as i32);
    if !c_r.equals(&c_r_prime) {
        fail = true;
    }

    if fail {
        c_m.zeroize();
        return Err(Error::DecryptionFailure);
    }

    let out = c_m[m_offset..m_offset + m_len].to_vec();
    c_m.zeroize();
    Ok(out)
}
