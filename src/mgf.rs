//! Mask generation: MGF1 over SHA-1/SHA-256, and the MGF-TP-1 conversion
//! between byte streams and balanced-ternary trinomials.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::Error;
use crate::poly::Polynomial;
use crate::source::ByteSource;

/// Hash function a parameter set runs its MGF1/IGF expansions through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
        }
    }

    fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => {
                let mut h = Sha1::new();
                for part in parts {
                    h.update(part);
                }
                h.finalize().to_vec()
            }
            HashAlgorithm::Sha256 => {
                let mut h = Sha256::new();
                for part in parts {
                    h.update(part);
                }
                h.finalize().to_vec()
            }
        }
    }
}

/// MGF1: expands a seed into an unbounded byte stream by hashing the seed
/// with a big-endian 32-bit block counter.
///
/// `min_calls` hash blocks are produced eagerly; further blocks are
/// appended on demand, so an MGF1 never exhausts. Seed material and the
/// expanded stream are wiped on drop.
pub struct Mgf1 {
    hash: HashAlgorithm,
    seed: Vec<u8>,
    counter: u32,
    buf: Vec<u8>,
    pos: usize,
}

impl Mgf1 {
    /// When `hash_seed` is set the seed is hashed once before expansion;
    /// every use in this crate does so, per X9.92.
    pub fn new(hash: HashAlgorithm, min_calls: usize, hash_seed: bool, seed: &[u8]) -> Self {
        let seed = if hash_seed {
            hash.digest(&[seed])
        } else {
            seed.to_vec()
        };
        let mut mgf = Mgf1 {
            hash,
            seed,
            counter: 0,
            buf: Vec::with_capacity(min_calls * hash.output_len()),
            pos: 0,
        };
        for _ in 0..min_calls {
            mgf.next_block();
        }
        mgf
    }

    fn next_block(&mut self) {
        let block = self.hash.digest(&[&self.seed, &self.counter.to_be_bytes()]);
        self.buf.extend_from_slice(&block);
        self.counter += 1;
    }
}

impl ByteSource for Mgf1 {
    fn next_byte(&mut self) -> Result<u8, Error> {
        if self.pos == self.buf.len() {
            self.next_block();
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(b)
    }
}

impl Drop for Mgf1 {
    fn drop(&mut self) {
        self.seed.zeroize();
        self.buf.zeroize();
    }
}

/// MGF-TP-1: builds a trinomial of degree < n from a byte stream. Each
/// byte below 243 is decomposed into five base-3 digits (243 = 3^5);
/// larger bytes are rejected and redrawn so the trits stay uniform. The
/// final group is truncated to exactly n trits, and digit 2 is renormalized
/// to -1.
pub fn gen_trinomial<S: ByteSource>(n: usize, source: &mut S) -> Result<Polynomial, Error> {
    let mut p = Polynomial::new(n);

    let mut i = 0;
    while i < n {
        let mut o = source.next_byte()?;
        if o >= 243 {
            continue;
        }
        for j in 0..5 {
            let t = o % 3;
            p.coeffs[i + j] = t as i16;
            o = (o - t) / 3;
            if i + j + 1 == n {
                break;
            }
        }
        i += 5;
    }

    // Renormalize from {0,1,2} to {-1,0,1}.
    for c in p.coeffs.iter_mut() {
        if *c == 2 {
            *c = -1;
        }
    }
    Ok(p)
}

/// The inverse of [`gen_trinomial`]: packs five trits per byte, least
/// significant digit first. Every byte produced is below 243, so decoding
/// never hits the rejection path.
pub fn encode_trinomial(p: &Polynomial, out: &mut Vec<u8>) {
    let recenter = |t: i16| -> u8 {
        if t == -1 {
            2
        } else {
            t as u8
        }
    };

    let n = p.coeffs.len();
    let mut end = 5;
    while end <= n {
        let mut accum = recenter(p.coeffs[end - 1]);
        accum = 3 * accum + recenter(p.coeffs[end - 2]);
        accum = 3 * accum + recenter(p.coeffs[end - 3]);
        accum = 3 * accum + recenter(p.coeffs[end - 4]);
        accum = 3 * accum + recenter(p.coeffs[end - 5]);
        out.push(accum);
        end += 5;
    }

    let rem_start = n - (n % 5);
    if rem_start < n {
        let mut i = n - 1;
        let mut accum = recenter(p.coeffs[i]);
        while rem_start < i {
            i -= 1;
            accum = 3 * accum + recenter(p.coeffs[i]);
        }
        out.push(accum);
    }
}

/// Packed size of a trinomial of degree < n, five trits per byte.
pub fn encoded_length(n: usize) -> usize {
    (n + 4) / 5
}
