//! IGF2, the index generation function of X9.92.
//!
//! Turns a byte stream into unbiased coefficient indices in [0, N) by
//! drawing fixed-width bit strings and rejecting candidates at or above
//! the largest multiple of N.

use crate::error::Error;
use crate::mgf::{HashAlgorithm, Mgf1};
use crate::source::ByteSource;

pub struct Igf2<S: ByteSource> {
    max_value: usize,
    bits_per_index: u32,
    leftover_bits: u32,
    num_leftover_bits: u32,
    cutoff: u32,
    source: S,
}

impl Igf2<Mgf1> {
    /// An IGF2 driven by an MGF1 expansion of `seed`.
    pub fn new(
        max_value: usize,
        bits_per_index: u32,
        hash: HashAlgorithm,
        min_calls: usize,
        seed: &[u8],
    ) -> Self {
        let mgf = Mgf1::new(hash, min_calls, true, seed);
        Igf2::from_source(max_value, bits_per_index, mgf)
    }
}

impl<S: ByteSource> Igf2<S> {
    /// An IGF2 driven by an arbitrary byte source, e.g. an RNG during key
    /// generation.
    pub fn from_source(max_value: usize, bits_per_index: u32, source: S) -> Self {
        let modulus = 1u32 << bits_per_index;
        Igf2 {
            max_value,
            bits_per_index,
            leftover_bits: 0,
            num_leftover_bits: 0,
            cutoff: modulus - (modulus % max_value as u32),
            source,
        }
    }

    /// The next unbiased index in [0, max_value). Source exhaustion is
    /// propagated, never retried.
    pub fn next_index(&mut self) -> Result<usize, Error> {
        loop {
            while self.num_leftover_bits < self.bits_per_index {
                self.leftover_bits <<= 8;
                self.leftover_bits |= self.source.next_byte()? as u32;
                self.num_leftover_bits += 8;
            }

            let shift = self.num_leftover_bits - self.bits_per_index;
            let ret = self.leftover_bits >> shift;
            self.num_leftover_bits = shift;
            self.leftover_bits &= (1u32 << shift) - 1;

            if ret < self.cutoff {
                return Ok(ret as usize % self.max_value);
            }
        }
    }
}
