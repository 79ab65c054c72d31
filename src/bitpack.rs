//! Packs arrays of bounded nonnegative integers into byte arrays at the
//! minimum bit width, plus the "listed coefficients" encoding that stores
//! a sparse trinomial as the positions of its nonzero coefficients.

use zeroize::Zeroize;

use crate::poly::Polynomial;

/// Minimum number of bits needed to represent `value`.
pub fn count_bits(value: usize) -> u32 {
    for i in 0..32 {
        if (1usize << i) > value {
            return i;
        }
    }
    32
}

/// Bytes produced by packing `num_elts` values in [0, max_elt_value).
pub fn packed_length(num_elts: usize, max_elt_value: usize) -> usize {
    let bits_per_element = count_bits(max_elt_value - 1) as usize;
    (num_elts * bits_per_element + 7) / 8
}

/// Bit-packs `num_elts` values from `src` into `tgt`, most significant
/// bits first. Returns the number of bytes written.
pub fn pack(num_elts: usize, max_elt_value: usize, src: &[i16], tgt: &mut [u8]) -> usize {
    pack_n(
        num_elts,
        max_elt_value,
        packed_length(num_elts, max_elt_value),
        src,
        tgt,
    )
}

/// As [`pack`], but stops after `max_out_len` bytes. Used to form the
/// truncated public-key prefix bound into sData.
pub fn pack_n(
    num_elts: usize,
    max_elt_value: usize,
    max_out_len: usize,
    src: &[i16],
    tgt: &mut [u8],
) -> usize {
    let bits_per_element = count_bits(max_elt_value - 1);

    let mut i = 0usize;
    let i_max = num_elts - 1;
    let mut j = 0usize;
    let j_max = max_out_len;

    let mut cur: u8 = 0;
    let mut next = src[i] as u32 & 0xffff;
    let mut cb = 0u32; // bits accumulated in cur
    let mut nb = bits_per_element; // bits of next not yet emitted

    while j < j_max && (i < i_max || cb + nb > 8) {
        if cb + nb < 8 {
            // next fits entirely beside cur without filling a byte.
            cur |= (next << (8 - cb - nb)) as u8;
            cb += nb;
            i += 1;
            next = src[i] as u32 & 0xffff;
            nb = bits_per_element;
        } else {
            // Emit one byte from cur plus the top bits of next.
            let shift = cb + nb - 8;
            tgt[j] = cur | (next >> shift) as u8;
            j += 1;
            cur = 0;
            cb = 0;
            next &= low_bit_mask(shift);
            nb = shift;
        }
    }
    if j < j_max {
        tgt[j] = (next << (8 - nb)) as u8;
        j += 1;
    }
    j
}

/// Unpacks `num_elts` bit-packed values into `tgt`. Returns the number of
/// source bytes consumed.
pub fn unpack(num_elts: usize, max_elt_value: usize, src: &[u8], tgt: &mut [i16]) -> usize {
    let bits_per_element = count_bits(max_elt_value - 1);
    let max_used = (num_elts * bits_per_element as usize + 7) / 8;

    let mut i = 0usize;
    let i_max = max_used - 1;
    let mut j = 0usize;

    let mut tmp = src[i] as u32;
    i += 1;
    let mut tb = 8u32; // valid low bits of tmp
    let mut ob = 0u32; // bits already placed in tgt[j]
    tgt[j] = 0;

    while i <= i_max || ob + tb >= bits_per_element {
        if ob + tb < bits_per_element {
            // All of tmp fits into the current output element.
            let shift = bits_per_element - ob - tb;
            tgt[j] |= ((tmp << shift) & 0xffff) as i16;
            ob += tb;
            tmp = src[i] as u32;
            i += 1;
            tb = 8;
        } else {
            // tmp finishes off tgt[j]; keep the leftover bits for the next
            // element.
            let shift = ob + tb - bits_per_element;
            tgt[j] |= (((tmp & 0xff) >> shift) & 0xff) as i16;
            j += 1;
            if j == num_elts {
                break;
            }
            tgt[j] = 0;
            ob = 0;
            tmp &= low_bit_mask(shift);
            tb = shift;
        }
    }
    max_used
}

/// Packed size of the listed representation of a trinomial with the given
/// nonzero counts.
pub fn listed_length(num_ones: usize, num_neg_ones: usize, n: usize) -> usize {
    packed_length(num_ones + num_neg_ones, n)
}

/// Bit-packs a sparse trinomial as the index list of its +1 positions
/// followed by its -1 positions. Returns the number of bytes written.
pub fn pack_listed_coefficients(
    f: &Polynomial,
    num_ones: usize,
    num_neg_ones: usize,
    out: &mut [u8],
) -> usize {
    let n = f.coeffs().len();
    let mut coefficients = vec![0i16; num_ones + num_neg_ones];
    let mut ones = 0;
    let mut neg_ones = num_ones;
    for (i, &v) in f.coeffs().iter().enumerate() {
        match v {
            1 => {
                coefficients[ones] = i as i16;
                ones += 1;
            }
            -1 => {
                coefficients[neg_ones] = i as i16;
                neg_ones += 1;
            }
            _ => {}
        }
    }
    let written = pack(num_ones + num_neg_ones, n, &coefficients, out);
    coefficients.zeroize();
    written
}

/// Rebuilds a sparse trinomial from its listed representation. Returns the
/// number of bytes consumed, or `None` when an encoded index falls outside
/// the ring (a malformed blob).
pub fn unpack_listed_coefficients(
    f: &mut Polynomial,
    n: usize,
    num_ones: usize,
    num_neg_ones: usize,
    src: &[u8],
) -> Option<usize> {
    let mut coefficients = vec![0i16; num_ones + num_neg_ones];
    let consumed = unpack(coefficients.len(), n, src, &mut coefficients);
    if coefficients.iter().any(|&idx| idx as usize >= n) {
        coefficients.zeroize();
        return None;
    }
    for c in f.coeffs.iter_mut() {
        *c = 0;
    }
    for &idx in &coefficients[..num_ones] {
        f.coeffs[idx as usize] = 1;
    }
    for &idx in &coefficients[num_ones..] {
        f.coeffs[idx as usize] = -1;
    }
    coefficients.zeroize();
    Some(consumed)
}

fn low_bit_mask(num_bits: u32) -> u32 {
    !(u32::MAX << num_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn count_bits_boundaries() {
        assert_eq!(count_bits(0), 0);
        assert_eq!(count_bits(1), 1);
        assert_eq!(count_bits(2), 2);
        assert_eq!(count_bits(2047), 11);
        assert_eq!(count_bits(2048), 12);
    }

    #[test]
    fn packed_length_matches_pack_output() {
        let src = vec![7i16; 401];
        let len = packed_length(401, 2048);
        assert_eq!(len, (401 * 11 + 7) / 8);
        let mut tgt = vec![0u8; len];
        assert_eq!(pack(401, 2048, &src, &mut tgt), len);
    }

    #[test]
    fn pack_unpack_roundtrip_mod_q() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for &n in &[401usize, 659, 1171] {
            let src: Vec<i16> = (0..n).map(|_| rng.gen_range(0..2048)).collect();
            let mut packed = vec![0u8; packed_length(n, 2048)];
            pack(n, 2048, &src, &mut packed);
            let mut out = vec![0i16; n];
            let consumed = unpack(n, 2048, &packed, &mut out);
            assert_eq!(consumed, packed.len());
            assert_eq!(out, src);
        }
    }

    #[test]
    fn pack_single_element() {
        let mut tgt = vec![0u8; packed_length(1, 2048)];
        pack(1, 2048, &[0x5a5], &mut tgt);
        let mut out = vec![0i16; 1];
        unpack(1, 2048, &tgt, &mut out);
        assert_eq!(out[0], 0x5a5);
    }

    #[test]
    fn pack_n_truncates() {
        let src = vec![0x7ffi16; 64];
        let mut full = vec![0u8; packed_length(64, 2048)];
        pack(64, 2048, &src, &mut full);
        let mut prefix = vec![0u8; 16];
        let written = pack_n(64, 2048, 16, &src, &mut prefix);
        assert_eq!(written, 16);
        assert_eq!(prefix[..], full[..16]);
    }

    #[test]
    fn listed_roundtrip_preserves_positions_and_signs() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let n = 659;
        let (ones, negs) = (38, 38);
        let mut f = Polynomial::new(n);
        let mut placed = 0;
        while placed < ones + negs {
            let idx = rng.gen_range(0..n);
            if f.coeffs()[idx] == 0 {
                f.coeffs[idx] = if placed < ones { 1 } else { -1 };
                placed += 1;
            }
        }

        let mut buf = vec![0u8; listed_length(ones, negs, n)];
        let written = pack_listed_coefficients(&f, ones, negs, &mut buf);
        assert_eq!(written, buf.len());

        let mut g = Polynomial::new(n);
        let consumed = unpack_listed_coefficients(&mut g, n, ones, negs, &buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(f, g);
    }

    #[test]
    fn listed_unpack_overwrites_stale_coefficients() {
        let n = 659;
        let mut f = Polynomial::new(n);
        f.coeffs[0] = 1;
        f.coeffs[10] = -1;
        let mut buf = vec![0u8; listed_length(1, 1, n)];
        pack_listed_coefficients(&f, 1, 1, &mut buf);

        // The target starts out full of junk; every coefficient must come
        // out of the blob, and the polynomial must keep its length.
        let mut g = Polynomial::from_coeffs(&vec![7i16; n]);
        let consumed = unpack_listed_coefficients(&mut g, n, 1, 1, &buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(g.coeffs().len(), n);
        assert_eq!(f, g);
    }

    #[test]
    fn listed_unpack_rejects_out_of_range_index() {
        // All-ones bytes decode to indices of 2^bits - 1, past the ring.
        let n = 659;
        let buf = vec![0xffu8; listed_length(2, 2, n)];
        let mut g = Polynomial::new(n);
        assert!(unpack_listed_coefficients(&mut g, n, 2, 2, &buf).is_none());
    }
}
