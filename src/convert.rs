//! The X9.92 bit/trit conversions used for message formatting: 3 bits map
//! to 2 trits on the way into the ring, and back on the way out. Both
//! directions work on 24-bit blocks (3 bytes to 16 trits).

/// Converts the low 3 bits of `b` into two trits.
fn bits_to_trits(max_offset: usize, offset: usize, trits: &mut [i16], b: u32) {
    let (a1, a2): (i16, i16) = match b & 0x07 {
        0 => (0, 0),
        1 => (0, 1),
        2 => (0, -1),
        3 => (1, 0),
        4 => (1, 1),
        5 => (1, -1),
        6 => (-1, 0),
        _ => (-1, 1),
    };
    if offset < max_offset {
        trits[offset] = a1;
    }
    if offset + 1 < max_offset {
        trits[offset + 1] = a2;
    }
}

/// Converts a 24-bit block into up to 8 trit pairs.
fn block_to_trits(max_offset: usize, mut offset: usize, trits: &mut [i16], bits24: u32) {
    let mut i = 0;
    while i < 24 && offset < max_offset {
        let shift = 24 - (i + 3);
        bits_to_trits(max_offset, offset, trits, bits24 >> shift);
        offset += 2;
        i += 3;
    }
}

/// Converts a byte array into `output_degree` trits in {-1,0,1}. Bits past
/// the last trit slot are dropped; the formatted message is sized so only
/// zero padding ever falls there.
pub fn binary_to_trinary(output_degree: usize, bin: &[u8]) -> Vec<i16> {
    let mut tri = vec![0i16; output_degree];
    let blocks = bin.len() / 3;
    let remainder = bin.len() % 3;

    for i in 0..blocks {
        let val = (bin[i * 3] as u32) << 16 | (bin[i * 3 + 1] as u32) << 8 | bin[i * 3 + 2] as u32;
        block_to_trits(output_degree, 16 * i, &mut tri, val);
    }

    let mut val = 0u32;
    if remainder > 0 {
        val |= (bin[blocks * 3] as u32) << 16;
    }
    if remainder > 1 {
        val |= (bin[blocks * 3 + 1] as u32) << 8;
    }
    block_to_trits(output_degree, 16 * blocks, &mut tri, val);

    tri
}

/// Converts two trits into a 3-bit group, the mapping of X9.92. The pair
/// (-1,-1) has no preimage and maps to 0xff; the reference pipeline never
/// produces it from a formatted message.
fn trits_to_bits(t1: i16, t2: i16) -> u32 {
    let t1 = if t1 == -1 { 2 } else { t1 };
    let t2 = if t2 == -1 { 2 } else { t2 };
    match (t1 << 2) | t2 {
        0 => 0x00,
        1 => 0x01,
        2 => 0x02,
        4 => 0x03,
        5 => 0x04,
        6 => 0x05,
        8 => 0x06,
        9 => 0x07,
        _ => 0xff,
    }
}

fn trit_pair_at(offset: usize, trits: &[i16]) -> u32 {
    let t1 = if offset < trits.len() { trits[offset] } else { 0 };
    let t2 = if offset + 1 < trits.len() {
        trits[offset + 1]
    } else {
        0
    };
    trits_to_bits(t1, t2)
}

/// Converts 16 trits into one 24-bit block of the output.
fn trit_block_to_bytes(t_offset: usize, trits: &[i16], b_offset: usize, bits: &mut [u8]) {
    let mut val = 0u32;
    for i in 0..8 {
        val = val << 3 | trit_pair_at(t_offset + 2 * i, trits);
    }

    if b_offset < bits.len() {
        bits[b_offset] = (val >> 16) as u8;
    }
    if b_offset + 1 < bits.len() {
        bits[b_offset + 1] = (val >> 8) as u8;
    }
    if b_offset + 2 < bits.len() {
        bits[b_offset + 2] = val as u8;
    }
}

/// Converts a trit array back into `num_bytes` bytes, the inverse of
/// [`binary_to_trinary`] up to the documented truncation boundary.
pub fn trinary_to_binary(trits: &[i16], num_bytes: usize) -> Vec<u8> {
    let mut b = vec![0u8; num_bytes];
    let mut i = 0;
    let mut j = 0;
    while j < num_bytes {
        trit_block_to_bytes(i, trits, j, &mut b);
        i += 16;
        j += 3;
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn three_bits_map_to_two_trits() {
        let mut trits = [9i16; 2];
        bits_to_trits(2, 0, &mut trits, 5);
        assert_eq!(trits, [1, -1]);
        bits_to_trits(2, 0, &mut trits, 6);
        assert_eq!(trits, [-1, 0]);
    }

    #[test]
    fn roundtrip_within_truncation_boundary() {
        // The ees401ep1 envelope: 76 message bytes into 401 trits. The
        // final byte is always zero padding, which is exactly what the
        // truncation at N drops.
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..20 {
            let mut m = vec![0u8; 76];
            rng.fill(&mut m[..]);
            *m.last_mut().unwrap() = 0;
            let trits = binary_to_trinary(401, &m);
            assert!(trits.iter().all(|&t| (-1..=1).contains(&t)));
            let back = trinary_to_binary(&trits, 76);
            assert_eq!(back, m);
        }
    }

    #[test]
    fn roundtrip_on_block_exact_envelope() {
        // The ees1087ep2 envelope is 204 bytes, an exact multiple of the
        // 3-byte block, with its final trit cut off by N = 1087.
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut m = vec![0u8; 204];
        rng.fill(&mut m[..]);
        *m.last_mut().unwrap() = 0;
        let trits = binary_to_trinary(1087, &m);
        let back = trinary_to_binary(&trits, 204);
        assert_eq!(back, m);
    }

    #[test]
    fn all_zero_bytes_give_all_zero_trits() {
        let trits = binary_to_trinary(11, &[0, 0, 0]);
        assert_eq!(trits, vec![0i16; 11]);
    }
}
