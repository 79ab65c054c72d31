//! BPGM3, the blinding polynomial generation method of X9.92: places a
//! prescribed number of +1 and -1 coefficients into a zero polynomial,
//! redrawing any index that is already occupied.

use crate::error::Error;
use crate::igf::Igf2;
use crate::poly::Polynomial;
use crate::source::ByteSource;

/// Generates a trinomial with exactly `num_ones` coefficients of +1 and
/// `num_neg_ones` of -1, placed by the index generator.
pub fn gen_trinomial<S: ByteSource>(
    n: usize,
    num_ones: usize,
    num_neg_ones: usize,
    igf: &mut Igf2<S>,
) -> Result<Polynomial, Error> {
    let mut p = Polynomial::new(n);

    let mut placed = 0;
    while placed < num_ones {
        let i = igf.next_index()?;
        if p.coeffs[i] == 0 {
            p.coeffs[i] = 1;
            placed += 1;
        }
    }

    placed = 0;
    while placed < num_neg_ones {
        let i = igf.next_index()?;
        if p.coeffs[i] == 0 {
            p.coeffs[i] = -1;
            placed += 1;
        }
    }

    Ok(p)
}
