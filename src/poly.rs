use zeroize::{Zeroize, ZeroizeOnDrop};

/// An element of the truncated polynomial ring Z[X]/(X^N - 1).
///
/// Coefficients are 16-bit words; values are therefore maintained modulo
/// 2^16, which is exact for every modulus this crate reduces by (each one
/// divides 2^16). The length is fixed at construction and every ring
/// operation preserves it.
///
/// Polynomials are wiped when dropped, so intermediates holding secret
/// material do not outlive the operation that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    pub(crate) coeffs: Vec<i16>,
}

impl Polynomial {
    /// The zero polynomial of degree < n.
    pub fn new(n: usize) -> Self {
        Polynomial {
            coeffs: vec![0; n],
        }
    }

    pub fn from_coeffs(coeffs: &[i16]) -> Self {
        Polynomial {
            coeffs: coeffs.to_vec(),
        }
    }

    pub fn coeffs(&self) -> &[i16] {
        &self.coeffs
    }

    /// Highest index with a nonzero coefficient; 0 for the zero polynomial.
    pub fn degree(&self) -> usize {
        let mut deg = self.coeffs.len() - 1;
        while deg > 0 && self.coeffs[deg] == 0 {
            deg -= 1;
        }
        deg
    }

    /// Cyclic rotate-left: division by X in the ring.
    pub fn divide_by_x(&mut self) {
        let f0 = self.coeffs[0];
        let n = self.coeffs.len();
        for i in 0..n - 1 {
            self.coeffs[i] = self.coeffs[i + 1];
        }
        self.coeffs[n - 1] = f0;
    }

    /// Cyclic rotate-right: multiplication by X in the ring.
    pub fn multiply_by_x(&mut self) {
        let n = self.coeffs.len();
        let last = self.coeffs[n - 1];
        for i in (1..n).rev() {
            self.coeffs[i] = self.coeffs[i - 1];
        }
        self.coeffs[0] = last;
    }

    /// Reduces every coefficient modulo `modulus` into the range
    /// [lower, lower + modulus).
    pub fn recenter(&mut self, modulus: i32, lower: i32) {
        let upper = lower + modulus;
        for c in self.coeffs.iter_mut() {
            let mut tmp = *c as i32 % modulus;
            if tmp >= upper {
                tmp -= modulus;
            }
            if tmp < lower {
                tmp += modulus;
            }
            *c = tmp as i16;
        }
    }

    pub fn add_and_recenter(&self, rhs: &Polynomial, modulus: i32, lower: i32) -> Polynomial {
        let mut out = Polynomial::new(self.coeffs.len());
        for i in 0..out.coeffs.len() {
            out.coeffs[i] = self.coeffs[i].wrapping_add(rhs.coeffs[i]);
        }
        out.recenter(modulus, lower);
        out
    }

    /// Sum with coefficients recentered into [0, modulus).
    pub fn add(&self, rhs: &Polynomial, modulus: i32) -> Polynomial {
        self.add_and_recenter(rhs, modulus, 0)
    }

    pub fn subtract_and_recenter(&self, rhs: &Polynomial, modulus: i32, lower: i32) -> Polynomial {
        let mut out = Polynomial::new(self.coeffs.len());
        for i in 0..out.coeffs.len() {
            out.coeffs[i] = self.coeffs[i].wrapping_sub(rhs.coeffs[i]);
        }
        out.recenter(modulus, lower);
        out
    }

    /// Difference with coefficients recentered into [0, modulus).
    pub fn subtract(&self, rhs: &Polynomial, modulus: i32) -> Polynomial {
        self.subtract_and_recenter(rhs, modulus, 0)
    }

    /// Compares two polynomials without an early exit on the first
    /// mismatching coefficient.
    pub fn equals(&self, other: &Polynomial) -> bool {
        if self.coeffs.len() != other.coeffs.len() {
            return false;
        }
        let mut acc: i16 = 0;
        for i in 0..self.coeffs.len() {
            acc |= self.coeffs[i] ^ other.coeffs[i];
        }
        acc == 0
    }

    /// True when the counts of +1s, -1s and everything else each reach dm0.
    pub fn meets_dm0(&self, dm0: usize) -> bool {
        let mut ones = 0usize;
        let mut neg_ones = 0usize;
        for &v in &self.coeffs {
            match v {
                1 => ones += 1,
                -1 => neg_ones += 1,
                _ => {}
            }
        }
        let zeros = self.coeffs.len() - ones - neg_ones;
        ones >= dm0 && neg_ones >= dm0 && zeros >= dm0
    }

    /// Packs every coefficient mod 4 into a byte array, four coefficients
    /// per byte, first coefficient in the top bits. Used as the MGF seed.
    pub fn mod4_packed(&self) -> Vec<u8> {
        let n = self.coeffs.len();
        let mut r4 = vec![0u8; (n + 3) / 4];
        let last = r4.len() - 1;
        let mut j = 0;
        for i in 0..last {
            let mut tmp = ((self.coeffs[j] & 0x03) as u8) << 6;
            tmp |= ((self.coeffs[j + 1] & 0x03) as u8) << 4;
            tmp |= ((self.coeffs[j + 2] & 0x03) as u8) << 2;
            tmp |= (self.coeffs[j + 3] & 0x03) as u8;
            r4[i] = tmp;
            j += 4;
        }
        let rem = n & 3;
        if rem > 0 {
            r4[last] |= ((self.coeffs[j] & 0x03) as u8) << 6;
        }
        if rem > 1 {
            r4[last] |= ((self.coeffs[j + 1] & 0x03) as u8) << 4;
        }
        if rem > 2 {
            r4[last] |= ((self.coeffs[j + 2] & 0x03) as u8) << 2;
        }
        r4
    }
}

fn convolution_raw(a: &Polynomial, b: &Polynomial) -> Vec<i64> {
    let n = a.coeffs.len();
    debug_assert_eq!(n, b.coeffs.len());
    let mut acc = vec![0i64; n];
    for i in 0..n {
        let ai = a.coeffs[i] as i64;
        if ai == 0 {
            continue;
        }
        for j in 0..n {
            acc[(i + j) % n] += ai * b.coeffs[j] as i64;
        }
    }
    acc
}

/// Cyclic convolution: c[k] = sum a[i]*b[(k-i) mod N]. Coefficients wrap
/// modulo 2^16; callers reduce further with [`convolution_mod`].
pub fn convolution(a: &Polynomial, b: &Polynomial) -> Polynomial {
    let acc = convolution_raw(a, b);
    Polynomial {
        coeffs: acc.iter().map(|&v| v as i16).collect(),
    }
}

/// Cyclic convolution with coefficients recentered into [0, modulus).
pub fn convolution_mod(a: &Polynomial, b: &Polynomial, modulus: i32) -> Polynomial {
    let acc = convolution_raw(a, b);
    let coeffs = acc
        .iter()
        .map(|&v| {
            let mut tmp = (v % modulus as i64) as i32;
            if tmp < 0 {
                tmp += modulus;
            }
            tmp as i16
        })
        .collect();
    Polynomial { coeffs }
}
