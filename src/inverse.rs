//! Almost-inverse polynomial inversion, per NTRU Tech Report #014
//! ("Almost Inverses and Fast NTRU Key Creation"), plus the Newton
//! doubling step that lifts a mod-prime inverse to a prime-power modulus.
//!
//! Failure to invert is not an error: key generation treats `None` as
//! "resample and try again".

use crate::poly::{convolution_mod, Polynomial};

/// Inverts ring elements in (Z/pZ)[X]/(X^N - 1) for a prime p.
pub struct InverterModPrime {
    prime: i16,
    /// inv_mod_prime[i] * i == 1 (mod prime), or 0 when i has no inverse.
    inv_mod_prime: Vec<i16>,
}

impl InverterModPrime {
    pub fn new(prime: i16, inv_mod_prime: Vec<i16>) -> Self {
        InverterModPrime {
            prime,
            inv_mod_prime,
        }
    }

    fn mod_prime(&self, x: i16) -> i16 {
        let mut ret = x as i32 % self.prime as i32;
        if ret < 0 {
            ret += self.prime as i32;
        }
        ret as i16
    }

    /// Returns a^-1 in (Z/pZ)[X]/(X^N - 1), or `None` when a has no
    /// inverse.
    pub fn invert(&self, a: &Polynomial) -> Option<Polynomial> {
        let n = a.coeffs.len();

        // k = 0, b = 1, c = 0, f = a mod p, g = X^N - 1.
        // The scratch polynomials carry one extra slot for g's X^N term.
        let mut k = 0usize;
        let mut b = Polynomial::new(n + 1);
        b.coeffs[0] = 1;
        let mut c = Polynomial::new(n + 1);
        let mut f = Polynomial::new(n + 1);
        for i in 0..n {
            f.coeffs[i] = self.mod_prime(a.coeffs[i]);
        }
        let mut g = Polynomial::new(n + 1);
        g.coeffs[n] = 1;
        g.coeffs[0] = self.prime - 1;

        let mut df = f.degree();
        let mut dg = n;

        loop {
            // While f's constant term is zero: f /= X, c *= X.
            while f.coeffs[0] == 0 && df > 0 {
                df -= 1;
                f.divide_by_x();
                c.multiply_by_x();
                k += 1;
            }

            if df == 0 {
                let f0_inv = self.inv_mod_prime[f.coeffs[0] as usize];
                if f0_inv == 0 {
                    return None;
                }

                // Result is X^(N-k) * f[0]^-1 * b, reduced back to degree N.
                let shift = (((n as isize - k as isize) % n as isize + n as isize)
                    % n as isize) as usize;
                let mut ret = Polynomial::new(n);
                for i in 0..n {
                    ret.coeffs[(i + shift) % n] = self.mod_prime(f0_inv * b.coeffs[i]);
                }
                return Some(ret);
            }

            if df < dg {
                // The elimination below must always see the current f and
                // g, so swap the pairs in place.
                std::mem::swap(&mut f, &mut g);
                std::mem::swap(&mut b, &mut c);
                std::mem::swap(&mut df, &mut dg);
            }

            // u = f[0] * g[0]^-1, then f -= u*g and b -= u*c (mod p).
            let u = self.mod_prime(f.coeffs[0] * self.inv_mod_prime[g.coeffs[0] as usize]);
            for i in 0..f.coeffs.len() {
                f.coeffs[i] = self.mod_prime(f.coeffs[i] - u * g.coeffs[i]);
            }
            for i in 0..b.coeffs.len() {
                b.coeffs[i] = self.mod_prime(b.coeffs[i] - u * c.coeffs[i]);
            }
        }
    }
}

/// Inverts ring elements in (Z/p^rZ)[X]/(X^N - 1). Used with p = 2 to
/// invert modulo q.
pub struct InverterModPowerOfPrime {
    prime_inv: InverterModPrime,
    power_of_prime: i16,
}

impl InverterModPowerOfPrime {
    pub fn new(power_of_prime: i16, prime: i16, inv_mod_prime: Vec<i16>) -> Self {
        InverterModPowerOfPrime {
            prime_inv: InverterModPrime::new(prime, inv_mod_prime),
            power_of_prime,
        }
    }

    pub fn invert(&self, a: &Polynomial) -> Option<Polynomial> {
        let mut b = self.prime_inv.invert(a)?;

        // One Newton step per modulus doubling: b <- b*(2 - a*b) mod q'.
        // q' overshoots the target power; that is fine, an inverse mod a
        // multiple of q is an inverse mod q.
        let mut q = self.prime_inv.prime as i32;
        while q < self.power_of_prime as i32 {
            q *= q;
            let mut c = convolution_mod(a, &b, q);
            c.coeffs[0] = 2i16.wrapping_sub(c.coeffs[0]);
            if c.coeffs[0] < 0 {
                c.coeffs[0] = c.coeffs[0].wrapping_add(q as i16);
            }
            for i in 1..c.coeffs.len() {
                // -c mod q'.
                c.coeffs[i] = (q - c.coeffs[i] as i32) as i16;
            }
            b = convolution_mod(&b, &c, q);
        }
        Some(b)
    }
}
