use num_bigint::BigUint;
use num_traits::One;

use super::ModularSpace;

/// Montgomery representation `x -> xR mod m` with `R = 2^r_bits`, where
/// `r_bits` is the bit length of the modulus rounded up to whole 64-bit words.
#[derive(Clone, Debug)]
pub struct MontgomerySpace {
    modulus: BigUint,
    r_bits: u64,
    r_mask: BigUint,
    // -m^-1 mod R
    m_prime: BigUint,
    // R^2 mod m
    r_square: BigUint,
    // R mod m, i.e. 1 in the Montgomery ring
    identity: BigUint,
}

impl MontgomerySpace {
    /// Computes `t * R^-1 mod m` for `t < m * R`.
    fn redc(&self, t: &BigUint) -> BigUint {
        let u = ((t & &self.r_mask) * &self.m_prime) & &self.r_mask;
        let mut x = (u * &self.modulus + t) >> self.r_bits;
        if x >= self.modulus {
            x -= &self.modulus;
        }
        x
    }
}

impl ModularSpace for MontgomerySpace {
    fn new(modulus: &BigUint) -> Self {
        assert!(modulus.bit(0), "Montgomery modulus must be odd");
        let r_bits = (modulus.bits() + 63) / 64 * 64;
        let r = BigUint::one() << r_bits;
        let r_mask = &r - 1u32;

        // Newton iteration: each step doubles the number of correct low bits
        // of m^-1, starting from 1 which is correct modulo 2.
        let mut inv = BigUint::one();
        let mut precision = 1;
        while precision < r_bits {
            let t = (modulus * &inv) & &r_mask;
            let two_minus_t = (&r + 2u32 - t) & &r_mask;
            inv = (inv * two_minus_t) & &r_mask;
            precision *= 2;
        }
        let m_prime = (&r - inv) & &r_mask;

        let identity = &r % modulus;
        let r_square = &identity * &identity % modulus;

        Self {
            modulus: modulus.clone(),
            r_bits,
            r_mask,
            m_prime,
            r_square,
            identity,
        }
    }

    fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    fn identity(&self) -> &BigUint {
        &self.identity
    }

    fn map_into(&self, x: &BigUint) -> BigUint {
        self.redc(&((x % &self.modulus) * &self.r_square))
    }

    fn map_back(&self, x: &BigUint) -> BigUint {
        self.redc(x)
    }

    fn mul_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.redc(&(a * b))
    }

    // BigUint::modpow runs its own limb-level Montgomery ladder for odd moduli.
    fn pow_mod(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        self.map_into(&self.map_back(base).modpow(exp, &self.modulus))
    }
}
