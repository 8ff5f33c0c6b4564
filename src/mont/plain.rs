use num_bigint::BigUint;
use num_traits::One;

use super::ModularSpace;

/// Ordinary residues with `BigUint::modpow`; every value is its own
/// representation. This is the default space of the keys.
#[derive(Clone, Debug)]
pub struct PlainSpace {
    modulus: BigUint,
    identity: BigUint,
}

impl ModularSpace for PlainSpace {
    fn new(modulus: &BigUint) -> Self {
        Self {
            modulus: modulus.clone(),
            identity: BigUint::one() % modulus,
        }
    }

    fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    fn identity(&self) -> &BigUint {
        &self.identity
    }

    fn map_into(&self, x: &BigUint) -> BigUint {
        x % &self.modulus
    }

    fn map_back(&self, x: &BigUint) -> BigUint {
        x % &self.modulus
    }

    fn mul_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        a * b % &self.modulus
    }

    fn pow_mod(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.modulus)
    }
}
