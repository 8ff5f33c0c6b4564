pub mod montgomery;
pub mod plain;

use std::fmt::Debug;

use num_bigint::BigUint;

pub use self::montgomery::MontgomerySpace;
pub use self::plain::PlainSpace;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "exponent is too big, max_allowed={}, real_exp={}", max_bits, bits)]
pub struct ExponentTooLarge {
    pub bits: u64,
    pub max_bits: u64,
}

/// Powers of a fixed base, stored in the representation of the space that built them.
///
/// With `exp_unit_bits = 3` the stair holds
/// `g^1 .. g^7`, then `g^8, g^16 .. g^56`, then `g^64, g^128 .. g^448`, and so on:
/// every level covers `exp_unit_bits` more bits of the exponent.
#[derive(Clone, Debug)]
pub struct BaseTable {
    exp_unit_bits: usize,
    exp_unit_expand: usize,
    exp_max_bits: u64,
    stair: Vec<BigUint>,
}

impl BaseTable {
    pub fn exp_unit_bits(&self) -> usize {
        self.exp_unit_bits
    }

    pub fn exp_max_bits(&self) -> u64 {
        self.exp_max_bits
    }

    pub fn len(&self) -> usize {
        self.stair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stair.is_empty()
    }
}

/// Arithmetic modulo a fixed odd modulus in some internal representation.
///
/// Values handed to `mul_mod`, `pow_mod` (as base) and returned by them, by
/// `identity` and by `pow_mod_table` live in the space representation.
/// `map_into` and `map_back` convert from and to ordinary residues.
pub trait ModularSpace: Clone + Debug + Send + Sync + 'static {
    /// `modulus` must be odd and greater than one.
    fn new(modulus: &BigUint) -> Self;

    fn modulus(&self) -> &BigUint;

    fn identity(&self) -> &BigUint;

    fn map_into(&self, x: &BigUint) -> BigUint;

    fn map_back(&self, x: &BigUint) -> BigUint;

    fn mul_mod(&self, a: &BigUint, b: &BigUint) -> BigUint;

    fn pow_mod(&self, base: &BigUint, exp: &BigUint) -> BigUint;

    /// `base` is an ordinary residue. The table supports exponents of up to
    /// `max_exp_bits` bits, rounded up to a multiple of `exp_unit_bits`.
    fn make_base_table(
        &self,
        base: &BigUint,
        exp_unit_bits: usize,
        max_exp_bits: usize,
    ) -> BaseTable {
        debug_assert!(exp_unit_bits > 0);
        let exp_unit_expand = 1usize << exp_unit_bits;
        let max_exp_stairs = (max_exp_bits + exp_unit_bits - 1) / exp_unit_bits;
        let mut stair = Vec::with_capacity(max_exp_stairs * (exp_unit_expand - 1));

        let mut now = self.map_into(base);
        for _ in 0..max_exp_stairs {
            let level_base = now.clone();
            for _ in 0..exp_unit_expand - 1 {
                stair.push(now.clone());
                now = self.mul_mod(&now, &level_base);
            }
        }

        BaseTable {
            exp_unit_bits,
            exp_unit_expand,
            exp_max_bits: (max_exp_stairs * exp_unit_bits) as u64,
            stair,
        }
    }

    fn pow_mod_table(&self, table: &BaseTable, exp: &BigUint) -> Result<BigUint, ExponentTooLarge> {
        let bits = exp.bits();
        if bits > table.exp_max_bits {
            return Err(ExponentTooLarge {
                bits,
                max_bits: table.exp_max_bits,
            });
        }

        let width = table.exp_unit_expand - 1;
        let unit_bits = table.exp_unit_bits as u64;
        let mut out = self.identity().clone();
        let mut level = 0;
        let mut start = 0;
        while start < bits {
            let mut unit = 0usize;
            for k in 0..unit_bits {
                if exp.bit(start + k) {
                    unit |= 1 << k;
                }
            }
            if unit > 0 {
                out = self.mul_mod(&out, &table.stair[level * width + unit - 1]);
            }
            level += 1;
            start += unit_bits;
        }
        Ok(out)
    }
}
