use std::fmt::Debug;

use log::{error, info};
use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};

pub fn log_error(name: &str, res: Result<(), impl Debug>) {
    if let Err(e) = res {
        error!("{} failed with error: {:?}", name, e)
    } else {
        info!("{} succeeded", name);
    }
}

/// `(a - b) mod m`, without leaving the unsigned integers.
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    if a >= b {
        a - b
    } else {
        m - b + a
    }
}

/// Uniformly random integer with exactly `bits` bits, i.e. the top bit is set.
pub fn random_exact_bits<R>(rng: &mut R, bits: u64) -> BigUint
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bits == 0 {
        return BigUint::default();
    }
    let mut r = rng.gen_biguint(bits - 1);
    r.set_bit(bits - 1, true);
    r
}
