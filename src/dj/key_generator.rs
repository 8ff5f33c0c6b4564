use log::{debug, info};
use num_bigint::BigUint;
use num_prime::nt_funcs::is_prime;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::{
    dj::{params::KeyParams, Error, PublicKey, Result, SecretKey},
    util::random_exact_bits,
};

/// Prime pairs drawn before key generation gives up.
pub const MAX_KEYGEN_ATTEMPTS: usize = 64;

pub struct KeyGenerator;

impl KeyGenerator {
    /// Generates a key pair whose `n` has exactly `key_bits` bits.
    pub fn generate(key_bits: usize, s: u32) -> Result<(SecretKey, PublicKey)> {
        Self::generate_with_rng(&mut rand::thread_rng(), key_bits, s)
    }

    pub fn generate_with_rng<R>(rng: &mut R, key_bits: usize, s: u32) -> Result<(SecretKey, PublicKey)>
    where
        R: RngCore + CryptoRng,
    {
        Self::generate_with_params(
            rng,
            &KeyParams {
                key_bits,
                s,
                ..KeyParams::default()
            },
        )
    }

    pub fn generate_with_params<R>(rng: &mut R, params: &KeyParams) -> Result<(SecretKey, PublicKey)>
    where
        R: RngCore + CryptoRng,
    {
        params.validate()?;
        let prime_bits = (params.key_bits / 2) as u64;

        for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
            let (p, q) = match (random_prime(rng, prime_bits), random_prime(rng, prime_bits)) {
                (Some(p), Some(q)) if p != q => (p, q),
                _ => {
                    debug!("attempt {}: no distinct prime pair found", attempt);
                    continue;
                }
            };
            let sk = match SecretKey::init(p, q, params.s) {
                Ok(sk) => sk,
                Err(e) => {
                    debug!("attempt {}: rejected prime pair: {}", attempt, e);
                    continue;
                }
            };
            let pk = PublicKey::init_with_rng(
                rng,
                sk.n().clone(),
                params.s,
                BigUint::zero(),
                params.exp_unit_bits,
            )?;
            info!("generated key after {} attempt(s): {}", attempt, pk);
            return Ok((sk, pk));
        }

        Err(Error::KeyGeneration {
            key_bits: params.key_bits,
            attempts: MAX_KEYGEN_ATTEMPTS,
        })
    }
}

// The top two bits are set so that the product of two such primes has
// exactly `2 * bits` bits.
fn random_prime<R>(rng: &mut R, bits: u64) -> Option<BigUint>
where
    R: RngCore + CryptoRng,
{
    for _ in 0..100 * bits {
        let mut candidate = random_exact_bits(rng, bits);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);
        if is_prime(&candidate, None).probably() {
            return Some(candidate);
        }
    }
    None
}
