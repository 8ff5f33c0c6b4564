//! Damgard-Jurik generalized Paillier encryption.
//!
//! Plaintexts are integers `m` with `|m| <= n^s / 2`, ciphertexts live in
//! `Z_{n^(s+1)}`. For `s = 1` this is the Paillier cryptosystem.

mod ciphertext;
mod decryptor;
mod encryptor;
mod evaluator;
mod key_generator;
pub mod params;
mod plaintext;
mod public_key;
mod secret_key;

use num_bigint::{BigInt, BigUint};

use crate::mont::ExponentTooLarge;

pub use self::{
    ciphertext::Ciphertext,
    decryptor::Decryptor,
    encryptor::{EncryptionAudit, Encryptor},
    evaluator::Evaluator,
    key_generator::{KeyGenerator, MAX_KEYGEN_ATTEMPTS},
    params::KeyParams,
    plaintext::Plaintext,
    public_key::PublicKey,
    secret_key::SecretKey,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum Error {
    #[display(fmt = "message number out of range, message={}, max (abs)={}", plaintext, bound)]
    Range { plaintext: BigInt, bound: BigUint },
    #[display(fmt = "{}: ciphertext out of range", op)]
    InvalidCiphertext { op: &'static str },
    #[display(fmt = "no {}-bit key found after {} attempts", key_bits, attempts)]
    KeyGeneration { key_bits: usize, attempts: usize },
    #[display(fmt = "invalid key: {}", reason)]
    InvalidKey { reason: &'static str },
    #[display(fmt = "public key and secret key do not match")]
    KeyMismatch,
    #[display(fmt = "{}", source)]
    Exponent { source: ExponentTooLarge },
}

impl From<ExponentTooLarge> for Error {
    fn from(source: ExponentTooLarge) -> Self {
        Self::Exponent { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use num_bigint::BigUint;
    use num_traits::Zero;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::mont::{MontgomerySpace, PlainSpace};

    use super::{
        Ciphertext, Decryptor, Encryptor, Error, Evaluator, KeyGenerator, Plaintext, PublicKey,
        SecretKey,
    };

    struct Context<M: crate::mont::ModularSpace = PlainSpace> {
        sk: SecretKey,
        pk: PublicKey<M>,
        encryptor: Encryptor<M>,
        evaluator: Evaluator<M>,
        decryptor: Decryptor<M>,
    }

    impl Context {
        fn generate(key_bits: usize, s: u32, seed: u64) -> Self {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let (sk, pk) = KeyGenerator::generate_with_rng(&mut rng, key_bits, s).unwrap();
            Self::from_keys(sk, pk)
        }
    }

    impl<M: crate::mont::ModularSpace> Context<M> {
        fn from_keys(sk: SecretKey, pk: PublicKey<M>) -> Self {
            Self {
                encryptor: Encryptor::new(pk.clone()),
                evaluator: Evaluator::new(pk.clone()),
                decryptor: Decryptor::new(pk.clone(), sk.clone()).unwrap(),
                sk,
                pk,
            }
        }

        fn enc(&self, m: impl Into<Plaintext>) -> Ciphertext {
            self.encryptor.encrypt(&m.into()).unwrap()
        }

        fn dec(&self, ct: &Ciphertext) -> Plaintext {
            self.decryptor.decrypt(ct).unwrap()
        }
    }

    fn context(s: u32) -> &'static Context {
        static CONTEXTS: [OnceLock<Context>; 3] = [OnceLock::new(), OnceLock::new(), OnceLock::new()];
        CONTEXTS[s as usize - 1].get_or_init(|| Context::generate(512, s, 1000 + s as u64))
    }

    #[test]
    fn roundtrip() {
        for s in 1..=3 {
            let ctx = context(s);
            let bound = Plaintext::from(ctx.pk.plaintext_bound().clone());
            let one = Plaintext::from(1);
            for m in [
                Plaintext::from(0),
                Plaintext::from(1),
                Plaintext::from(-1),
                Plaintext::from(i64::MAX),
                Plaintext::from(i64::MIN),
                &bound - &one,
                bound.clone(),
                -&bound,
            ] {
                assert_eq!(ctx.dec(&ctx.enc(m.clone())), m, "s={}", s);
            }
        }
    }

    #[test]
    fn boundary_is_enforced() {
        for s in 1..=3 {
            let ctx = context(s);
            let bound = Plaintext::from(ctx.pk.plaintext_bound().clone());
            let one = Plaintext::from(1);
            for m in [&bound + &one, -&bound - &one] {
                assert!(matches!(ctx.encryptor.encrypt(&m), Err(Error::Range { .. })), "s={}", s);
            }
        }
    }

    #[test]
    fn additive_homomorphism() {
        for s in 1..=3 {
            let ctx = context(s);
            let ev = &ctx.evaluator;
            let sum = ev.add(&ctx.enc(i64::MIN), &ctx.enc(i64::MAX)).unwrap();
            assert_eq!(ctx.dec(&sum), Plaintext::from(-1));

            let a = Plaintext::from(i64::MAX);
            let sum = ev.add(&ctx.enc(a.clone()), &ctx.enc(a.clone())).unwrap();
            assert_eq!(ctx.dec(&sum), &a + &a);

            // a sum leaving the range wraps around modulo n^s
            let bound = Plaintext::from(ctx.pk.plaintext_bound().clone());
            let wrapped = ev.add_plain(&ctx.enc(bound.clone()), &Plaintext::from(1)).unwrap();
            assert_eq!(ctx.dec(&wrapped), -&bound);
        }
    }

    #[test]
    fn scalar_multiplication() {
        for s in 1..=3 {
            let ctx = context(s);
            let ct = ctx.enc(-12345);
            for k in [-2i64, -1, 0, 1, 2, 10] {
                let res = ctx.evaluator.mul(&ct, &Plaintext::from(k)).unwrap();
                assert_eq!(ctx.dec(&res), Plaintext::from(-12345 * k), "s={} k={}", s, k);
            }
        }
    }

    #[test]
    fn randomize_after_mul_by_zero() {
        let ctx = context(2);
        let mut ct = ctx.evaluator.mul(&ctx.enc(123), &Plaintext::from(0)).unwrap();
        let before = ct.clone();
        ctx.evaluator.randomize(&mut ct).unwrap();
        assert_ne!(ct, before);
        assert!(!ct.value().is_zero());
        assert!(ctx.dec(&ct).is_zero());
    }

    #[test]
    fn additive_shares() {
        let ctx = context(1);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let secret = Plaintext::from(424242);
        let share = Plaintext::from(rand::Rng::gen_range(&mut rng, -1_000_000i64..1_000_000));
        let ct = ctx.evaluator.sub_plain(&ctx.enc(secret.clone()), &share).unwrap();
        assert_eq!(ctx.dec(&ct) + &share, secret);
    }

    #[test]
    fn spaces_are_interchangeable() {
        let ctx = context(2);
        let mont_pk = ctx.pk.with_space::<MontgomerySpace>().unwrap();
        let mont: Context<MontgomerySpace> = Context::from_keys(ctx.sk.clone(), mont_pk);

        let ct_plain = ctx.enc(777);
        let ct_mont = mont.enc(-7);
        assert_eq!(mont.dec(&ct_plain), Plaintext::from(777));
        assert_eq!(ctx.dec(&ct_mont), Plaintext::from(-7));
        let sum = mont.evaluator.add(&ct_plain, &ct_mont).unwrap();
        assert_eq!(sum, ctx.evaluator.add(&ct_plain, &ct_mont).unwrap());
        assert_eq!(ctx.dec(&sum), Plaintext::from(770));
        let neg = mont.evaluator.mul(&ct_plain, &Plaintext::from(-3)).unwrap();
        assert_eq!(neg, ctx.evaluator.mul(&ct_plain, &Plaintext::from(-3)).unwrap());
    }

    #[test]
    fn keys_survive_serialization() {
        let ctx = context(2);
        let pk: PublicKey = bincode::deserialize(&bincode::serialize(&ctx.pk).unwrap()).unwrap();
        let sk: SecretKey = bincode::deserialize(&bincode::serialize(&ctx.sk).unwrap()).unwrap();
        assert_eq!(pk, ctx.pk);
        assert_eq!(sk, ctx.sk);

        let ct = Encryptor::new(pk.clone()).encrypt(&Plaintext::from(-5)).unwrap();
        let bytes = bincode::serialize(&ct).unwrap();
        let ct: Ciphertext = bincode::deserialize(&bytes).unwrap();
        assert_eq!(ctx.dec(&ct), Plaintext::from(-5));
        let decryptor = Decryptor::new(pk, sk).unwrap();
        assert_eq!(decryptor.decrypt(&ctx.enc(6)).unwrap(), Plaintext::from(6));
    }

    #[test]
    fn invalid_ciphertext_is_rejected() {
        let ctx = context(1);
        let bad = Ciphertext::from(ctx.pk.cipher_modulus() + BigUint::from(1u32));
        assert!(matches!(ctx.decryptor.decrypt(&bad), Err(Error::InvalidCiphertext { .. })));
        assert!(matches!(
            ctx.evaluator.add(&bad, &ctx.enc(1)),
            Err(Error::InvalidCiphertext { .. })
        ));
    }

    #[test]
    fn mismatched_keys_are_rejected() {
        let other = context(2);
        assert!(matches!(
            Decryptor::new(context(1).pk.clone(), other.sk.clone()),
            Err(Error::KeyMismatch)
        ));
    }

    #[test]
    fn error_messages() {
        let ctx = context(1);
        let err = ctx.encryptor.encrypt(&Plaintext::from(ctx.pk.plain_modulus().clone())).unwrap_err();
        assert!(err.to_string().starts_with("message number out of range"));
        let err = Error::InvalidCiphertext { op: "Decryptor" };
        assert_eq!(err.to_string(), "Decryptor: ciphertext out of range");
        let err = Error::KeyGeneration {
            key_bits: 2048,
            attempts: 64,
        };
        assert_eq!(err.to_string(), "no 2048-bit key found after 64 attempts");
        let _ = SecretKey::init(BigUint::zero(), BigUint::zero(), 1).unwrap_err();
    }

    #[test]
    fn paillier_2048() {
        let ctx = Context::generate(2048, 1, 2048);
        assert_eq!(ctx.pk.n().bits(), 2048);
        let g = ctx.pk.n() + 1u32;
        assert_eq!(ctx.pk.encode(&BigUint::from(1u32)), g);

        let ct0 = ctx.enc(-12345);
        let ct1 = ctx.enc(123);
        assert_eq!(ctx.dec(&ctx.evaluator.add(&ct0, &ct1).unwrap()), Plaintext::from(-12222));
        assert_eq!(
            ctx.dec(&ctx.evaluator.mul(&ct1, &Plaintext::from(-2)).unwrap()),
            Plaintext::from(-246)
        );
        let mut res = ctx.evaluator.add(&ct0, &ct0).unwrap();
        ctx.evaluator.randomize(&mut res).unwrap();
        assert_eq!(ctx.dec(&res), Plaintext::from(-24690));
    }
}
