use std::{fmt, sync::Arc};

use log::debug;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    dj::{
        params::{validate_exp_unit_bits, DEFAULT_EXP_UNIT_BITS},
        Ciphertext, Error, Result,
    },
    mont::{BaseTable, ModularSpace, PlainSpace},
    util::{random_exact_bits, sub_mod},
};

/// Damgard-Jurik public key `(n, s, hs)` with its precomputed tables.
///
/// The tables are shared behind an `Arc`, so cloning a key is cheap and clones
/// can be handed to any number of threads.
pub struct PublicKey<M = PlainSpace>
where
    M: ModularSpace,
{
    n: BigUint,
    s: u32,
    // hs = h^(n^s) mod n^(s+1) where h = -x^2 mod n
    hs: BigUint,
    pmod: BigUint,
    cmod: BigUint,
    bound: BigUint,
    lut: Arc<Lut<M>>,
}

struct Lut<M> {
    // space for mod n^(s+1)
    space: M,
    // powers of hs
    hs_pow: BaseTable,
    // n^i, i = 0..=s
    n_pow: Vec<BigUint>,
    // n^i/i! mod n^(s+1) in the space representation, i = 0..=s
    precomp: Vec<BigUint>,
}

impl<M> PublicKey<M>
where
    M: ModularSpace,
{
    /// Builds the key. A zero `hs` asks for a freshly derived obfuscator.
    pub fn init(n: BigUint, s: u32, hs: BigUint) -> Result<Self> {
        Self::init_with_unit_bits(n, s, hs, DEFAULT_EXP_UNIT_BITS)
    }

    pub fn init_with_unit_bits(
        n: BigUint,
        s: u32,
        hs: BigUint,
        exp_unit_bits: usize,
    ) -> Result<Self> {
        Self::init_with_rng(&mut rand::thread_rng(), n, s, hs, exp_unit_bits)
    }

    pub fn init_with_rng<R>(
        rng: &mut R,
        n: BigUint,
        s: u32,
        hs: BigUint,
        exp_unit_bits: usize,
    ) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        if s == 0 {
            return Err(Error::InvalidKey {
                reason: "s must be at least 1",
            });
        }
        if n <= BigUint::one() || n.is_even() {
            return Err(Error::InvalidKey {
                reason: "n must be odd and greater than 1",
            });
        }
        validate_exp_unit_bits(exp_unit_bits)?;

        let pmod = n.pow(s);
        let cmod = &pmod * &n;
        let bound = &pmod >> 1u32;
        if hs >= cmod {
            return Err(Error::InvalidKey {
                reason: "hs must be reduced modulo n^(s+1)",
            });
        }
        let hs = if hs.is_zero() {
            derive_hs(rng, &n, &pmod, &cmod)
        } else {
            hs
        };

        let space = M::new(&cmod);
        let max_exp_bits = (n.bits() / 2) as usize;
        let hs_pow = space.make_base_table(&hs, exp_unit_bits, max_exp_bits);
        debug!(
            "hs table: {} entries, {} bits per step, up to {} bits",
            hs_pow.len(),
            exp_unit_bits,
            hs_pow.exp_max_bits()
        );

        let s = s as usize;
        let mut n_pow = Vec::with_capacity(s + 1);
        let mut precomp = Vec::with_capacity(s + 1);
        n_pow.push(BigUint::one());
        precomp.push(space.identity().clone());
        let mut coeff = BigUint::one();
        for i in 1..=s {
            n_pow.push(&n_pow[i - 1] * &n);
            let inv_i = BigUint::from(i)
                .modinv(&cmod)
                .ok_or(Error::InvalidKey {
                    reason: "n must not have prime factors up to s",
                })?;
            coeff = coeff * &n % &cmod * inv_i % &cmod;
            precomp.push(space.map_into(&coeff));
        }

        Ok(Self {
            n,
            s: s as u32,
            hs,
            pmod,
            cmod,
            bound,
            lut: Arc::new(Lut {
                space,
                hs_pow,
                n_pow,
                precomp,
            }),
        })
    }

    /// Rebuilds the same key on top of another modular space.
    pub fn with_space<M2>(&self) -> Result<PublicKey<M2>>
    where
        M2: ModularSpace,
    {
        PublicKey::init_with_unit_bits(
            self.n.clone(),
            self.s,
            self.hs.clone(),
            self.lut.hs_pow.exp_unit_bits(),
        )
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn s(&self) -> u32 {
        self.s
    }

    pub fn hs(&self) -> &BigUint {
        &self.hs
    }

    /// `n^s`
    pub fn plain_modulus(&self) -> &BigUint {
        &self.pmod
    }

    /// `n^(s+1)`
    pub fn cipher_modulus(&self) -> &BigUint {
        &self.cmod
    }

    /// `n^s / 2`; valid plaintexts satisfy `|m| <= bound`.
    pub fn plaintext_bound(&self) -> &BigUint {
        &self.bound
    }

    /// Random element `hs^r mod n^(s+1)` with `r` of `n.bits() / 2` bits.
    pub fn random_hs_r(&self) -> Result<BigUint> {
        let r = self.random_hs_r_repr(&mut rand::thread_rng())?;
        Ok(self.lut.space.map_back(&r))
    }

    /// Deterministic encryption `(1+n)^m mod n^(s+1)` of a residue `m` mod `n^s`.
    pub fn encode(&self, m: &BigUint) -> BigUint {
        self.lut.space.map_back(&self.encode_repr(m))
    }

    pub fn mul_mod(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let space = &self.lut.space;
        space.map_back(&space.mul_mod(&space.map_into(a), &space.map_into(b)))
    }

    pub fn mul_mod_into(&self, a: &BigUint, b: &BigUint, dst: &mut BigUint) {
        *dst = self.mul_mod(a, b);
    }

    pub fn pow_mod(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        let space = &self.lut.space;
        space.map_back(&space.pow_mod(&space.map_into(base), exp))
    }

    pub(crate) fn space(&self) -> &M {
        &self.lut.space
    }

    pub(crate) fn random_hs_r_repr<R>(&self, rng: &mut R) -> Result<BigUint>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let r = random_exact_bits(rng, self.n.bits() / 2);
        Ok(self.lut.space.pow_mod_table(&self.lut.hs_pow, &r)?)
    }

    // sum_{i=0}^{s} m(m-1)..(m-i+1) * n^i/i!  mod n^(s+1)
    pub(crate) fn encode_repr(&self, m: &BigUint) -> BigUint {
        let space = &self.lut.space;
        let s = self.s as usize;
        let mut acc = space.identity().clone();
        let mut tmp = BigUint::one();
        for i in 1..=s {
            // the factor n^i of the term makes tmp mod n^(s+1-i) sufficient
            let modulus = &self.lut.n_pow[s - i + 1];
            tmp = tmp * sub_mod(m, &BigUint::from(i - 1), modulus) % modulus;
            acc += space.mul_mod(&space.map_into(&tmp), &self.lut.precomp[i]);
        }
        acc % &self.cmod
    }

    pub(crate) fn check_ciphertext(&self, ct: &Ciphertext, op: &'static str) -> Result<()> {
        if ct.value() >= &self.cmod {
            return Err(Error::InvalidCiphertext { op });
        }
        Ok(())
    }
}

fn derive_hs<R>(rng: &mut R, n: &BigUint, pmod: &BigUint, cmod: &BigUint) -> BigUint
where
    R: RngCore + CryptoRng,
{
    let x = loop {
        let x = rng.gen_biguint_below(n);
        if !x.is_zero() && x.gcd(n).is_one() {
            break x;
        }
    };
    // x is a unit, so x^2 mod n is never zero
    let h = n - (&x * &x % n);
    h.modpow(pmod, cmod)
}

impl<M> Clone for PublicKey<M>
where
    M: ModularSpace,
{
    fn clone(&self) -> Self {
        Self {
            n: self.n.clone(),
            s: self.s,
            hs: self.hs.clone(),
            pmod: self.pmod.clone(),
            cmod: self.cmod.clone(),
            bound: self.bound.clone(),
            lut: Arc::clone(&self.lut),
        }
    }
}

impl<M> PartialEq for PublicKey<M>
where
    M: ModularSpace,
{
    fn eq(&self, other: &Self) -> bool {
        self.pmod == other.pmod && self.hs == other.hs
    }
}

impl<M> Eq for PublicKey<M> where M: ModularSpace {}

impl<M> fmt::Debug for PublicKey<M>
where
    M: ModularSpace,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("n", &self.n)
            .field("s", &self.s)
            .field("hs", &self.hs)
            .finish_non_exhaustive()
    }
}

impl<M> fmt::Display for PublicKey<M>
where
    M: ModularSpace,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Damgard-Jurik PK: n={:x}[{}bits], s={}, max_plaintext={:x}[~{}bits]",
            self.n,
            self.n.bits(),
            self.s,
            self.bound,
            self.bound.bits()
        )
    }
}

impl<M> Serialize for PublicKey<M>
where
    M: ModularSpace,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.n, self.s, &self.hs).serialize(serializer)
    }
}

impl<'de, M> Deserialize<'de> for PublicKey<M>
where
    M: ModularSpace,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (n, s, hs) = <(BigUint, u32, BigUint)>::deserialize(deserializer)?;
        if hs.is_zero() {
            return Err(de::Error::custom("public key without obfuscator hs"));
        }
        Self::init(n, s, hs).map_err(de::Error::custom)
    }
}
