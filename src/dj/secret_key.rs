use std::{fmt, sync::Arc};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    dj::{Error, Result},
    util::sub_mod,
};

/// Damgard-Jurik secret key `(p, q, s)`.
///
/// Decryption works on the two prime components separately and recombines
/// with the CRT, so it never computes in the full `n^(s+1)` ring.
pub struct SecretKey {
    p: BigUint,
    q: BigUint,
    s: u32,
    lut: Arc<Lut>,
}

struct Lut {
    n: BigUint,
    // (p-1)(q-1)/2
    lambda: BigUint,
    // lambda^-1 mod n^s
    mu: BigUint,
    pmod: BigUint,
    // p^s * (p^s)^-1 mod q^s, the CRT weight of the q component
    pp: BigUint,
    p_tables: PrimeTables,
    q_tables: PrimeTables,
}

/// Per-prime tables for the L-function and the Hensel lifting.
struct PrimeTables {
    prime: BigUint,
    // prime^j, j = 0..=s+1
    powers: Vec<BigUint>,
    // other^-1 mod prime^s
    other_inv: BigUint,
    // precomp[j][i] = n^(i-1)/i! mod prime^j for 2 <= i <= j <= s
    precomp: Vec<Vec<BigUint>>,
}

impl PrimeTables {
    fn new(prime: &BigUint, other: &BigUint, n: &BigUint, s: usize) -> Result<Self> {
        let mut powers = Vec::with_capacity(s + 2);
        powers.push(BigUint::one());
        for j in 1..=s + 1 {
            powers.push(&powers[j - 1] * prime);
        }
        let prime_s = &powers[s];
        let other_inv = other.modinv(prime_s).ok_or(Error::InvalidKey {
            reason: "p and q must be coprime",
        })?;

        // coeffs[i] = n^(i-1)/i! mod prime^s
        let mut coeffs = vec![BigUint::one(); s + 1];
        for i in 2..=s {
            let inv_i = BigUint::from(i).modinv(prime_s).ok_or(Error::InvalidKey {
                reason: "primes must be larger than s",
            })?;
            coeffs[i] = &coeffs[i - 1] * n % prime_s * inv_i % prime_s;
        }
        let precomp = (0..=s)
            .map(|j| {
                if j < 2 {
                    return Vec::new();
                }
                (0..=j)
                    .map(|i| if i < 2 { BigUint::default() } else { &coeffs[i] % &powers[j] })
                    .collect()
            })
            .collect();

        Ok(Self {
            prime: prime.clone(),
            powers,
            other_inv,
            precomp,
        })
    }

    /// `m * lambda mod prime^s` for a ciphertext encrypting `m`.
    fn decrypt_component(&self, c: &BigUint, lambda: &BigUint, s: usize) -> BigUint {
        let top = &self.powers[s + 1];
        let prime_s = &self.powers[s];
        let z = (c % top).modpow(lambda, top);
        let ls = sub_mod(&z, &BigUint::one(), top) / &self.prime * &self.other_inv % prime_s;

        let mut ind = &ls % &self.prime;
        for j in 2..=s {
            let prime_j = &self.powers[j];
            let mut l = &ls % prime_j;
            let mut tmp = ind.clone();
            for i in 2..=j {
                let modulus = &self.powers[j - i + 1];
                tmp = tmp * sub_mod(&ind, &BigUint::from(i - 1), modulus) % modulus;
                let term = &tmp * &self.precomp[j][i] % prime_j;
                l = sub_mod(&l, &term, prime_j);
            }
            ind = l;
        }
        ind
    }
}

impl SecretKey {
    pub fn init(p: BigUint, q: BigUint, s: u32) -> Result<Self> {
        if s == 0 {
            return Err(Error::InvalidKey {
                reason: "s must be at least 1",
            });
        }
        if p == q {
            return Err(Error::InvalidKey {
                reason: "p and q must be distinct",
            });
        }
        let two = BigUint::from(2u32);
        if p <= two || q <= two || p.is_even() || q.is_even() {
            return Err(Error::InvalidKey {
                reason: "p and q must be odd primes",
            });
        }

        let n = &p * &q;
        let pmod = n.pow(s);
        let lambda = (&p - 1u32) * (&q - 1u32) / 2u32;
        let mu = lambda.modinv(&pmod).ok_or(Error::InvalidKey {
            reason: "lambda is not invertible modulo n^s",
        })?;

        let su = s as usize;
        let p_tables = PrimeTables::new(&p, &q, &n, su)?;
        let q_tables = PrimeTables::new(&q, &p, &n, su)?;
        let p_s = &p_tables.powers[su];
        let q_s = &q_tables.powers[su];
        let p_s_inv = p_s.modinv(q_s).ok_or(Error::InvalidKey {
            reason: "p and q must be coprime",
        })?;
        let pp = p_s * p_s_inv;

        Ok(Self {
            p,
            q,
            s,
            lut: Arc::new(Lut {
                n,
                lambda,
                mu,
                pmod,
                pp,
                p_tables,
                q_tables,
            }),
        })
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn s(&self) -> u32 {
        self.s
    }

    pub fn n(&self) -> &BigUint {
        &self.lut.n
    }

    /// Recovers the residue `m` in `[0, n^s)` from `c` in `[0, n^(s+1))`.
    ///
    /// `c` is not validated here; values outside the ciphertext range give
    /// meaningless results.
    pub fn decrypt(&self, c: &BigUint) -> BigUint {
        let lut = &*self.lut;
        let s = self.s as usize;
        let ind_p = lut.p_tables.decrypt_component(c, &lut.lambda, s);
        let ind_q = lut.q_tables.decrypt_component(c, &lut.lambda, s);
        let m_lambda = (&ind_p + sub_mod(&ind_q, &ind_p, &lut.pmod) * &lut.pp) % &lut.pmod;
        m_lambda * &lut.mu % &lut.pmod
    }
}

impl Clone for SecretKey {
    fn clone(&self) -> Self {
        Self {
            p: self.p.clone(),
            q: self.q.clone(),
            s: self.s,
            lut: Arc::clone(&self.lut),
        }
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p && self.q == other.q && self.s == other.s
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("n_bits", &self.lut.n.bits())
            .field("s", &self.s)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Damgard-Jurik SK: p={:x}[{}bits], q={:x}[{}bits], s={}",
            self.p,
            self.p.bits(),
            self.q,
            self.q.bits(),
            self.s
        )
    }
}

impl Serialize for SecretKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.p, &self.q, self.s).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (p, q, s) = <(BigUint, BigUint, u32)>::deserialize(deserializer)?;
        Self::init(p, q, s).map_err(de::Error::custom)
    }
}
