use std::{cmp::Ordering, fmt};

use num_bigint::BigUint;

use crate::{
    dj::{Ciphertext, Error, Plaintext, PublicKey, Result},
    mont::{ModularSpace, PlainSpace},
};

/// Intermediate values of one encryption, for external auditing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionAudit {
    pub plaintext: Plaintext,
    /// `hs^r mod n^(s+1)`
    pub randomizer: BigUint,
    pub ciphertext: Ciphertext,
}

impl fmt::Display for EncryptionAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p:{:x},rn:{:x},c:{:x}",
            self.plaintext.as_bigint(),
            self.randomizer,
            self.ciphertext.value()
        )
    }
}

#[derive(Clone, Debug)]
pub struct Encryptor<M = PlainSpace>
where
    M: ModularSpace,
{
    pk: PublicKey<M>,
}

impl<M> Encryptor<M>
where
    M: ModularSpace,
{
    pub fn new(pk: PublicKey<M>) -> Self {
        Self { pk }
    }

    pub fn public_key(&self) -> &PublicKey<M> {
        &self.pk
    }

    /// Encrypts `m`, which must satisfy `|m| <= n^s / 2`.
    pub fn encrypt(&self, m: &Plaintext) -> Result<Ciphertext> {
        let (ct, _) = self.encrypt_repr(m)?;
        Ok(ct)
    }

    pub fn encrypt_zero(&self) -> Result<Ciphertext> {
        Ok(Ciphertext(self.pk.random_hs_r()?))
    }

    pub fn encrypt_with_audit(&self, m: &Plaintext) -> Result<(Ciphertext, EncryptionAudit)> {
        let (ct, rn) = self.encrypt_repr(m)?;
        let audit = EncryptionAudit {
            plaintext: m.clone(),
            randomizer: self.pk.space().map_back(&rn),
            ciphertext: ct.clone(),
        };
        Ok((ct, audit))
    }

    // Returns the ciphertext and the randomizer, the latter in the space representation.
    fn encrypt_repr(&self, m: &Plaintext) -> Result<(Ciphertext, BigUint)> {
        let residue = self.residue(m)?;
        let space = self.pk.space();
        let rn = self.pk.random_hs_r_repr(&mut rand::thread_rng())?;
        let c = space.mul_mod(&self.pk.encode_repr(&residue), &rn);
        Ok((Ciphertext(space.map_back(&c)), rn))
    }

    // Non-negative representative of `m` modulo `n^s`.
    fn residue(&self, m: &Plaintext) -> Result<BigUint> {
        let bound = self.pk.plaintext_bound();
        if m.abs_cmp(bound) == Ordering::Greater {
            return Err(Error::Range {
                plaintext: m.as_bigint().clone(),
                bound: bound.clone(),
            });
        }
        let magnitude = m.magnitude();
        if m.is_negative() {
            Ok(self.pk.plain_modulus() - magnitude)
        } else {
            Ok(magnitude.clone())
        }
    }
}
