use crate::{
    dj::{Ciphertext, Encryptor, Error, Plaintext, PublicKey, Result},
    mont::{ModularSpace, PlainSpace},
};

const OP: &str = "Evaluator";

/// Homomorphic operations on ciphertexts of one public key.
///
/// Addition of plaintexts is multiplication of ciphertexts modulo `n^(s+1)`,
/// multiplication by a plaintext is exponentiation.
#[derive(Clone, Debug)]
pub struct Evaluator<M = PlainSpace>
where
    M: ModularSpace,
{
    pk: PublicKey<M>,
    encryptor: Encryptor<M>,
}

impl<M> Evaluator<M>
where
    M: ModularSpace,
{
    pub fn new(pk: PublicKey<M>) -> Self {
        Self {
            encryptor: Encryptor::new(pk.clone()),
            pk,
        }
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.pk.check_ciphertext(a, OP)?;
        self.pk.check_ciphertext(b, OP)?;
        Ok(Ciphertext(self.pk.mul_mod(a.value(), b.value())))
    }

    pub fn add_plain(&self, a: &Ciphertext, p: &Plaintext) -> Result<Ciphertext> {
        self.pk.check_ciphertext(a, OP)?;
        let b = self.encryptor.encrypt(p)?;
        Ok(Ciphertext(self.pk.mul_mod(a.value(), b.value())))
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.pk.check_ciphertext(a, OP)?;
        let neg_b = self.negate(b)?;
        self.add(a, &neg_b)
    }

    pub fn sub_plain(&self, a: &Ciphertext, p: &Plaintext) -> Result<Ciphertext> {
        self.add_plain(a, &-p)
    }

    /// `p + a`
    pub fn plain_add(&self, p: &Plaintext, a: &Ciphertext) -> Result<Ciphertext> {
        self.add_plain(a, p)
    }

    /// `p - a`
    pub fn plain_sub(&self, p: &Plaintext, a: &Ciphertext) -> Result<Ciphertext> {
        let neg_a = self.negate(a)?;
        self.add_plain(&neg_a, p)
    }

    pub fn mul(&self, a: &Ciphertext, p: &Plaintext) -> Result<Ciphertext> {
        self.pk.check_ciphertext(a, OP)?;
        if p.is_zero() {
            return self.encryptor.encrypt_zero();
        }
        if p.is_one() {
            return Ok(a.clone());
        }
        let base = if p.is_negative() {
            a.value()
                .modinv(self.pk.cipher_modulus())
                .ok_or(Error::InvalidCiphertext { op: OP })?
        } else {
            a.value().clone()
        };
        Ok(Ciphertext(self.pk.pow_mod(&base, p.magnitude())))
    }

    pub fn plain_mul(&self, p: &Plaintext, a: &Ciphertext) -> Result<Ciphertext> {
        self.mul(a, p)
    }

    pub fn negate(&self, a: &Ciphertext) -> Result<Ciphertext> {
        self.mul(a, &Plaintext::from(-1))
    }

    /// Multiplies `a` by a fresh encryption of zero; the plaintext is unchanged.
    pub fn randomize(&self, a: &mut Ciphertext) -> Result<()> {
        self.pk.check_ciphertext(a, OP)?;
        let rn = self.pk.random_hs_r()?;
        a.0 = self.pk.mul_mod(a.value(), &rn);
        Ok(())
    }

    pub fn add_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
        *a = self.add(a, b)?;
        Ok(())
    }

    pub fn add_plain_inplace(&self, a: &mut Ciphertext, p: &Plaintext) -> Result<()> {
        *a = self.add_plain(a, p)?;
        Ok(())
    }

    pub fn sub_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
        *a = self.sub(a, b)?;
        Ok(())
    }

    pub fn sub_plain_inplace(&self, a: &mut Ciphertext, p: &Plaintext) -> Result<()> {
        *a = self.sub_plain(a, p)?;
        Ok(())
    }

    pub fn mul_inplace(&self, a: &mut Ciphertext, p: &Plaintext) -> Result<()> {
        *a = self.mul(a, p)?;
        Ok(())
    }

    pub fn negate_inplace(&self, a: &mut Ciphertext) -> Result<()> {
        *a = self.negate(a)?;
        Ok(())
    }
}
