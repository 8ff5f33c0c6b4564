use num_bigint::BigInt;

use crate::{
    dj::{Ciphertext, Error, Plaintext, PublicKey, Result, SecretKey},
    mont::{ModularSpace, PlainSpace},
};

#[derive(Clone, Debug)]
pub struct Decryptor<M = PlainSpace>
where
    M: ModularSpace,
{
    pk: PublicKey<M>,
    sk: SecretKey,
}

impl<M> Decryptor<M>
where
    M: ModularSpace,
{
    /// Fails with `KeyMismatch` unless `sk` is the secret key of `pk`.
    pub fn new(pk: PublicKey<M>, sk: SecretKey) -> Result<Self> {
        if pk.n() != sk.n() || pk.s() != sk.s() {
            return Err(Error::KeyMismatch);
        }
        Ok(Self { pk, sk })
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        let mut out = Plaintext::default();
        self.decrypt_into(ct, &mut out)?;
        Ok(out)
    }

    pub fn decrypt_into(&self, ct: &Ciphertext, out: &mut Plaintext) -> Result<()> {
        self.pk.check_ciphertext(ct, "Decryptor")?;
        let raw = self.sk.decrypt(ct.value());
        *out = if &raw > self.pk.plaintext_bound() {
            Plaintext::new(BigInt::from(raw) - BigInt::from(self.pk.plain_modulus().clone()))
        } else {
            Plaintext::from(raw)
        };
        Ok(())
    }
}
