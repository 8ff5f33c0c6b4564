use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A Damgard-Jurik ciphertext, an integer in `[0, n^(s+1))` held in the
/// ordinary (non-Montgomery) representation.
///
/// Values built with `From<BigUint>` are unchecked; the evaluator and decryptor
/// reject anything outside the ciphertext range of their key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::From)]
pub struct Ciphertext(pub(crate) BigUint);

impl Ciphertext {
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn into_value(self) -> BigUint {
        self.0
    }

    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }
}
