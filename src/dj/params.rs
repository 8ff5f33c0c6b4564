use std::{error::Error, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::dj;

/// Window width of the fixed-base table for `hs`. Each extra bit roughly
/// halves the multiplications per randomizer and doubles the table size.
pub const DEFAULT_EXP_UNIT_BITS: usize = 4;

pub const MAX_EXP_UNIT_BITS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyParams {
    /// Bit length of `n = p * q`.
    pub key_bits: usize,
    /// Damgard-Jurik exponent; plaintexts live in `Z_{n^s}`.
    pub s: u32,
    pub exp_unit_bits: usize,
}

impl KeyParams {
    pub const TOY: Self = Self {
        key_bits: 512,
        s: 1,
        exp_unit_bits: DEFAULT_EXP_UNIT_BITS,
    };

    pub const DEFAULT: Self = Self {
        key_bits: 2048,
        s: 1,
        exp_unit_bits: DEFAULT_EXP_UNIT_BITS,
    };

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> dj::Result<()> {
        if self.key_bits < 16 {
            return Err(dj::Error::InvalidKey {
                reason: "key size must be at least 16 bits",
            });
        }
        if self.s == 0 {
            return Err(dj::Error::InvalidKey {
                reason: "s must be at least 1",
            });
        }
        validate_exp_unit_bits(self.exp_unit_bits)
    }
}

impl Default for KeyParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub(crate) fn validate_exp_unit_bits(exp_unit_bits: usize) -> dj::Result<()> {
    if exp_unit_bits == 0 || exp_unit_bits > MAX_EXP_UNIT_BITS {
        return Err(dj::Error::InvalidKey {
            reason: "exp_unit_bits must be between 1 and 16",
        });
    }
    Ok(())
}
