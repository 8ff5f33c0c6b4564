use std::{
    cmp::Ordering,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct Plaintext(BigInt);

impl Plaintext {
    pub fn new(value: BigInt) -> Self {
        Self(value)
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    pub fn magnitude(&self) -> &BigUint {
        self.0.magnitude()
    }

    /// Compares `|self|` against `rhs`.
    pub fn abs_cmp(&self, rhs: &BigUint) -> Ordering {
        self.0.magnitude().cmp(rhs)
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }
}

impl From<i64> for Plaintext {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i32> for Plaintext {
    fn from(value: i32) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u64> for Plaintext {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<BigUint> for Plaintext {
    fn from(value: BigUint) -> Self {
        Self(BigInt::from(value))
    }
}

macro_rules! impl_plaintext_binop {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident) => {
        impl $op<Plaintext> for Plaintext {
            type Output = Plaintext;
            fn $method(self, rhs: Plaintext) -> Plaintext {
                Plaintext($op::$method(self.0, rhs.0))
            }
        }

        impl $op<&Plaintext> for Plaintext {
            type Output = Plaintext;
            fn $method(self, rhs: &Plaintext) -> Plaintext {
                Plaintext($op::$method(self.0, &rhs.0))
            }
        }

        impl $op<Plaintext> for &Plaintext {
            type Output = Plaintext;
            fn $method(self, rhs: Plaintext) -> Plaintext {
                Plaintext($op::$method(&self.0, rhs.0))
            }
        }

        impl $op<&Plaintext> for &Plaintext {
            type Output = Plaintext;
            fn $method(self, rhs: &Plaintext) -> Plaintext {
                Plaintext($op::$method(&self.0, &rhs.0))
            }
        }

        impl $op_assign<Plaintext> for Plaintext {
            fn $method_assign(&mut self, rhs: Plaintext) {
                $op_assign::$method_assign(&mut self.0, rhs.0);
            }
        }

        impl $op_assign<&Plaintext> for Plaintext {
            fn $method_assign(&mut self, rhs: &Plaintext) {
                $op_assign::$method_assign(&mut self.0, &rhs.0);
            }
        }
    };
}

impl_plaintext_binop!(Add, add, AddAssign, add_assign);
impl_plaintext_binop!(Sub, sub, SubAssign, sub_assign);
impl_plaintext_binop!(Mul, mul, MulAssign, mul_assign);

impl Neg for Plaintext {
    type Output = Plaintext;
    fn neg(self) -> Plaintext {
        Plaintext(-self.0)
    }
}

impl Neg for &Plaintext {
    type Output = Plaintext;
    fn neg(self) -> Plaintext {
        Plaintext(-&self.0)
    }
}
