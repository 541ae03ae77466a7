use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::op;

//--------------------------------------      Earnings       ---------------------------------------------------------
/// A courier payout, in whole currency units.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Earnings(i64);

op!(binary Earnings, Add, add);
op!(inplace Earnings, AddAssign, add_assign);

impl Mul<i64> for Earnings {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Earnings {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<i64> for Earnings {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Earnings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}₽", self.0)
    }
}

impl Earnings {
    pub fn value(&self) -> i64 {
        self.0
    }
}
