use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::op;

/// Weights are compared with this tolerance so that sums like `0.1 + 0.2` still fit a `0.3` limit.
const TOLERANCE: f64 = 1e-9;

//--------------------------------------     Kilograms       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Kilograms(f64);

op!(binary Kilograms, Add, add);
op!(inplace Kilograms, AddAssign, add_assign);

impl Sum for Kilograms {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<f64> for Kilograms {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Display for Kilograms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}kg", self.0)
    }
}

impl Kilograms {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// True if this weight does not exceed `limit`.
    pub fn fits_within(&self, limit: Kilograms) -> bool {
        self.0 <= limit.0 + TOLERANCE
    }
}
