//! Helper methods for [`Lovelace`] amounts.
//!
//! Provides convenient constructors and conversions between lovelace and ADA.

use crate::types::Lovelace;

/// 1 ADA = 10^6 lovelace.
const LOVELACE_PER_ADA: u128 = 1_000_000;

impl Lovelace {
    /// Returns the amount in lovelace.
    pub fn as_lovelace(&self) -> u128 {
        self.0
    }

    /// Create a [`Lovelace`] from a raw lovelace amount.
    pub fn from_lovelace(amount: u128) -> Self {
        Self(amount)
    }

    /// Create a [`Lovelace`] from whole ADA (multiplied by 10^6).
    pub fn from_ada(amount: u64) -> Self {
        Self(u128::from(amount) * LOVELACE_PER_ADA)
    }

    /// Approximate value in ADA as `f64` (useful for display).
    pub fn as_ada_f64(&self) -> f64 {
        self.0 as f64 / LOVELACE_PER_ADA as f64
    }

    /// Sum two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Lovelace) -> Option<Lovelace> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl std::iter::Sum for Lovelace {
    fn sum<I: Iterator<Item = Lovelace>>(iter: I) -> Self {
        Self(iter.map(|l| l.0).sum())
    }
}
