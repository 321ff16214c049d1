//! Fixed-point money amounts.
//!
//! Amounts are stored in the smallest currency unit (e.g. cents) to keep
//! arithmetic exact. All arithmetic is checked; overflow surfaces as a
//! `Validation` error instead of wrapping.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A fixed-point monetary amount in smallest currency unit (e.g., cents).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from a raw amount in smallest currency unit.
    pub const fn from_minor_units(amount: i64) -> Self {
        Self(amount)
    }

    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition.
    pub fn add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::validation("money addition overflow"))
    }

    /// Checked multiplication by a quantity (e.g. line-item subtotal).
    pub fn mul_quantity(self, quantity: u32) -> DomainResult<Money> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Money)
            .ok_or_else(|| DomainError::validation("money multiplication overflow"))
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    /// Renders as a decimal with two fractional digits, e.g. `12.00`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
