//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A preview rendered in the browser and a checkout computed on the      │
//! │  server would disagree by a cent.                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Exact Decimals                           │
//! │    Amounts are i64 cents. Percentages and multipliers are exact        │
//! │    decimals. Rounding happens only where the pricing rules say so.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use carry_core::money::Money;
//! use carry_core::percent::Percent;
//!
//! let base = Money::from_cents(10_000); // $100.00
//! let marked_up = base.apply_percent(Percent::from_whole(15)).unwrap();
//! assert_eq!(marked_up.cents(), 11_500);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::percent::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that discount modifiers (negative deltas) compose naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition; `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a quantity; `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Unit price: $103.00
    /// Quantity:   2 accounts boosted
    ///      │
    ///      ▼
    /// checked_mul_qty(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: $206.00
    /// ```
    #[inline]
    pub const fn checked_mul_qty(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Scales by `(1 + pct / 100)` and rounds half away from zero.
    ///
    /// This is one of the two rounding points of the compositor; callers
    /// must sum every percentage first and call this once.
    ///
    /// ## Example
    /// ```rust
    /// use carry_core::money::Money;
    /// use carry_core::percent::Percent;
    ///
    /// // 20500 × 1.10 = 22550
    /// let total = Money::from_cents(20_500).apply_percent(Percent::from_whole(10));
    /// assert_eq!(total.unwrap().cents(), 22_550);
    ///
    /// // 5 × 1.10 = 5.5 → 6 (half away from zero)
    /// let tiny = Money::from_cents(5).apply_percent(Percent::from_whole(10));
    /// assert_eq!(tiny.unwrap().cents(), 6);
    /// ```
    pub fn apply_percent(self, pct: Percent) -> Option<Money> {
        if pct.is_zero() {
            return Some(self);
        }
        let scaled = Decimal::from(self.0).checked_mul(pct.factor()?)?;
        round_to_cents(scaled)
    }
}

/// Rounds a decimal amount of cents to whole cents, half away from zero.
///
/// `None` if the rounded value does not fit in i64.
pub fn round_to_cents(amount: Decimal) -> Option<Money> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented formatting; the UI formats with the shopper's locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        Decimal::from(money.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_checked_overflow() {
        assert!(Money::from_cents(i64::MAX)
            .checked_add(Money::from_cents(1))
            .is_none());
        assert!(Money::from_cents(i64::MAX / 2).checked_mul_qty(3).is_none());
        assert_eq!(
            Money::from_cents(300).checked_mul_qty(2),
            Some(Money::from_cents(600))
        );
    }

    #[test]
    fn test_apply_percent_rounds_half_away_from_zero() {
        // 15 × 1.10 = 16.5 → 17
        let up = Money::from_cents(15).apply_percent(Percent::from_whole(10));
        assert_eq!(up, Some(Money::from_cents(17)));

        // -15 × 1.10 = -16.5 → -17
        let down = Money::from_cents(-15).apply_percent(Percent::from_whole(10));
        assert_eq!(down, Some(Money::from_cents(-17)));
    }

    #[test]
    fn test_apply_negative_percent() {
        // 10% discount
        let discounted = Money::from_cents(10_000).apply_percent(Percent::from_whole(-10));
        assert_eq!(discounted, Some(Money::from_cents(9_000)));
    }

    #[test]
    fn test_apply_fractional_percent() {
        let pct = Percent::from_decimal(Decimal::new(125, 1)); // 12.5%
        let result = Money::from_cents(1_000).apply_percent(pct);
        assert_eq!(result, Some(Money::from_cents(1_125)));
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(
            round_to_cents(Decimal::new(25, 1)),
            Some(Money::from_cents(3))
        );
        assert_eq!(
            round_to_cents(Decimal::new(24, 1)),
            Some(Money::from_cents(2))
        );
        assert_eq!(
            round_to_cents(Decimal::new(-25, 1)),
            Some(Money::from_cents(-3))
        );
    }
}
