//! # Percent Module
//!
//! Percentage modifiers as exact decimals.
//!
//! Percent-mode option values are stored as whole-percent decimals
//! (`12.5` means +12.5%). Within a scope they are **summed**, never
//! compounded:
//!
//! ```text
//! +10% and +5%   →   factor 1 + (10 + 5) / 100 = 1.15    ✅
//!                    factor 1.10 × 1.05       = 1.155   ❌
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage expressed in whole percent (`10` = 10%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Percent(value)
    }

    /// Convenience for integral percentages.
    #[inline]
    pub fn from_whole(value: i64) -> Self {
        Percent(Decimal::from(value))
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the raw percentage value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the multiplicative factor `1 + pct / 100`.
    ///
    /// `None` only if the percentage is so large the factor overflows.
    pub fn factor(&self) -> Option<Decimal> {
        self.0
            .checked_div(Decimal::ONE_HUNDRED)?
            .checked_add(Decimal::ONE)
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Percent) -> Option<Percent> {
        self.0.checked_add(other.0).map(Percent)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_sum_instead_of_compounding() {
        let total = Percent::from_whole(10).checked_add(Percent::from_whole(5)).unwrap();
        assert_eq!(total.factor(), Some(Decimal::new(115, 2)));
    }

    #[test]
    fn test_zero_factor_is_one() {
        assert_eq!(Percent::zero().factor(), Some(Decimal::ONE));
        assert!(Percent::default().is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Percent::from_decimal(Decimal::new(1250, 2)).to_string(), "12.5%");
        assert_eq!(Percent::from_whole(-10).to_string(), "-10%");
    }

    #[test]
    fn test_serde_is_transparent() {
        let pct = Percent::from_decimal(Decimal::new(125, 1));
        let json = serde_json::to_string(&pct).unwrap();
        assert_eq!(json, "\"12.5\"");
        let back: Percent = serde_json::from_str("12.5").unwrap();
        assert_eq!(back, pct);
    }
}
