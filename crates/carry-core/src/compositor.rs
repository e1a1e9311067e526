//! # Price Compositor
//!
//! Folds the base price, selector modifiers, range contributions and the
//! quantity into a unit price and a line total.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  unit  = round( (base + Σabs_unit + Σrange) × (1 + Σ%unit / 100) )      │
//! │                                                                         │
//! │  subtotal = unit × qty                                                  │
//! │                                                                         │
//! │  total = round( (subtotal + Σabs_order) × (1 + Σ%order / 100) )         │
//! │                                                                         │
//! │  Percentages inside a scope are SUMMED, never compounded.               │
//! │  Rounding (half away from zero) happens at `unit` and `total` only.     │
//! │  Range prices are always per unit.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```text
//! base 10000, +500 per order, +10% per order, qty 2
//!   unit     = 10000
//!   subtotal = 20000
//!   total    = (20000 + 500) × 1.10 = 22550
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::model::{Delta, GroupId, GroupKind, Product, Scope};
use crate::money::Money;
use crate::percent::Percent;
use crate::range::{quote_range, RangeQuote};
use crate::selection::{Selection, SelectionValue};
use crate::validation::Validated;

// =============================================================================
// Result Types
// =============================================================================

/// A range group's contribution, keyed by group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GroupRangeQuote {
    pub group_id: GroupId,
    pub quote: RangeQuote,
}

/// Every intermediate of the pricing formula.
///
/// Returned to the UI so it can explain a price, and frozen into order
/// snapshots so a line can be audited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub base: Money,
    /// Σ absolute deltas with per-unit scope.
    pub add_unit_abs: Money,
    #[ts(as = "String")]
    pub sum_percent_unit: Percent,
    /// Σ range prices, per unit.
    pub range_unit_cents: i64,
    pub qty: i64,
    /// Σ absolute deltas with per-order scope.
    pub add_order_abs: Money,
    #[ts(as = "String")]
    pub sum_percent_order: Percent,
    /// `unit × qty`, before order-scope modifiers.
    pub subtotal_cents: i64,
    pub ranges: Vec<GroupRangeQuote>,
}

/// Final price of one order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceResult {
    pub unit_cents: i64,
    pub line_total_cents: i64,
    pub breakdown: PriceBreakdown,
}

impl PriceResult {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Accumulator
// =============================================================================

/// Running sums per scope while walking the groups.
#[derive(Debug, Default)]
struct Modifiers {
    unit_abs: Money,
    order_abs: Money,
    unit_pct: Percent,
    order_pct: Percent,
}

impl Modifiers {
    fn add(&mut self, scope: Scope, delta: &Delta) -> PricingResult<()> {
        let overflow = PricingError::Overflow { context: "selector modifiers" };
        match (delta, scope) {
            (Delta::Cents { cents }, Scope::PerUnit) => {
                self.unit_abs = self
                    .unit_abs
                    .checked_add(Money::from_cents(*cents))
                    .ok_or(overflow)?;
            }
            (Delta::Cents { cents }, Scope::PerOrder) => {
                self.order_abs = self
                    .order_abs
                    .checked_add(Money::from_cents(*cents))
                    .ok_or(overflow)?;
            }
            (Delta::Percent { percent }, Scope::PerUnit) => {
                self.unit_pct = self
                    .unit_pct
                    .checked_add(Percent::from_decimal(*percent))
                    .ok_or(overflow)?;
            }
            (Delta::Percent { percent }, Scope::PerOrder) => {
                self.order_pct = self
                    .order_pct
                    .checked_add(Percent::from_decimal(*percent))
                    .ok_or(overflow)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Compute
// =============================================================================

/// Prices a validated selection.
///
/// Takes the [`Validated`] proof from [`crate::validation::validate`]; use
/// [`crate::engine::quote`] to run both in one call. Negative results are
/// returned as-is.
pub fn compute(
    product: &Product,
    selection: &Selection,
    validated: &Validated,
) -> PricingResult<PriceResult> {
    let qty = validated.quantity();
    let mut modifiers = Modifiers::default();
    let mut range_unit = Money::zero();
    let mut ranges = Vec::new();

    for group in product.groups_in_order() {
        let value = selection.get(group.id);
        match (&group.kind, value) {
            (GroupKind::Selector(selector), Some(value)) => {
                let ids = value.value_ids().ok_or(PricingError::KindMismatch {
                    group_id: group.id,
                    expected: group.kind.name(),
                })?;
                for id in ids {
                    let option = selector
                        .value(id)
                        .filter(|v| v.is_active)
                        .ok_or(PricingError::UnknownValue { value_id: id })?;
                    modifiers.add(selector.scope(), &option.delta)?;
                }
            }
            (GroupKind::ContinuousRange(range), Some(value)) => {
                let SelectionValue::Range { min, max } = *value else {
                    return Err(PricingError::KindMismatch {
                        group_id: group.id,
                        expected: group.kind.name(),
                    });
                };
                let quote = quote_range(range, min, max)?;
                range_unit = range_unit
                    .checked_add(quote.price())
                    .ok_or(PricingError::Overflow { context: "range contributions" })?;
                ranges.push(GroupRangeQuote { group_id: group.id, quote });
            }
            // Quantity is already resolved on the proof.
            _ => {}
        }
    }

    let base = product.base_price();
    let unit = base
        .checked_add(modifiers.unit_abs)
        .and_then(|m| m.checked_add(range_unit))
        .and_then(|m| m.apply_percent(modifiers.unit_pct))
        .ok_or(PricingError::Overflow { context: "unit price" })?;

    let subtotal = unit
        .checked_mul_qty(qty)
        .ok_or(PricingError::Overflow { context: "subtotal" })?;

    let line_total = subtotal
        .checked_add(modifiers.order_abs)
        .and_then(|m| m.apply_percent(modifiers.order_pct))
        .ok_or(PricingError::Overflow { context: "line total" })?;

    tracing::debug!(
        product = %product.id,
        unit = unit.cents(),
        qty,
        total = line_total.cents(),
        "price computed"
    );

    Ok(PriceResult {
        unit_cents: unit.cents(),
        line_total_cents: line_total.cents(),
        breakdown: PriceBreakdown {
            base,
            add_unit_abs: modifiers.unit_abs,
            sum_percent_unit: modifiers.unit_pct,
            range_unit_cents: range_unit.cents(),
            qty,
            add_order_abs: modifiers.order_abs,
            sum_percent_order: modifiers.order_pct,
            subtotal_cents: subtotal.cents(),
            ranges,
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
