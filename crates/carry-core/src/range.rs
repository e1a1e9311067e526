//! # Range Pricer
//!
//! Turns a `[min, max]` selection on a double range slider into cents.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (min, max)                                                             │
//! │      │  clamp to [slider_min, slider_max], snap down, reorder          │
//! │      ▼                                                                  │
//! │  normalized span ── units = (max - min) / step                          │
//! │      │                                                                  │
//! │      ├── Flat    base_fee + units × unit_price                          │
//! │      │                                                                  │
//! │      └── Tiered  partition into tier segments                           │
//! │                  each: units → min_block round-up → × effective price   │
//! │                        → cap                                            │
//! │                  combine: sum_piecewise | highest_tier_only |           │
//! │                           weighted_average                              │
//! │                  base_fee + combined                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Segment Ownership
//! A tier covers the grid points inside its inclusive `[from, to]`. Its
//! segment is that interval, snapped inward onto the grid and intersected
//! with the part of the span no earlier tier has claimed. Tiers are walked
//! by ascending `from`, so where tiers overlap or share an endpoint the one
//! with the smaller `from` wins. A segment's unit count is
//! `(to - from) / step`, and whatever no tier covers prices at zero.
//!
//! ```text
//!   tiers:  [0 ─── 40]        [60 ──── 100]
//!   span:        [20 ────────────── 80]       step 10
//!                ├──A──┤· · · · ├──B──┤
//!   A = [20, 40] 2 units, [40, 60] uncovered 2 units, B = [60, 80] 2 units
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::grid::{round_up_to_multiple, Grid};
use crate::money::{round_to_cents, Money};
use crate::model::{ContinuousRange, RangePricing, RangeTier, TierCombineStrategy};

// =============================================================================
// Result Types
// =============================================================================

/// One tier's share of a priced span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierSegment {
    /// Index into the tier list (sorted by `from`).
    pub tier_index: usize,
    pub label: Option<String>,
    pub from: i64,
    pub to: i64,
    /// Whole steps the segment covers.
    pub raw_units: i64,
    /// Units charged after `min_block` rounding.
    pub billed_units: i64,
    /// `unit_price_cents × multiplier`.
    #[ts(as = "String")]
    pub effective_unit_price: Decimal,
    /// `billed_units × effective_unit_price`, after the cap.
    #[ts(as = "String")]
    pub subtotal: Decimal,
    /// True if `cap_cents` lowered the subtotal.
    pub capped: bool,
}

/// Full breakdown of one range price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeQuote {
    /// Normalized lower handle.
    pub min: i64,
    /// Normalized upper handle.
    pub max: i64,
    /// Whole steps in the span.
    pub units: i64,
    /// Units no tier covers (always 0 for flat pricing).
    pub uncovered_units: i64,
    /// Tier segments; empty for flat pricing.
    pub segments: Vec<TierSegment>,
    /// Span price before the base fee.
    #[ts(as = "String")]
    pub combined: Decimal,
    pub base_fee_cents: i64,
    /// Final per-unit contribution, rounded half away from zero.
    pub cents: i64,
}

impl RangeQuote {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.cents)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Prices a span of a continuous range group, in cents.
///
/// ## Example
/// ```rust
/// use carry_core::model::{ContinuousRange, RangePricing};
/// use carry_core::range::price_range;
///
/// let levels = ContinuousRange {
///     slider_min: 0,
///     slider_max: 100,
///     slider_step: 10,
///     default_min: 0,
///     default_max: 0,
///     base_fee_cents: 100,
///     max_span: None,
///     pricing: RangePricing::Flat { unit_price_cents: 50 },
/// };
///
/// // 5 steps × 50 + 100 fee
/// assert_eq!(price_range(&levels, 0, 50).unwrap(), 350);
/// ```
pub fn price_range(group: &ContinuousRange, min: i64, max: i64) -> PricingResult<i64> {
    quote_range(group, min, max).map(|q| q.cents)
}

/// Prices a span and returns the full breakdown.
pub fn quote_range(group: &ContinuousRange, min: i64, max: i64) -> PricingResult<RangeQuote> {
    group
        .check()
        .map_err(|reason| PricingError::invalid_config("continuous range", reason))?;
    let grid = group
        .grid()
        .ok_or_else(|| PricingError::invalid_config("continuous range", "slider step must be positive"))?;

    let (min, max) = normalize_span(group, &grid, min, max);
    let units = grid.units(min, max);

    let (segments, combined) = match &group.pricing {
        RangePricing::Flat { unit_price_cents } => {
            let combined = Decimal::from(*unit_price_cents)
                .checked_mul(Decimal::from(units))
                .ok_or(PricingError::Overflow { context: "flat range price" })?;
            (Vec::new(), combined)
        }
        RangePricing::Tiered { tiers, combine } => {
            let segments = partition(tiers, &grid, min, max)?;
            let combined = combine_segments(*combine, &segments, units)?;
            (segments, combined)
        }
    };

    let covered: i64 = segments.iter().map(|s| s.raw_units).sum();
    let uncovered_units = if group.is_tiered() { units - covered } else { 0 };

    let total = combined
        .checked_add(Decimal::from(group.base_fee_cents))
        .ok_or(PricingError::Overflow { context: "range price" })?;
    let cents = round_to_cents(total)
        .ok_or(PricingError::Overflow { context: "range price" })?
        .cents();

    tracing::trace!(
        min,
        max,
        units,
        uncovered_units,
        segments = segments.len(),
        cents,
        "range priced"
    );

    Ok(RangeQuote {
        min,
        max,
        units,
        uncovered_units,
        segments,
        combined,
        base_fee_cents: group.base_fee_cents,
        cents,
    })
}

/// Clamps both handles to the slider, snaps them down onto the grid and
/// puts them in order.
pub fn normalize_span(group: &ContinuousRange, grid: &Grid, min: i64, max: i64) -> (i64, i64) {
    let a = grid.clamp_snap(min, group.slider_min, group.slider_max);
    let b = grid.clamp_snap(max, group.slider_min, group.slider_max);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// =============================================================================
// Tier Partitioning
// =============================================================================

/// Splits `[min, max]` into per-tier segments.
///
/// `min` and `max` must already be on the grid.
fn partition(
    tiers: &[RangeTier],
    grid: &Grid,
    min: i64,
    max: i64,
) -> PricingResult<Vec<TierSegment>> {
    let mut order: Vec<usize> = (0..tiers.len()).collect();
    order.sort_by_key(|&i| tiers[i].from);

    let mut segments = Vec::new();
    // Start of the span not yet claimed by an earlier tier.
    let mut cursor = min;

    for index in order {
        if cursor >= max {
            break;
        }
        let tier = &tiers[index];
        let from = grid.snap_up(tier.from).max(cursor);
        let to = grid.snap_down(tier.to).min(max);
        if from >= to {
            continue;
        }

        let raw_units = grid.units(from, to);
        let billed_units = match tier.min_block {
            Some(block) => round_up_to_multiple(raw_units, block),
            None => raw_units,
        };

        let effective_unit_price = tier
            .effective_unit_price()
            .ok_or(PricingError::Overflow { context: "tier unit price" })?;
        let mut subtotal = effective_unit_price
            .checked_mul(Decimal::from(billed_units))
            .ok_or(PricingError::Overflow { context: "tier subtotal" })?;
        let mut capped = false;
        if let Some(cap) = tier.cap_cents.map(Decimal::from) {
            if subtotal > cap {
                subtotal = cap;
                capped = true;
            }
        }

        segments.push(TierSegment {
            tier_index: index,
            label: tier.label.clone(),
            from,
            to,
            raw_units,
            billed_units,
            effective_unit_price,
            subtotal,
            capped,
        });

        cursor = to;
    }

    Ok(segments)
}

/// Folds segment prices into one span price.
///
/// `min_block` and `cap_cents` shape segment subtotals, so they only affect
/// `SumPiecewise`; the other strategies price the whole span from effective
/// unit prices.
fn combine_segments(
    strategy: TierCombineStrategy,
    segments: &[TierSegment],
    total_units: i64,
) -> PricingResult<Decimal> {
    let overflow = PricingError::Overflow { context: "tier combination" };
    let total_units = Decimal::from(total_units);

    match strategy {
        TierCombineStrategy::SumPiecewise => segments
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.subtotal))
            .ok_or(overflow),

        TierCombineStrategy::HighestTierOnly => {
            let highest = segments.iter().map(|s| s.effective_unit_price).max();
            match highest {
                Some(price) => price.checked_mul(total_units).ok_or(overflow),
                None => Ok(Decimal::ZERO),
            }
        }

        TierCombineStrategy::WeightedAverage => {
            let weight: i64 = segments.iter().map(|s| s.raw_units).sum();
            if weight == 0 {
                return Ok(Decimal::ZERO);
            }
            let weighted = segments
                .iter()
                .try_fold(Decimal::ZERO, |acc, s| {
                    s.effective_unit_price
                        .checked_mul(Decimal::from(s.raw_units))
                        .and_then(|v| acc.checked_add(v))
                })
                .ok_or(overflow.clone())?;
            // Multiply before dividing so exact averages stay exact.
            weighted
                .checked_mul(total_units)
                .and_then(|v| v.checked_div(Decimal::from(weight)))
                .ok_or(overflow)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
