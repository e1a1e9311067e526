//! # Selection Validator
//!
//! Structural and business checks on a selection before it is priced.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Order (fail-fast)                       │
//! │                                                                         │
//! │  1. Every selected group id exists on the product    → UNKNOWN_VALUE    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. Groups in position order:                                           │
//! │     ├── Selector   unknown/inactive ids              → UNKNOWN_VALUE    │
//! │     │              >1 id in a single group           → TOO_MANY_SELECTED│
//! │     │              required and nothing picked       → REQUIRED_GROUP_  │
//! │     │                                                  EMPTY            │
//! │     ├── Quantity   off bounds or off grid            → INVALID_QUANTITY │
//! │     └── Range      required and absent               → REQUIRED_GROUP_  │
//! │                                                        EMPTY            │
//! │                    outside slider / reversed         → OUT_OF_BOUNDS    │
//! │                    off the step grid                 → STEP_MISMATCH    │
//! │                    tiered and wider than max_span    → SPAN_TOO_LARGE   │
//! │                                                                         │
//! │  The preview and the checkout run this exact function.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use carry_core::validation::validate;
//! # fn demo(product: &carry_core::Product, selection: &carry_core::Selection) {
//! match validate(product, selection) {
//!     Ok(_proof) => { /* safe to compute */ }
//!     Err(err) => eprintln!("{}", err),
//! }
//! # }
//! ```

use crate::error::{PricingError, PricingResult};
use crate::model::{
    ContinuousRange, GroupId, GroupKind, OptionGroup, Product, QuantityRange, SelectionMode,
    SelectorGroup,
};
use crate::selection::{Selection, SelectionValue};

/// Proof that a selection passed [`validate`] for some product.
///
/// Only this module can create one, so [`crate::compositor::compute`] cannot
/// be handed an unchecked selection by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    quantity: i64,
}

impl Validated {
    /// Resolved quantity (1 when the product has no quantity group).
    #[inline]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Whole-selection validation
// =============================================================================

/// Validates a selection against a product.
///
/// Returns the first violation found. Never mutates either argument.
pub fn validate(product: &Product, selection: &Selection) -> PricingResult<Validated> {
    for &group_id in selection.groups.keys() {
        if product.group(group_id).is_none() {
            return Err(PricingError::UnknownGroup { group_id });
        }
    }

    let mut quantity = 1;
    for group in product.groups_in_order() {
        if let Some(q) = validate_one(group, selection.get(group.id))? {
            quantity = q;
        }
    }

    tracing::trace!(product = %product.id, quantity, "selection validated");
    Ok(Validated { quantity })
}

/// Validates the selection for a single group.
///
/// For form UIs that want feedback per group instead of fail-fast.
///
/// ## Example
/// ```rust,no_run
/// use carry_core::validation::validate_group;
/// # fn demo(product: &carry_core::Product, selection: &carry_core::Selection) {
/// let errors: Vec<_> = product
///     .option_groups
///     .iter()
///     .filter_map(|g| validate_group(product, g.id, selection).err())
///     .collect();
/// # }
/// ```
pub fn validate_group(
    product: &Product,
    group_id: GroupId,
    selection: &Selection,
) -> PricingResult<()> {
    let group = product
        .group(group_id)
        .ok_or(PricingError::UnknownGroup { group_id })?;
    validate_one(group, selection.get(group_id)).map(|_| ())
}

/// Dispatches on group kind; returns the resolved quantity for quantity groups.
fn validate_one(
    group: &OptionGroup,
    value: Option<&SelectionValue>,
) -> PricingResult<Option<i64>> {
    match &group.kind {
        GroupKind::Selector(selector) => {
            validate_selector(group, selector, value)?;
            Ok(None)
        }
        GroupKind::QuantityRange(range) => validate_quantity(group, range, value).map(Some),
        GroupKind::ContinuousRange(range) => {
            validate_range(group, range, value)?;
            Ok(None)
        }
    }
}

// =============================================================================
// Per-kind validators
// =============================================================================

fn validate_selector(
    group: &OptionGroup,
    selector: &SelectorGroup,
    value: Option<&SelectionValue>,
) -> PricingResult<()> {
    let ids = match value {
        None => Vec::new(),
        Some(v) => v.value_ids().ok_or(PricingError::KindMismatch {
            group_id: group.id,
            expected: group.kind.name(),
        })?,
    };

    for &value_id in &ids {
        match selector.value(value_id) {
            Some(v) if v.is_active => {}
            _ => return Err(PricingError::UnknownValue { value_id }),
        }
    }

    if selector.selection_mode == SelectionMode::Single && ids.len() > 1 {
        return Err(PricingError::TooManySelected {
            group_id: group.id,
            count: ids.len(),
        });
    }

    if group.is_required && ids.is_empty() {
        return Err(PricingError::RequiredGroupEmpty { group_id: group.id });
    }

    Ok(())
}

/// Resolves and checks the quantity, falling back to the group default.
fn validate_quantity(
    group: &OptionGroup,
    range: &QuantityRange,
    value: Option<&SelectionValue>,
) -> PricingResult<i64> {
    let quantity = match value {
        Some(SelectionValue::Quantity { value }) => *value,
        Some(_) => {
            return Err(PricingError::KindMismatch {
                group_id: group.id,
                expected: group.kind.name(),
            })
        }
        None => range.default,
    };

    if !range.accepts(quantity) {
        return Err(PricingError::InvalidQuantity {
            group_id: group.id,
            quantity,
            min: range.min,
            max: range.max,
            step: range.step,
        });
    }
    Ok(quantity)
}

fn validate_range(
    group: &OptionGroup,
    range: &ContinuousRange,
    value: Option<&SelectionValue>,
) -> PricingResult<()> {
    let (min, max) = match value {
        Some(SelectionValue::Range { min, max }) => (*min, *max),
        Some(_) => {
            return Err(PricingError::KindMismatch {
                group_id: group.id,
                expected: group.kind.name(),
            })
        }
        None if group.is_required => {
            return Err(PricingError::RequiredGroupEmpty { group_id: group.id })
        }
        None => return Ok(()),
    };

    let in_slider = |v: i64| v >= range.slider_min && v <= range.slider_max;
    if !in_slider(min) || !in_slider(max) || min > max {
        return Err(PricingError::OutOfBounds {
            group_id: group.id,
            min,
            max,
            slider_min: range.slider_min,
            slider_max: range.slider_max,
        });
    }

    let grid = range.grid().ok_or_else(|| {
        PricingError::invalid_config(group.context(), "slider step must be positive")
    })?;
    for endpoint in [min, max] {
        if !grid.is_aligned(endpoint) {
            return Err(PricingError::StepMismatch {
                group_id: group.id,
                value: endpoint,
                anchor: range.slider_min,
                step: range.slider_step,
            });
        }
    }

    if let (true, Some(max_span)) = (range.is_tiered(), range.max_span) {
        let span = max
            .checked_sub(min)
            .ok_or(PricingError::Overflow { context: "range span" })?;
        if span > max_span {
            return Err(PricingError::SpanTooLarge {
                group_id: group.id,
                span,
                max_span,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{
        Delta, ModifierMode, OptionValue, RangePricing, RangeTier, TierCombineStrategy,
    };

    fn selector_group(id: GroupId, mode: SelectionMode, required: bool) -> OptionGroup {
        let value = |id, is_active| OptionValue {
            id,
            title: format!("Value {}", id),
            delta: Delta::Cents { cents: 100 },
            is_active,
            is_default: false,
            position: 0,
        };
        OptionGroup {
            id,
            title: "Selector".into(),
            is_required: required,
            position: 0,
            kind: GroupKind::Selector(SelectorGroup {
                selection_mode: mode,
                pricing_mode: ModifierMode::Absolute,
                multiply_by_qty: true,
                values: vec![
                    value(id * 10, true),
                    value(id * 10 + 1, true),
                    value(id * 10 + 2, false),
                ],
            }),
        }
    }

    fn quantity_group(id: GroupId) -> OptionGroup {
        OptionGroup {
            id,
            title: "Quantity".into(),
            is_required: false,
            position: 1,
            kind: GroupKind::QuantityRange(QuantityRange {
                min: 2,
                max: 20,
                step: 5,
                default: 5,
            }),
        }
    }

    fn range_group(id: GroupId, required: bool, pricing: RangePricing) -> OptionGroup {
        OptionGroup {
            id,
            title: "Range".into(),
            is_required: required,
            position: 2,
            kind: GroupKind::ContinuousRange(ContinuousRange {
                slider_min: 0,
                slider_max: 100,
                slider_step: 10,
                default_min: 0,
                default_max: 10,
                base_fee_cents: 0,
                max_span: Some(30),
                pricing,
            }),
        }
    }

    fn tiered() -> RangePricing {
        RangePricing::Tiered {
            tiers: vec![RangeTier {
                from: 0,
                to: 100,
                unit_price_cents: 10,
                min_block: None,
                multiplier: None,
                cap_cents: None,
                label: None,
            }],
            combine: TierCombineStrategy::SumPiecewise,
        }
    }

    fn product(groups: Vec<OptionGroup>) -> Product {
        Product {
            id: "test".into(),
            title: "Test".into(),
            base_price_cents: 10_000,
            option_groups: groups,
        }
    }

    #[test]
    fn test_required_selector_empty() {
        let p = product(vec![selector_group(1, SelectionMode::Single, true)]);
        assert_eq!(
            validate(&p, &Selection::new()),
            Err(PricingError::RequiredGroupEmpty { group_id: 1 })
        );
        assert!(validate(&p, &Selection::new().single(1, 10)).is_ok());
    }

    #[test]
    fn test_required_multi_selector_empty_set() {
        let p = product(vec![selector_group(1, SelectionMode::Multi, true)]);
        let err = validate(&p, &Selection::new().multi(1, [])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequiredGroupEmpty);
    }

    #[test]
    fn test_too_many_selected() {
        let p = product(vec![selector_group(1, SelectionMode::Single, false)]);
        assert_eq!(
            validate(&p, &Selection::new().multi(1, [10, 11])),
            Err(PricingError::TooManySelected { group_id: 1, count: 2 })
        );

        let multi = product(vec![selector_group(1, SelectionMode::Multi, false)]);
        assert!(validate(&multi, &Selection::new().multi(1, [10, 11])).is_ok());
    }

    #[test]
    fn test_unknown_and_inactive_values() {
        let p = product(vec![
            selector_group(1, SelectionMode::Single, false),
            selector_group(2, SelectionMode::Single, false),
        ]);
        // Value 20 belongs to group 2, not group 1
        assert_eq!(
            validate(&p, &Selection::new().single(1, 20)),
            Err(PricingError::UnknownValue { value_id: 20 })
        );
        // Value 12 is inactive
        assert_eq!(
            validate(&p, &Selection::new().single(1, 12)),
            Err(PricingError::UnknownValue { value_id: 12 })
        );
        // Group 9 does not exist
        assert_eq!(
            validate(&p, &Selection::new().single(9, 90)),
            Err(PricingError::UnknownGroup { group_id: 9 })
        );
    }

    #[test]
    fn test_quantity_off_grid() {
        let p = product(vec![quantity_group(4)]);
        let err = validate(&p, &Selection::new().quantity(4, 7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuantity);

        assert_eq!(validate(&p, &Selection::new().quantity(4, 10)).unwrap().quantity(), 10);
        assert!(validate(&p, &Selection::new().quantity(4, 2)).is_err());
        assert!(validate(&p, &Selection::new().quantity(4, 12)).is_err());
        assert!(validate(&p, &Selection::new().quantity(4, 25)).is_err());
        assert!(validate(&p, &Selection::new().quantity(4, 0)).is_err());
    }

    #[test]
    fn test_quantity_defaults_when_absent() {
        let p = product(vec![quantity_group(4)]);
        assert_eq!(validate(&p, &Selection::new()).unwrap().quantity(), 5);

        let no_quantity = product(vec![]);
        assert_eq!(validate(&no_quantity, &Selection::new()).unwrap().quantity(), 1);
    }

    #[test]
    fn test_kind_mismatch() {
        let p = product(vec![quantity_group(4)]);
        let err = validate(&p, &Selection::new().range(4, 0, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindMismatch);
    }

    #[test]
    fn test_range_bounds_and_grid() {
        let flat = RangePricing::Flat { unit_price_cents: 10 };
        let p = product(vec![range_group(3, true, flat)]);

        assert_eq!(
            validate(&p, &Selection::new()),
            Err(PricingError::RequiredGroupEmpty { group_id: 3 })
        );
        assert_eq!(
            validate(&p, &Selection::new().range(3, 0, 110)).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(
            validate(&p, &Selection::new().range(3, 50, 20)).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(
            validate(&p, &Selection::new().range(3, 0, 55)),
            Err(PricingError::StepMismatch {
                group_id: 3,
                value: 55,
                anchor: 0,
                step: 10
            })
        );
        // max_span only applies to tiered ranges
        assert!(validate(&p, &Selection::new().range(3, 0, 100)).is_ok());
    }

    #[test]
    fn test_span_too_large_for_tiered() {
        let p = product(vec![range_group(3, false, tiered())]);
        assert_eq!(
            validate(&p, &Selection::new().range(3, 10, 50)),
            Err(PricingError::SpanTooLarge {
                group_id: 3,
                span: 40,
                max_span: 30
            })
        );
        assert!(validate(&p, &Selection::new().range(3, 10, 40)).is_ok());
        assert!(validate(&p, &Selection::new()).is_ok());
    }

    #[test]
    fn test_span_at_i64_extremes_is_overflow() {
        let mut group = range_group(3, false, tiered());
        if let GroupKind::ContinuousRange(range) = &mut group.kind {
            range.slider_min = i64::MIN;
            range.slider_max = i64::MAX;
            range.slider_step = 1;
            range.default_min = 0;
            range.default_max = 0;
        }
        let p = product(vec![group]);
        assert_eq!(
            validate(&p, &Selection::new().range(3, i64::MIN, i64::MAX)),
            Err(PricingError::Overflow { context: "range span" })
        );
    }

    #[test]
    fn test_fail_fast_follows_position_order() {
        let mut late = selector_group(1, SelectionMode::Single, true);
        late.position = 5;
        let mut early = selector_group(2, SelectionMode::Single, true);
        early.position = 0;
        let p = product(vec![late, early]);

        assert_eq!(
            validate(&p, &Selection::new()),
            Err(PricingError::RequiredGroupEmpty { group_id: 2 })
        );
    }

    #[test]
    fn test_validate_group_in_isolation() {
        let p = product(vec![
            selector_group(1, SelectionMode::Single, true),
            quantity_group(4),
        ]);
        let selection = Selection::new().quantity(4, 7);
        assert!(validate_group(&p, 1, &selection).is_err());
        assert!(validate_group(&p, 4, &selection).is_err());
        assert!(validate_group(&p, 4, &Selection::new()).is_ok());
    }
}
