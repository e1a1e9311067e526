//! # Catalog Definitions
//!
//! The flat record shape product definitions are stored in, and its
//! conversion into the typed [`Product`] model.
//!
//! ## Why Two Shapes?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storage (ProductDef)                 Engine (Product)                  │
//! │  ─────────────────────                ────────────────                  │
//! │  one record per group                 one enum variant per group kind   │
//! │  every variant's fields nullable      only the fields the kind needs    │
//! │  modes as free strings                modes as enums                    │
//! │  delta_cents + delta_percent          Delta::Cents | Delta::Percent     │
//! │                                                                         │
//! │            ──── Product::try_from(def) ────►                            │
//! │            rejects every invalid combination with INVALID_GROUP_CONFIG  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use carry_core::definition::ProductDef;
//! use carry_core::model::Product;
//!
//! let def: ProductDef = serde_json::from_str(r#"{
//!     "id": "rank-boost",
//!     "title": "Rank Boost",
//!     "base_price_cents": 10000,
//!     "option_groups": [{
//!         "id": 1, "title": "Priority", "type": "selector",
//!         "selection_mode": "single", "pricing_mode": "absolute",
//!         "multiply_by_qty": true,
//!         "values": [{ "id": 10, "title": "Express", "delta_cents": 300 }]
//!     }]
//! }"#).unwrap();
//!
//! let product = Product::try_from(def).unwrap();
//! assert_eq!(product.option_groups.len(), 1);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};
use crate::model::{
    ContinuousRange, Delta, GroupId, GroupKind, ModifierMode, OptionGroup, OptionValue, Product,
    QuantityRange, RangePricing, RangeTier, SelectionMode, SelectorGroup, TierCombineStrategy,
    ValueId,
};

// =============================================================================
// Raw Records
// =============================================================================

/// A product as stored by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub base_price_cents: i64,
    #[serde(default)]
    pub option_groups: Vec<OptionGroupDef>,
}

/// An option group as stored by the catalog; per-kind fields are nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionGroupDef {
    pub id: GroupId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub group_type: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub position: i32,

    // Selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiply_by_qty: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<OptionValueDef>,

    // Quantity range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,

    // Continuous range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_step: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_span: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<RangeTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_combine_strategy: Option<String>,
}

/// An option value as stored by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValueDef {
    pub id: ValueId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_percent: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub position: i32,
}

impl Default for OptionValueDef {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            delta_cents: None,
            delta_percent: None,
            is_active: true,
            is_default: false,
            position: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Group Type Names
// =============================================================================

/// Catalog spelling of each group kind, with the admin UI's legacy aliases.
fn parse_group_type(raw: &str) -> Option<GroupTypeTag> {
    match raw {
        "selector" | "radio" | "checkbox" | "select" => Some(GroupTypeTag::Selector),
        "quantity_range" | "quantity_slider" => Some(GroupTypeTag::Quantity),
        "continuous_range" | "double_range_slider" => Some(GroupTypeTag::Continuous),
        _ => None,
    }
}

enum GroupTypeTag {
    Selector,
    Quantity,
    Continuous,
}

// =============================================================================
// Conversion
// =============================================================================

impl TryFrom<ProductDef> for Product {
    type Error = PricingError;

    fn try_from(def: ProductDef) -> PricingResult<Self> {
        let option_groups = def
            .option_groups
            .into_iter()
            .map(OptionGroup::try_from)
            .collect::<PricingResult<Vec<_>>>()?;

        let product = Product {
            id: def.id,
            title: def.title,
            base_price_cents: def.base_price_cents,
            option_groups,
        };
        product.check()?;
        Ok(product)
    }
}

impl TryFrom<OptionGroupDef> for OptionGroup {
    type Error = PricingError;

    fn try_from(def: OptionGroupDef) -> PricingResult<Self> {
        let context = format!("group {} ({})", def.id, def.title);
        let fail = |reason: String| PricingError::invalid_config(context.clone(), reason);

        let kind = match parse_group_type(&def.group_type) {
            Some(GroupTypeTag::Selector) => GroupKind::Selector(selector_from_def(&def).map_err(fail)?),
            Some(GroupTypeTag::Quantity) => {
                GroupKind::QuantityRange(quantity_from_def(&def).map_err(fail)?)
            }
            Some(GroupTypeTag::Continuous) => {
                GroupKind::ContinuousRange(range_from_def(&def).map_err(fail)?)
            }
            None => return Err(fail(format!("unknown group type '{}'", def.group_type))),
        };

        let group = OptionGroup {
            id: def.id,
            title: def.title,
            is_required: def.is_required,
            position: def.position,
            kind,
        };
        group.check()?;
        Ok(group)
    }
}

fn required<T: Copy>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing {}", field))
}

fn selector_from_def(def: &OptionGroupDef) -> Result<SelectorGroup, String> {
    let selection_mode = match def.selection_mode.as_deref() {
        Some("single") | None => SelectionMode::Single,
        Some("multi") | Some("multiple") => SelectionMode::Multi,
        Some(other) => return Err(format!("unknown selection mode '{}'", other)),
    };
    let pricing_mode = match def.pricing_mode.as_deref() {
        Some("absolute") => ModifierMode::Absolute,
        Some("percent") => ModifierMode::Percent,
        Some(other) => return Err(format!("unknown selector pricing mode '{}'", other)),
        None => return Err("missing pricing_mode".into()),
    };

    let values = def
        .values
        .iter()
        .map(|v| value_from_def(v, pricing_mode))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SelectorGroup {
        selection_mode,
        pricing_mode,
        multiply_by_qty: def.multiply_by_qty.unwrap_or(true),
        values,
    })
}

fn value_from_def(def: &OptionValueDef, mode: ModifierMode) -> Result<OptionValue, String> {
    let delta = match (mode, def.delta_cents, def.delta_percent) {
        (ModifierMode::Absolute, Some(cents), None) => Delta::Cents { cents },
        (ModifierMode::Percent, None, Some(percent)) => Delta::Percent { percent },
        (ModifierMode::Absolute, None, None) => Delta::Cents { cents: 0 },
        (ModifierMode::Percent, None, None) => Delta::Percent {
            percent: Decimal::ZERO,
        },
        (ModifierMode::Absolute, _, Some(_)) => {
            return Err(format!("value {} has a stale delta_percent", def.id))
        }
        (ModifierMode::Percent, Some(_), _) => {
            return Err(format!("value {} has a stale delta_cents", def.id))
        }
    };

    Ok(OptionValue {
        id: def.id,
        title: def.title.clone(),
        delta,
        is_active: def.is_active,
        is_default: def.is_default,
        position: def.position,
    })
}

fn quantity_from_def(def: &OptionGroupDef) -> Result<QuantityRange, String> {
    let mut range = QuantityRange {
        min: required(def.min, "min")?,
        max: required(def.max, "max")?,
        step: def.step.unwrap_or(1),
        default: 0,
    };
    range.default = match def.default {
        Some(default) => default,
        None => range.first_selectable().unwrap_or(range.min),
    };
    Ok(range)
}

fn range_from_def(def: &OptionGroupDef) -> Result<ContinuousRange, String> {
    let slider_min = required(def.slider_min, "slider_min")?;
    let slider_max = required(def.slider_max, "slider_max")?;

    let pricing = match def.pricing_mode.as_deref() {
        Some("flat") => RangePricing::Flat {
            unit_price_cents: required(def.unit_price_cents, "unit_price_cents")?,
        },
        Some("tiered") => {
            let combine = match def.tier_combine_strategy.as_deref() {
                Some(raw) => raw.parse::<TierCombineStrategy>()?,
                None => TierCombineStrategy::default(),
            };
            let mut tiers = def.tiers.clone();
            tiers.sort_by_key(|t| t.from);
            RangePricing::Tiered { tiers, combine }
        }
        Some(other) => return Err(format!("unknown range pricing mode '{}'", other)),
        None => return Err("missing pricing_mode".into()),
    };

    Ok(ContinuousRange {
        slider_min,
        slider_max,
        slider_step: def.slider_step.unwrap_or(1),
        default_min: def.default_min.unwrap_or(slider_min),
        default_max: def.default_max.unwrap_or(slider_max),
        base_fee_cents: def.base_fee_cents.unwrap_or(0),
        max_span: def.max_span,
        pricing,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn group(group_type: &str) -> OptionGroupDef {
        OptionGroupDef {
            id: 1,
            title: "Group".into(),
            group_type: group_type.into(),
            ..Default::default()
        }
    }

    fn value(id: ValueId) -> OptionValueDef {
        OptionValueDef {
            id,
            title: format!("Value {}", id),
            delta_cents: None,
            delta_percent: None,
            is_active: true,
            is_default: false,
            position: 0,
        }
    }

    #[test]
    fn test_selector_conversion() {
        let mut def = group("radio");
        def.pricing_mode = Some("percent".into());
        def.multiply_by_qty = Some(false);
        let mut v = value(10);
        v.delta_percent = Some(Decimal::new(125, 1));
        def.values.push(v);

        let converted = OptionGroup::try_from(def).unwrap();
        match converted.kind {
            GroupKind::Selector(s) => {
                assert_eq!(s.selection_mode, SelectionMode::Single);
                assert_eq!(s.pricing_mode, ModifierMode::Percent);
                assert!(!s.multiply_by_qty);
                assert_eq!(
                    s.values[0].delta,
                    Delta::Percent {
                        percent: Decimal::new(125, 1)
                    }
                );
            }
            other => panic!("expected selector, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_delta_is_rejected() {
        let mut def = group("selector");
        def.pricing_mode = Some("absolute".into());
        let mut v = value(10);
        v.delta_cents = Some(300);
        v.delta_percent = Some(Decimal::TEN);
        def.values.push(v);

        let err = OptionGroup::try_from(def).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGroupConfig);
    }

    #[test]
    fn test_unknown_range_pricing_mode_is_config_error() {
        let mut def = group("double_range_slider");
        def.slider_min = Some(0);
        def.slider_max = Some(100);
        def.pricing_mode = Some("bracketed".into());

        let err = OptionGroup::try_from(def).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGroupConfig);
        assert!(err.to_string().contains("bracketed"));
    }

    #[test]
    fn test_tiered_without_tiers_is_config_error() {
        let mut def = group("continuous_range");
        def.slider_min = Some(0);
        def.slider_max = Some(100);
        def.pricing_mode = Some("tiered".into());

        let err = OptionGroup::try_from(def).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGroupConfig);
    }

    #[test]
    fn test_tiers_are_sorted_by_from() {
        let mut def = group("continuous_range");
        def.slider_min = Some(0);
        def.slider_max = Some(100);
        def.pricing_mode = Some("tiered".into());
        def.tier_combine_strategy = Some("highest_tier_only".into());
        for (from, to) in [(50, 100), (0, 49)] {
            def.tiers.push(RangeTier {
                from,
                to,
                unit_price_cents: 10,
                min_block: None,
                multiplier: None,
                cap_cents: None,
                label: None,
            });
        }

        let converted = OptionGroup::try_from(def).unwrap();
        let GroupKind::ContinuousRange(range) = converted.kind else {
            panic!("expected a continuous range");
        };
        let RangePricing::Tiered { tiers, combine } = range.pricing else {
            panic!("expected tiered pricing");
        };
        assert_eq!(combine, TierCombineStrategy::HighestTierOnly);
        assert_eq!(tiers[0].from, 0);
        assert_eq!(range.default_max, 100);
    }

    #[test]
    fn test_quantity_defaults_to_first_selectable() {
        let mut def = group("quantity_slider");
        def.min = Some(2);
        def.max = Some(20);
        def.step = Some(5);

        let converted = OptionGroup::try_from(def).unwrap();
        assert_eq!(
            converted.kind,
            GroupKind::QuantityRange(QuantityRange {
                min: 2,
                max: 20,
                step: 5,
                default: 5
            })
        );
    }

    #[test]
    fn test_duplicate_quantity_groups_rejected() {
        let mut first = group("quantity_range");
        first.min = Some(1);
        first.max = Some(5);
        let mut second = first.clone();
        second.id = 2;

        let def = ProductDef {
            id: "dup".into(),
            title: "Dup".into(),
            base_price_cents: 100,
            option_groups: vec![first, second],
        };
        let err = Product::try_from(def).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGroupConfig);
    }

    #[test]
    fn test_unknown_group_type() {
        let err = OptionGroup::try_from(group("color_picker")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGroupConfig);
    }
}
