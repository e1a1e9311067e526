//! # Option Model
//!
//! Typed product definitions the engine prices against.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product                                                                │
//! │  ├── base_price_cents                                                   │
//! │  └── option_groups: [OptionGroup]                                       │
//! │          ├── id, title, is_required, position                          │
//! │          └── kind: GroupKind                                            │
//! │                ├── Selector         values: [OptionValue]              │
//! │                │                    single/multi, absolute/percent     │
//! │                ├── QuantityRange    min, max, step, default            │
//! │                └── ContinuousRange  slider bounds, base fee,           │
//! │                                     Flat { unit price }                │
//! │                                     Tiered { tiers, combine }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each variant carries only the fields it needs. Products are built from
//! catalog records through [`crate::definition::ProductDef`], which rejects
//! invalid combinations up front; `check()` re-validates a hand-built value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::grid::Grid;
use crate::money::Money;
use crate::percent::Percent;

/// Identifier of an option group, unique within a product.
pub type GroupId = u32;

/// Identifier of an option value, unique within a product.
pub type ValueId = u32;

// =============================================================================
// Product
// =============================================================================

/// A configurable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(try_from = "UncheckedProduct")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier (slug).
    pub id: String,

    /// Display name.
    pub title: String,

    /// Price of one unit with no options selected, in cents.
    pub base_price_cents: i64,

    /// Option groups in catalog order.
    pub option_groups: Vec<OptionGroup>,
}

impl Product {
    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Looks up a group by id.
    pub fn group(&self, id: GroupId) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == id)
    }

    /// Groups in evaluation order: by `position`, ties by declaration order.
    pub fn groups_in_order(&self) -> Vec<&OptionGroup> {
        let mut groups: Vec<&OptionGroup> = self.option_groups.iter().collect();
        groups.sort_by_key(|g| g.position);
        groups
    }

    /// The product's quantity group, if it has one.
    pub fn quantity_group(&self) -> Option<(&OptionGroup, &QuantityRange)> {
        self.option_groups.iter().find_map(|g| match &g.kind {
            GroupKind::QuantityRange(q) => Some((g, q)),
            _ => None,
        })
    }

    /// Finds the selector group that owns a value id.
    pub fn owner_of(&self, value_id: ValueId) -> Option<(&OptionGroup, &SelectorGroup)> {
        self.option_groups.iter().find_map(|g| match &g.kind {
            GroupKind::Selector(s) if s.value(value_id).is_some() => Some((g, s)),
            _ => None,
        })
    }

    /// Re-runs every construction-time check on this product.
    pub fn check(&self) -> PricingResult<()> {
        let context = format!("product {}", self.id);
        if self.base_price_cents < 0 {
            return Err(PricingError::invalid_config(context, "base price is negative"));
        }

        let mut group_ids = Vec::with_capacity(self.option_groups.len());
        let mut value_ids = Vec::new();
        let mut quantity_groups = 0;

        for group in &self.option_groups {
            if group_ids.contains(&group.id) {
                return Err(PricingError::invalid_config(
                    context,
                    format!("duplicate group id {}", group.id),
                ));
            }
            group_ids.push(group.id);

            match &group.kind {
                GroupKind::Selector(s) => {
                    for value in &s.values {
                        if value_ids.contains(&value.id) {
                            return Err(PricingError::invalid_config(
                                context,
                                format!("duplicate value id {}", value.id),
                            ));
                        }
                        value_ids.push(value.id);
                    }
                }
                GroupKind::QuantityRange(_) => quantity_groups += 1,
                GroupKind::ContinuousRange(_) => {}
            }

            group.check()?;
        }

        if quantity_groups > 1 {
            return Err(PricingError::invalid_config(
                context,
                "more than one quantity group",
            ));
        }
        Ok(())
    }
}

/// Wire shape of [`Product`]; deserialization re-runs [`Product::check`].
#[derive(Deserialize)]
struct UncheckedProduct {
    id: String,
    title: String,
    base_price_cents: i64,
    option_groups: Vec<OptionGroup>,
}

impl TryFrom<UncheckedProduct> for Product {
    type Error = PricingError;

    fn try_from(raw: UncheckedProduct) -> Result<Self, Self::Error> {
        let product = Product {
            id: raw.id,
            title: raw.title,
            base_price_cents: raw.base_price_cents,
            option_groups: raw.option_groups,
        };
        product.check()?;
        Ok(product)
    }
}

// =============================================================================
// Option Group
// =============================================================================

/// One configurable axis of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionGroup {
    pub id: GroupId,
    pub title: String,
    pub is_required: bool,
    /// Display and evaluation order.
    pub position: i32,
    pub kind: GroupKind,
}

impl OptionGroup {
    /// Context string used in configuration errors.
    pub(crate) fn context(&self) -> String {
        format!("group {} ({})", self.id, self.title)
    }

    /// Validates the variant-specific fields.
    pub fn check(&self) -> PricingResult<()> {
        let result = match &self.kind {
            GroupKind::Selector(s) => s.check(),
            GroupKind::QuantityRange(q) => q.check(),
            GroupKind::ContinuousRange(r) => r.check(),
        };
        result.map_err(|reason| PricingError::invalid_config(self.context(), reason))
    }
}

/// Variant-specific part of an option group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum GroupKind {
    /// Radio buttons or checkboxes.
    Selector(SelectorGroup),
    /// Quantity slider.
    QuantityRange(QuantityRange),
    /// Double range slider.
    ContinuousRange(ContinuousRange),
}

impl GroupKind {
    /// Human-readable name of the variant, used in error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            GroupKind::Selector(_) => "selector",
            GroupKind::QuantityRange(_) => "quantity",
            GroupKind::ContinuousRange(_) => "range",
        }
    }
}

// =============================================================================
// Selector
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SelectionMode {
    Single,
    Multi,
}

/// How a selector's values modify the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ModifierMode {
    /// Values carry a delta in cents.
    Absolute,
    /// Values carry a delta in percent.
    Percent,
}

/// Whether a modifier applies to each unit or once to the whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Scope {
    PerUnit,
    PerOrder,
}

/// An enumerated-choice option group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectorGroup {
    pub selection_mode: SelectionMode,
    pub pricing_mode: ModifierMode,
    /// `true` applies each delta per unit, `false` once per order.
    pub multiply_by_qty: bool,
    pub values: Vec<OptionValue>,
}

impl SelectorGroup {
    /// Looks up one of this group's values.
    pub fn value(&self, id: ValueId) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.id == id)
    }

    /// The active value flagged as default, if any.
    pub fn default_value(&self) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.is_default && v.is_active)
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        if self.multiply_by_qty {
            Scope::PerUnit
        } else {
            Scope::PerOrder
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.selection_mode == SelectionMode::Single
            && self.values.iter().filter(|v| v.is_default).count() > 1
        {
            return Err("single-selection group has more than one default".into());
        }
        for value in &self.values {
            if value.delta.mode() != self.pricing_mode {
                return Err(format!(
                    "value {} carries a {:?} delta in a {:?} group",
                    value.id,
                    value.delta.mode(),
                    self.pricing_mode
                ));
            }
        }
        Ok(())
    }
}

/// One choice of a selector group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionValue {
    pub id: ValueId,
    pub title: String,
    pub delta: Delta,
    pub is_active: bool,
    pub is_default: bool,
    pub position: i32,
}

/// Price modifier of an option value.
///
/// Exactly one representation exists per value, matching the group's
/// [`ModifierMode`]; there is no stale second field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Delta {
    Cents {
        cents: i64,
    },
    Percent {
        #[ts(as = "String")]
        percent: Decimal,
    },
}

impl Delta {
    pub const fn mode(&self) -> ModifierMode {
        match self {
            Delta::Cents { .. } => ModifierMode::Absolute,
            Delta::Percent { .. } => ModifierMode::Percent,
        }
    }

    /// The cents delta, if this is an absolute modifier.
    pub const fn cents(&self) -> Option<Money> {
        match self {
            Delta::Cents { cents } => Some(Money::from_cents(*cents)),
            Delta::Percent { .. } => None,
        }
    }

    /// The percent delta, if this is a percent modifier.
    pub const fn percent(&self) -> Option<Percent> {
        match self {
            Delta::Percent { percent } => Some(Percent::from_decimal(*percent)),
            Delta::Cents { .. } => None,
        }
    }
}

// =============================================================================
// Quantity Range
// =============================================================================

/// A bounded quantity slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

impl QuantityRange {
    /// The quantity grid, anchored at zero: selectable quantities are the
    /// multiples of `step` inside `[min, max]`. `None` for a non-positive step.
    pub fn grid(&self) -> Option<Grid> {
        Grid::new(0, self.step)
    }

    /// Smallest selectable quantity, if any.
    pub fn first_selectable(&self) -> Option<i64> {
        let first = self.grid()?.snap_up(self.min);
        (first <= self.max).then_some(first)
    }

    /// True if `qty` is within bounds and on the grid.
    pub fn accepts(&self, qty: i64) -> bool {
        match self.grid() {
            Some(grid) => qty >= self.min && qty <= self.max && grid.is_aligned(qty),
            None => false,
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.step <= 0 {
            return Err("quantity step must be positive".into());
        }
        if self.min < 1 {
            return Err("quantity minimum must be at least 1".into());
        }
        if self.min > self.max {
            return Err(format!("quantity min {} exceeds max {}", self.min, self.max));
        }
        if !self.accepts(self.default) {
            return Err(format!("default quantity {} is not selectable", self.default));
        }
        Ok(())
    }
}

// =============================================================================
// Continuous Range
// =============================================================================

/// A double range slider priced by the span between its two handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContinuousRange {
    pub slider_min: i64,
    pub slider_max: i64,
    pub slider_step: i64,
    pub default_min: i64,
    pub default_max: i64,
    /// Charged once per unit whenever the range is selected.
    pub base_fee_cents: i64,
    /// Cap on `max - min`, enforced for tiered pricing.
    pub max_span: Option<i64>,
    pub pricing: RangePricing,
}

impl ContinuousRange {
    /// The slider grid; `None` for a non-positive step.
    pub fn grid(&self) -> Option<Grid> {
        Grid::new(self.slider_min, self.slider_step)
    }

    #[inline]
    pub fn is_tiered(&self) -> bool {
        matches!(self.pricing, RangePricing::Tiered { .. })
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        let grid = self
            .grid()
            .ok_or_else(|| String::from("slider step must be positive"))?;
        if self.slider_min > self.slider_max {
            return Err(format!(
                "slider min {} exceeds max {}",
                self.slider_min, self.slider_max
            ));
        }
        if !(self.slider_min <= self.default_min
            && self.default_min <= self.default_max
            && self.default_max <= self.slider_max)
        {
            return Err(format!(
                "default range {}..{} is outside the slider",
                self.default_min, self.default_max
            ));
        }
        if !grid.is_aligned(self.default_min) || !grid.is_aligned(self.default_max) {
            return Err("default range is off the step grid".into());
        }
        if self.base_fee_cents < 0 {
            return Err("base fee is negative".into());
        }
        if matches!(self.max_span, Some(span) if span < 0) {
            return Err("max span is negative".into());
        }

        match &self.pricing {
            RangePricing::Flat { unit_price_cents } => {
                if *unit_price_cents < 0 {
                    return Err("unit price is negative".into());
                }
            }
            RangePricing::Tiered { tiers, .. } => {
                if tiers.is_empty() {
                    return Err("tiered range has no tiers".into());
                }
                for (index, tier) in tiers.iter().enumerate() {
                    tier.check().map_err(|reason| format!("tier {}: {}", index, reason))?;
                }
            }
        }
        Ok(())
    }
}

/// How a continuous range turns a span into cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[ts(export)]
pub enum RangePricing {
    /// Same price for every step.
    Flat { unit_price_cents: i64 },
    /// Price varies across the value axis.
    Tiered {
        tiers: Vec<RangeTier>,
        combine: TierCombineStrategy,
    },
}

/// How per-tier segment prices fold into one range price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TierCombineStrategy {
    /// Each segment priced at its own tier, then summed.
    #[default]
    SumPiecewise,
    /// The whole span priced at the most expensive tier touched.
    HighestTierOnly,
    /// The whole span priced at the span-weighted mean tier price.
    WeightedAverage,
}

impl std::str::FromStr for TierCombineStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum_piecewise" => Ok(TierCombineStrategy::SumPiecewise),
            "highest_tier_only" => Ok(TierCombineStrategy::HighestTierOnly),
            "weighted_average" => Ok(TierCombineStrategy::WeightedAverage),
            other => Err(format!("unknown tier combine strategy '{}'", other)),
        }
    }
}

/// A priced sub-range of a tiered slider.
///
/// `from` and `to` are inclusive bounds on the value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeTier {
    pub from: i64,
    pub to: i64,
    pub unit_price_cents: i64,
    /// Billed units are rounded up to a multiple of this many steps.
    #[serde(default)]
    pub min_block: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub multiplier: Option<Decimal>,
    /// Ceiling on this tier's segment subtotal.
    #[serde(default)]
    pub cap_cents: Option<i64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl RangeTier {
    /// `unit_price_cents × multiplier`, the price of one step in this tier.
    ///
    /// `None` if the product overflows.
    pub fn effective_unit_price(&self) -> Option<Decimal> {
        let base = Decimal::from(self.unit_price_cents);
        match self.multiplier {
            Some(m) => base.checked_mul(m),
            None => Some(base),
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.from > self.to {
            return Err(format!("from {} exceeds to {}", self.from, self.to));
        }
        if self.unit_price_cents < 0 {
            return Err("unit price is negative".into());
        }
        if matches!(self.min_block, Some(block) if block <= 0) {
            return Err("min_block must be positive".into());
        }
        if matches!(self.multiplier, Some(m) if m.is_sign_negative()) {
            return Err("multiplier is negative".into());
        }
        if matches!(self.cap_cents, Some(cap) if cap < 0) {
            return Err("cap is negative".into());
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
