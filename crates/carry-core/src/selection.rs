//! # Selection
//!
//! What the shopper picked, keyed by option group.
//!
//! ## Lifecycle
//! ```text
//! Client request ──► SelectionPayload ──from_payload──► Selection
//!                                                          │
//!                                              validate ◄──┤
//!                                              compute  ◄──┘
//!                                                          │
//!                                                       dropped
//! ```
//!
//! A selection has no identity of its own; it lives for one pricing call.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::model::{GroupId, GroupKind, Product, SelectionMode, ValueId};

// =============================================================================
// Selection Values
// =============================================================================

/// The selection for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum SelectionValue {
    /// One value of a selector group.
    SingleId { id: ValueId },
    /// Any number of values of a selector group.
    MultiIds { ids: BTreeSet<ValueId> },
    /// Quantity slider position.
    Quantity { value: i64 },
    /// Both handles of a range slider.
    Range { min: i64, max: i64 },
}

impl SelectionValue {
    /// Value ids picked, for selector selections.
    pub fn value_ids(&self) -> Option<Vec<ValueId>> {
        match self {
            SelectionValue::SingleId { id } => Some(vec![*id]),
            SelectionValue::MultiIds { ids } => Some(ids.iter().copied().collect()),
            _ => None,
        }
    }
}

/// A complete selection for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Selection {
    pub groups: BTreeMap<GroupId, SelectionValue>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection for a group, replacing any previous one.
    pub fn insert(&mut self, group_id: GroupId, value: SelectionValue) {
        self.groups.insert(group_id, value);
    }

    pub fn get(&self, group_id: GroupId) -> Option<&SelectionValue> {
        self.groups.get(&group_id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Picks one value of a selector group.
    pub fn single(mut self, group_id: GroupId, value_id: ValueId) -> Self {
        self.insert(group_id, SelectionValue::SingleId { id: value_id });
        self
    }

    /// Picks several values of a selector group.
    pub fn multi(mut self, group_id: GroupId, value_ids: impl IntoIterator<Item = ValueId>) -> Self {
        self.insert(
            group_id,
            SelectionValue::MultiIds {
                ids: value_ids.into_iter().collect(),
            },
        );
        self
    }

    /// Sets a quantity slider.
    pub fn quantity(mut self, group_id: GroupId, value: i64) -> Self {
        self.insert(group_id, SelectionValue::Quantity { value });
        self
    }

    /// Sets both handles of a range slider.
    pub fn range(mut self, group_id: GroupId, min: i64, max: i64) -> Self {
        self.insert(group_id, SelectionValue::Range { min, max });
        self
    }

    // -------------------------------------------------------------------------
    // Construction from product data
    // -------------------------------------------------------------------------

    /// Resolves a raw client payload against a product.
    ///
    /// ## Rules
    /// - Each value id goes to the selector group that owns it; an id owned
    ///   by no group is `UnknownValue`.
    /// - A single-mode group with exactly one id gets `SingleId`; more ids
    ///   stay `MultiIds` so validation reports `TooManySelected`.
    /// - The quantity attaches to the product's quantity group.
    /// - Range bounds are keyed by group id and must target a range group.
    ///
    /// ## Example
    /// ```rust
    /// use carry_core::definition::ProductDef;
    /// use carry_core::model::Product;
    /// use carry_core::selection::{Selection, SelectionPayload, SelectionValue};
    ///
    /// let def: ProductDef = serde_json::from_str(r#"{
    ///     "id": "coaching", "title": "Coaching", "base_price_cents": 5000,
    ///     "option_groups": [{
    ///         "id": 1, "title": "Hours", "type": "quantity_range",
    ///         "min": 1, "max": 10
    ///     }]
    /// }"#).unwrap();
    /// let product = Product::try_from(def).unwrap();
    ///
    /// let payload: SelectionPayload = serde_json::from_str(r#"{ "quantity": 3 }"#).unwrap();
    /// let selection = Selection::from_payload(&product, &payload).unwrap();
    /// assert_eq!(selection.get(1), Some(&SelectionValue::Quantity { value: 3 }));
    /// ```
    pub fn from_payload(product: &Product, payload: &SelectionPayload) -> PricingResult<Self> {
        let mut picked: BTreeMap<GroupId, BTreeSet<ValueId>> = BTreeMap::new();
        for &value_id in &payload.value_ids {
            let (group, _) = product
                .owner_of(value_id)
                .ok_or(PricingError::UnknownValue { value_id })?;
            picked.entry(group.id).or_default().insert(value_id);
        }

        let mut selection = Selection::new();
        for (group_id, ids) in picked {
            let single_mode = matches!(
                product.group(group_id).map(|g| &g.kind),
                Some(GroupKind::Selector(s)) if s.selection_mode == SelectionMode::Single
            );
            let value = match (single_mode, ids.len()) {
                (true, 1) => SelectionValue::SingleId {
                    id: ids.iter().copied().next().unwrap_or_default(),
                },
                _ => SelectionValue::MultiIds { ids },
            };
            selection.insert(group_id, value);
        }

        if let Some(quantity) = payload.quantity {
            let (group, _) = product
                .quantity_group()
                .ok_or(PricingError::NoQuantityGroup { quantity })?;
            selection.insert(group.id, SelectionValue::Quantity { value: quantity });
        }

        for (&group_id, bounds) in &payload.ranges {
            let group = product
                .group(group_id)
                .ok_or(PricingError::UnknownGroup { group_id })?;
            if !matches!(group.kind, GroupKind::ContinuousRange(_)) {
                return Err(PricingError::KindMismatch {
                    group_id,
                    expected: group.kind.name(),
                });
            }
            selection.insert(
                group_id,
                SelectionValue::Range {
                    min: bounds.min,
                    max: bounds.max,
                },
            );
        }

        Ok(selection)
    }

    /// The initial selection a preview starts from.
    ///
    /// Each selector's active default value, the quantity default, and every
    /// range slider at its default handles. Selectors without a default are
    /// left empty.
    pub fn defaults(product: &Product) -> Self {
        let mut selection = Selection::new();
        for group in &product.option_groups {
            let value = match &group.kind {
                GroupKind::Selector(s) => match s.default_value() {
                    Some(v) => SelectionValue::SingleId { id: v.id },
                    None => continue,
                },
                GroupKind::QuantityRange(q) => SelectionValue::Quantity { value: q.default },
                GroupKind::ContinuousRange(r) => SelectionValue::Range {
                    min: r.default_min,
                    max: r.default_max,
                },
            };
            selection.insert(group.id, value);
        }
        selection
    }
}

// =============================================================================
// Raw Payload
// =============================================================================

/// Selection as decoded from a client request.
///
/// ```json
/// {
///   "value_ids": [11, 42],
///   "quantity": 2,
///   "ranges": { "3": { "min": 1200, "max": 2400 } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionPayload {
    #[serde(default)]
    pub value_ids: Vec<ValueId>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub ranges: BTreeMap<GroupId, RangeBounds>,
}

/// Both handles of a range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeBounds {
    pub min: i64,
    pub max: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
