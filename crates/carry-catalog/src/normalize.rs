//! # Definition Normalization
//!
//! The persistence-time cleanup every definition goes through before it is
//! converted into a [`carry_core::Product`].
//!
//! ## Fix-ups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Groups sorted by position, positions renumbered 0..n               │
//! │  2. Values sorted by position, positions renumbered 0..n               │
//! │  3. Inactive values lose their default flag                            │
//! │  4. Single-select groups keep only their first default                 │
//! │  5. The delta field that does not match pricing_mode is dropped        │
//! │  6. Range tiers sorted by `from`                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Normalizing twice gives the same result as normalizing once.

use carry_core::definition::{OptionGroupDef, ProductDef};
use tracing::warn;

/// Returns the normalized form of a stored definition.
pub fn normalize(mut def: ProductDef) -> ProductDef {
    def.option_groups.sort_by_key(|g| g.position);
    for (position, group) in def.option_groups.iter_mut().enumerate() {
        group.position = position as i32;
        normalize_group(&def.id, group);
    }
    def
}

fn normalize_group(product_id: &str, group: &mut OptionGroupDef) {
    group.values.sort_by_key(|v| v.position);
    for (position, value) in group.values.iter_mut().enumerate() {
        value.position = position as i32;
    }

    for value in group.values.iter_mut().filter(|v| !v.is_active && v.is_default) {
        warn!(product = %product_id, group = group.id, value = value.id, "Inactive value marked default, clearing");
        value.is_default = false;
    }

    let single = matches!(group.selection_mode.as_deref(), None | Some("single"));
    if single {
        let mut seen_default = false;
        for value in group.values.iter_mut().filter(|v| v.is_default) {
            if seen_default {
                warn!(product = %product_id, group = group.id, value = value.id, "Extra default in single-select group, clearing");
                value.is_default = false;
            }
            seen_default = true;
        }
    }

    match group.pricing_mode.as_deref() {
        Some("absolute") => {
            for value in group.values.iter_mut().filter(|v| v.delta_percent.is_some()) {
                warn!(product = %product_id, group = group.id, value = value.id, "Stale delta_percent on absolute value, dropping");
                value.delta_percent = None;
            }
        }
        Some("percent") => {
            for value in group.values.iter_mut().filter(|v| v.delta_cents.is_some()) {
                warn!(product = %product_id, group = group.id, value = value.id, "Stale delta_cents on percent value, dropping");
                value.delta_cents = None;
            }
        }
        _ => {}
    }

    group.tiers.sort_by_key(|t| t.from);
}
