//! # Engine
//!
//! One call from `(product, selection)` to a price.
//!
//! ```text
//!   Product ─┐
//!            ├──► validate ──► Validated ──► compute ──► PriceResult
//! Selection ─┘        │                          │
//!                     └──────── PricingError ◄───┘
//! ```
//!
//! Checkout and the live preview both call [`quote`], so they cannot drift.

use crate::compositor::{compute, PriceResult};
use crate::error::PricingResult;
use crate::model::Product;
use crate::selection::Selection;
use crate::validation::validate;

/// Validates and prices a selection.
///
/// ## Example
/// ```rust
/// use carry_core::engine::quote;
/// use carry_core::{Product, Selection};
///
/// let product = Product {
///     id: "placement-matches".into(),
///     title: "Placement Matches".into(),
///     base_price_cents: 10_000,
///     option_groups: vec![],
/// };
///
/// let result = quote(&product, &Selection::new()).unwrap();
/// assert_eq!(result.line_total_cents, 10_000);
/// ```
pub fn quote(product: &Product, selection: &Selection) -> PricingResult<PriceResult> {
    let span = tracing::debug_span!("quote", product = %product.id);
    let _enter = span.enter();

    let validated = validate(product, selection)?;
    compute(product, selection, &validated)
}
