//! # carry-core: Pure Pricing Engine for Carry
//!
//! This crate prices configurable game-boosting products: a base price plus
//! option groups (enumerated choices, a quantity slider, a double range
//! slider) whose selections modify the final price. Everything here is a pure
//! function of `(product, selection)`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Carry Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Storefront preview (TypeScript, ts-rs bindings)        │   │
//! │  │    Option pickers ──► Sliders ──► Live price ──► Add to cart    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ same types, same rules                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 carry-quote (checkout / CLI)                    │   │
//! │  │    load catalog, decode payload, quote, snapshot the line       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ carry-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   model   │  │ selection │  │   range   │  │compositor │  │   │
//! │  │   │  Product  │  │ Selection │  │  tiers    │  │ unit ×qty │  │   │
//! │  │   │  groups   │  │ validate  │  │  combine  │  │  + order  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │              carry-catalog (product definitions)                │   │
//! │  │            JSON/TOML files, normalization, lookup               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`], [`percent`], [`grid`] - Integer cents, exact percentages, step snapping
//! - [`model`] - Products, option groups, values, range tiers
//! - [`definition`] - Stored record shape and its checked conversion
//! - [`selection`] - What the shopper picked
//! - [`validation`] - Selection checks, fail-fast
//! - [`range`] - Flat and tiered range pricing
//! - [`compositor`] - Unit price and line total
//! - [`engine`] - `quote`: validate + compute
//! - [`error`] - Error taxonomy and wire payload
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the preview and checkout get the same answer
//! 2. **No I/O**: loading products is the catalog's job
//! 3. **Integer Money**: cents in i64, percentages as exact decimals
//! 4. **Explicit Errors**: typed, recoverable, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use carry_core::definition::ProductDef;
//! use carry_core::{quote, Product, Selection};
//!
//! let def: ProductDef = serde_json::from_str(r#"{
//!     "id": "rank-boost",
//!     "title": "Rank Boost",
//!     "base_price_cents": 10000,
//!     "option_groups": [
//!         { "id": 1, "title": "Express", "type": "selector",
//!           "pricing_mode": "absolute",
//!           "values": [{ "id": 10, "title": "Yes", "delta_cents": 300 }] },
//!         { "id": 2, "title": "Accounts", "type": "quantity_range",
//!           "position": 1, "min": 1, "max": 5 }
//!     ]
//! }"#).unwrap();
//! let product = Product::try_from(def).unwrap();
//!
//! let selection = Selection::new().single(1, 10).quantity(2, 2);
//! let price = quote(&product, &selection).unwrap();
//!
//! assert_eq!(price.unit_cents, 10_300);
//! assert_eq!(price.line_total_cents, 20_600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compositor;
pub mod definition;
pub mod engine;
pub mod error;
pub mod grid;
pub mod model;
pub mod money;
pub mod percent;
pub mod range;
pub mod selection;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compositor::{compute, PriceBreakdown, PriceResult};
pub use engine::quote;
pub use error::{ErrorKind, ErrorPayload, PricingError, PricingResult};
pub use model::{GroupId, OptionGroup, Product, ValueId};
pub use money::Money;
pub use percent::Percent;
pub use range::{price_range, RangeQuote};
pub use selection::{Selection, SelectionPayload};
pub use validation::{validate, Validated};
