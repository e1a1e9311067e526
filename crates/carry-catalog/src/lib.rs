//! # carry-catalog: Product Definitions for Carry
//!
//! Reads stored product definitions, normalizes them and serves the typed
//! [`carry_core::Product`] model by id.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Carry Data Flow                                │
//! │                                                                         │
//! │  carry-quote --catalog ./catalog --product rank-boost                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 carry-catalog (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Catalog    │    │   normalize   │    │ CatalogError │  │   │
//! │  │   │  (store.rs)   │───►│ (normalize.rs)│    │  (error.rs)  │  │   │
//! │  │   │ load_dir, get │    │ dense order,  │    │ file context │  │   │
//! │  │   │               │    │ one default   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            catalog/*.json, catalog/*.toml                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `Catalog` index and directory loader
//! - [`normalize`] - Persistence-time definition cleanup
//! - [`error`] - Catalog error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod normalize;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CatalogError, CatalogResult};
pub use normalize::normalize;
pub use store::Catalog;
