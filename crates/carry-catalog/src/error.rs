//! # Catalog Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  io::Error / serde_json::Error / toml::de::Error / PricingError         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← adds the file and product id             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  carry-quote prints it and exits non-zero                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use carry_core::PricingError;
use thiserror::Error;

/// Catalog loading and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog path is missing or not a directory.
    #[error("catalog directory not found: {}", .path.display())]
    NotADirectory { path: PathBuf },

    /// Reading a directory or file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `.json` definition did not parse.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A `.toml` definition did not parse.
    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A definition parsed but describes an invalid product.
    ///
    /// ## When This Occurs
    /// - Unknown group type or pricing mode
    /// - Bounds, steps or defaults that contradict each other
    /// - Duplicate group or value ids
    #[error("invalid product in {}: {source}", .path.display())]
    InvalidProduct {
        path: PathBuf,
        #[source]
        source: PricingError,
    },

    /// A product built in code failed its checks.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Two definitions share a product id.
    #[error("duplicate product id '{id}'")]
    DuplicateProduct { id: String },

    /// No product with this id.
    #[error("product not found: {id}")]
    NotFound { id: String },
}

impl CatalogError {
    pub fn not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound { id: id.into() }
    }

    /// The pricing error underneath, if this is a bad definition.
    pub fn pricing_error(&self) -> Option<&PricingError> {
        match self {
            CatalogError::InvalidProduct { source, .. } => Some(source),
            CatalogError::Pricing(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use carry_core::ErrorKind;

    #[test]
    fn test_pricing_error_is_exposed() {
        let err = CatalogError::InvalidProduct {
            path: PathBuf::from("boost.json"),
            source: PricingError::invalid_config("group 1 (Tier)", "missing pricing_mode"),
        };
        assert_eq!(
            err.pricing_error().map(|e| e.kind()),
            Some(ErrorKind::InvalidGroupConfig)
        );
        assert!(err.to_string().contains("boost.json"));
        assert!(CatalogError::not_found("x").pricing_error().is_none());
    }
}
