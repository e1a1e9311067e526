//! # CLI Error Type
//!
//! ## Error Output
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingError ──────────────► ErrorPayload  { code, groupId, message } │
//! │  (selection / product rule)    codes from carry-core's ErrorKind        │
//! │                                                                         │
//! │  CatalogError / ConfigError ─► ApiError     { code, message }          │
//! │  bad input                     NOT_FOUND, INVALID_INPUT, ...            │
//! │                                                                         │
//! │  Either one is written to stderr as JSON; the exit status is non-zero. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use carry_catalog::CatalogError;
use carry_core::{ErrorPayload, PricingError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can stop a quote.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("failed to read selection from {}: {source}", .path.display())]
    ReadSelection {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selection payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Error codes for failures outside the pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id.
    NotFound,

    /// Selection payload could not be read or decoded.
    InvalidInput,

    /// A catalog file is unreadable or describes an invalid product.
    CatalogError,

    /// The configuration is unusable.
    ConfigError,
}

/// Non-pricing error as printed to stderr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

/// The JSON written to stderr on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorOutput {
    Pricing(ErrorPayload),
    Api(ApiError),
}

impl AppError {
    pub fn to_output(&self) -> ErrorOutput {
        match self {
            AppError::Pricing(err) => ErrorOutput::Pricing(err.to_payload()),
            AppError::Catalog(CatalogError::NotFound { id }) => {
                ErrorOutput::Api(ApiError::new(ErrorCode::NotFound, format!("Product not found: {}", id)))
            }
            AppError::Catalog(err) => {
                ErrorOutput::Api(ApiError::new(ErrorCode::CatalogError, err.to_string()))
            }
            AppError::Config(err) => {
                ErrorOutput::Api(ApiError::new(ErrorCode::ConfigError, err.to_string()))
            }
            AppError::ReadSelection { .. } | AppError::InvalidPayload(_) => {
                ErrorOutput::Api(ApiError::new(ErrorCode::InvalidInput, self.to_string()))
            }
        }
    }
}
