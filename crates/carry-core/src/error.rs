//! # Error Types
//!
//! Domain-specific error types for carry-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Errors                                  │
//! │                                                                         │
//! │  Selection problems            Numeric problems       Definition       │
//! │  ──────────────────            ────────────────       ──────────       │
//! │  UNKNOWN_VALUE                 INVALID_QUANTITY       INVALID_GROUP_   │
//! │  TOO_MANY_SELECTED             OUT_OF_BOUNDS            CONFIG         │
//! │  REQUIRED_GROUP_EMPTY          STEP_MISMATCH          OVERFLOW         │
//! │  KIND_MISMATCH                 SPAN_TOO_LARGE                          │
//! │                                                                         │
//! │  Flow: PricingError ──kind()──► ErrorPayload { code, message }         │
//! │        (collaborator turns the payload into a 4xx or inline UI error)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (group id, value id, bounds)
//! 3. Every variant maps onto exactly one [`ErrorKind`]
//! 4. Nothing here is fatal: every error is recoverable by the caller

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::model::{GroupId, ValueId};

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors produced while validating or pricing a selection.
///
/// The engine is fail-fast: the first violation found is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A selected value id is not offered by this product.
    ///
    /// Inactive values count as not offered.
    #[error("Option value {value_id} is not offered by this product")]
    UnknownValue { value_id: ValueId },

    /// The selection names an option group the product does not have.
    #[error("Option group {group_id} does not exist on this product")]
    UnknownGroup { group_id: GroupId },

    /// More than one value picked in a single-selection group.
    #[error("Group {group_id} allows one value, {count} selected")]
    TooManySelected { group_id: GroupId, count: usize },

    /// A required group has nothing selected.
    #[error("Group {group_id} is required")]
    RequiredGroupEmpty { group_id: GroupId },

    /// Quantity is outside the group bounds or off its step grid.
    #[error("Quantity {quantity} is invalid for group {group_id}: expected {min}..={max} in steps of {step}")]
    InvalidQuantity {
        group_id: GroupId,
        quantity: i64,
        min: i64,
        max: i64,
        step: i64,
    },

    /// A quantity was supplied but the product has no quantity group.
    #[error("Quantity {quantity} supplied but the product has no quantity option")]
    NoQuantityGroup { quantity: i64 },

    /// Range endpoints are outside the slider or reversed.
    #[error("Range {min}..{max} is outside {slider_min}..{slider_max} for group {group_id}")]
    OutOfBounds {
        group_id: GroupId,
        min: i64,
        max: i64,
        slider_min: i64,
        slider_max: i64,
    },

    /// A range endpoint is not on the slider's step grid.
    #[error("Value {value} is not a multiple of {step} from {anchor} in group {group_id}")]
    StepMismatch {
        group_id: GroupId,
        value: i64,
        anchor: i64,
        step: i64,
    },

    /// A tiered range selection spans more than the group allows.
    #[error("Span {span} exceeds the maximum of {max_span} for group {group_id}")]
    SpanTooLarge {
        group_id: GroupId,
        span: i64,
        max_span: i64,
    },

    /// The selection variant does not fit the group kind.
    #[error("Group {group_id} expects a {expected} selection")]
    KindMismatch {
        group_id: GroupId,
        expected: &'static str,
    },

    /// The product definition itself is malformed.
    #[error("Invalid configuration for {context}: {reason}")]
    InvalidGroupConfig { context: String, reason: String },

    /// A price does not fit in 64-bit cents.
    #[error("Arithmetic overflow while computing {context}")]
    Overflow { context: &'static str },
}

impl PricingError {
    /// Creates an `InvalidGroupConfig` error.
    pub fn invalid_config(context: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidGroupConfig {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Returns the machine-readable discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::UnknownValue { .. } | PricingError::UnknownGroup { .. } => {
                ErrorKind::UnknownValue
            }
            PricingError::TooManySelected { .. } => ErrorKind::TooManySelected,
            PricingError::RequiredGroupEmpty { .. } => ErrorKind::RequiredGroupEmpty,
            PricingError::InvalidQuantity { .. } | PricingError::NoQuantityGroup { .. } => {
                ErrorKind::InvalidQuantity
            }
            PricingError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            PricingError::StepMismatch { .. } => ErrorKind::StepMismatch,
            PricingError::SpanTooLarge { .. } => ErrorKind::SpanTooLarge,
            PricingError::KindMismatch { .. } => ErrorKind::KindMismatch,
            PricingError::InvalidGroupConfig { .. } => ErrorKind::InvalidGroupConfig,
            PricingError::Overflow { .. } => ErrorKind::Overflow,
        }
    }

    /// Returns the group this error is about, when there is one.
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            PricingError::UnknownGroup { group_id }
            | PricingError::TooManySelected { group_id, .. }
            | PricingError::RequiredGroupEmpty { group_id }
            | PricingError::InvalidQuantity { group_id, .. }
            | PricingError::OutOfBounds { group_id, .. }
            | PricingError::StepMismatch { group_id, .. }
            | PricingError::SpanTooLarge { group_id, .. }
            | PricingError::KindMismatch { group_id, .. } => Some(*group_id),
            _ => None,
        }
    }

    /// Converts into the kind + message payload handed to collaborators.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.kind(),
            group_id: self.group_id(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// Discriminant of [`PricingError`], stable across releases.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (err.code) {
///   case 'REQUIRED_GROUP_EMPTY':
///     highlightGroup(err.groupId);
///     break;
///   case 'INVALID_GROUP_CONFIG':
///     reportCatalogBug(err.message);
///     break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownValue,
    TooManySelected,
    RequiredGroupEmpty,
    InvalidQuantity,
    OutOfBounds,
    StepMismatch,
    SpanTooLarge,
    KindMismatch,
    InvalidGroupConfig,
    Overflow,
}

impl ErrorKind {
    /// True for errors caused by a bad product definition rather than by the
    /// shopper's selection.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, ErrorKind::InvalidGroupConfig | ErrorKind::Overflow)
    }
}

/// Serialized error shape returned to collaborators.
///
/// ```json
/// {
///   "code": "REQUIRED_GROUP_EMPTY",
///   "groupId": 3,
///   "message": "Group 3 is required"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Machine-readable error code.
    pub code: ErrorKind,

    /// Group to highlight in the UI, if the error is scoped to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Human-readable message.
    pub message: String,
}

impl From<&PricingError> for ErrorPayload {
    fn from(err: &PricingError) -> Self {
        err.to_payload()
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
