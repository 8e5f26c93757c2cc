//! # Error Types
//!
//! Domain-specific error types for kasse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasse-core errors (this file)                                         │
//! │  ├── CoreError        - Lookup failures and illegal operations         │
//! │  └── ValidationError  - Bad input (prices, fields, decoded lines)      │
//! │                                                                         │
//! │  kasse-cli errors (app crate)                                          │
//! │  └── CliError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Kinds
//! Callers must be able to tell "bad input" apart from "state violation",
//! so every [`CoreError`] reports an [`ErrorKind`]:
//!
//! | Kind               | Variants                                          |
//! |--------------------|---------------------------------------------------|
//! | `Validation`       | `Validation(_)`                                   |
//! | `NotFound`         | `ProductNotFound`, `NotInBasket`, `MissingBaseTier` |
//! | `IllegalOperation` | `BaseTierProtected`, `BasketClosed`, `NoOpenBasket` |

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this barcode exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has not been added to the basket.
    #[error("Product {0} is not in the basket")]
    NotInBasket(String),

    /// A tiered price lost its quantity-1 tier.
    ///
    /// Unreachable through the public API; kept so the lookup can fail
    /// loudly instead of inventing a price.
    #[error("No base price registered")]
    MissingBaseTier,

    /// Attempt to remove the quantity-1 tier.
    #[error("The base price of a product cannot be removed")]
    BaseTierProtected,

    /// The basket has been finalized and can no longer change.
    ///
    /// ## When This Occurs
    /// - Adding or removing a purchase after `finalize`
    /// - Finalizing the same basket twice
    #[error("Basket {basket_id} is closed, the receipt has been printed")]
    BasketClosed { basket_id: String },

    /// A basket operation was requested but no basket is open.
    #[error("No basket is open, start one with \"add receipt new\"")]
    NoOpenBasket,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was malformed or out of range.
    Validation,
    /// A lookup by barcode (or tier) found nothing.
    NotFound,
    /// The operation is not allowed in the current state.
    IllegalOperation,
}

impl CoreError {
    /// Returns the kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::ProductNotFound(_)
            | CoreError::NotInBasket(_)
            | CoreError::MissingBaseTier => ErrorKind::NotFound,
            CoreError::BaseTierProtected
            | CoreError::BasketClosed { .. }
            | CoreError::NoOpenBasket => ErrorKind::IllegalOperation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements, whether it came
/// from a typed command or from a decoded file line.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A decoded line has the wrong number of comma-separated fields.
    #[error("expected {expected} fields in \"{format}\", found {found}")]
    FieldCount {
        expected: usize,
        found: usize,
        format: &'static str,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
