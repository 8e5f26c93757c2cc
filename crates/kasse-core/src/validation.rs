//! # Validation Module
//!
//! Input validation utilities shared by products, tiers and the line decoder.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Line decoder (decode.rs)                                     │
//! │  ├── Field count                                                        │
//! │  └── Numeric amounts / quantities                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, called from constructors                        │
//! │  ├── Non-empty identity fields                                          │
//! │  ├── Non-negative prices                                                │
//! │  └── Tier thresholds ≥ 1                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog                                                      │
//! │  └── Unique barcodes                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is not empty and returns it trimmed.
///
/// ## Example
/// ```rust
/// use kasse_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Apple ").unwrap(), "Apple");
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use kasse_core::money::Money;
/// use kasse_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_minor(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_minor(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the minimum quantity of a price tier.
///
/// ## Rules
/// - Must be at least 1; quantity 1 is the base price
pub fn validate_min_quantity(min_quantity: u32) -> ValidationResult<()> {
    if min_quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "minimum quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("barcode", "12345").unwrap(), "12345");
        assert_eq!(validate_required("category", " Fruit ").unwrap(), "Fruit");

        assert!(matches!(
            validate_required("barcode", ""),
            Err(ValidationError::Required { field }) if field == "barcode"
        ));
        assert!(validate_required("name", "\t ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(1099)).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_min_quantity() {
        assert!(validate_min_quantity(1).is_ok());
        assert!(validate_min_quantity(10).is_ok());
        assert!(validate_min_quantity(0).is_err());
    }
}
