//! # Shared Value Types
//!
//! Small value types used across the pricing and receipt modules.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2500 bps = 25% (Danish MOMS)
///
/// The tax calculation works in bps so it stays in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        TaxRate(percent * 100)
    }

    /// Creates a tax rate from a percentage, rejecting anything above 100%.
    pub fn try_from_percent(percent: u32) -> ValidationResult<Self> {
        if percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "tax_percent".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(TaxRate::from_percent(percent))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_percent() {
        assert_eq!(TaxRate::from_percent(25).bps(), 2500);
        assert_eq!(TaxRate::from_percent(0).bps(), 0);
    }

    #[test]
    fn test_try_from_percent() {
        assert_eq!(TaxRate::try_from_percent(25).unwrap(), TaxRate::from_percent(25));
        assert!(TaxRate::try_from_percent(100).is_ok());
        assert!(matches!(
            TaxRate::try_from_percent(101),
            Err(ValidationError::OutOfRange { max: 100, .. })
        ));
    }
}
