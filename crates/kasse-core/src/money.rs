//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Receipt with tax included at 25%:                                      │
//! │    101.90 / 1.25 = 81.52000000000001  ❌ WRONG!                         │
//! │                                                                         │
//! │  Discount difference in doubles:                                        │
//! │    100.2 - 50.0 = 50.2 (or 50.199999...)  → "50,19" on paper           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer øre                                              │
//! │    10190 * 100 / 125 = 8152 øre (tax = 2038 øre)                       │
//! │    Every amount on the receipt is an exact integer                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Text Format
//! Amounts are printed as `"<major>,<minor>"` with the minor part always
//! zero-padded to two digits: `1002` øre prints as `10,02`.
//!
//! ## Usage
//! ```rust
//! use kasse_core::money::Money;
//!
//! let price = Money::from_minor(1002); // 10,02
//! let line = price.checked_mul_quantity(5).unwrap();
//! assert_eq!(line.to_string(), "50,10");
//!
//! let parsed = Money::parse_parts("10", "2").unwrap();
//! assert_eq!(parsed, price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

use crate::error::{ValidationError, ValidationResult};
use crate::types::TaxRate;

/// Minor units per major unit (øre per krone).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (øre / cents).
///
/// ## Design Decisions
/// - **i64 inside**: subtraction of two prices (a discount that turned out
///   to be a surcharge) stays representable, but every constructor that
///   takes outside input rejects negative amounts.
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  decoded line ──► TieredPrice tier ──► unit price ──► line total        │
/// │                                                          │              │
/// │                                       Basket.total ◄─────┘              │
/// │                                           │                             │
/// │                           ┌───────────────┼────────────────┐            │
/// │                           ▼               ▼                ▼            │
/// │                     TOTAL line      marks line      MOMS (tax) line     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 2).minor(), 1002);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Money(major * MINOR_PER_MAJOR + minor)
    }

    /// Parses the two amount columns of a catalog or discount line.
    ///
    /// Both parts must be non-negative whole numbers. The minor part is not
    /// capped at 99: `"1","150"` is 2,50.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::money::Money;
    ///
    /// assert_eq!(Money::parse_parts("24", "95").unwrap().minor(), 2495);
    /// assert!(Money::parse_parts("-1", "00").is_err());
    /// assert!(Money::parse_parts("ten", "00").is_err());
    /// ```
    pub fn parse_parts(major: &str, minor: &str) -> ValidationResult<Self> {
        let major = parse_amount("major units", major)?;
        let minor = parse_amount("minor units", minor)?;

        major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .map(Money)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: i64::MAX,
            })
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a purchased quantity.
    ///
    /// Fails with `OutOfRange` instead of wrapping when the product does not
    /// fit in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(595);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().minor(), 1785);
    /// assert!(Money::from_minor(i64::MAX).checked_mul_quantity(2).is_err());
    /// ```
    pub fn checked_mul_quantity(&self, qty: u32) -> ValidationResult<Self> {
        self.0
            .checked_mul(i64::from(qty))
            .map(Money)
            .ok_or_else(amount_out_of_range)
    }

    /// Adds two amounts, failing with `OutOfRange` on overflow.
    pub fn checked_add(&self, other: Money) -> ValidationResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(amount_out_of_range)
    }

    /// Returns the sales tax contained in a tax-inclusive amount.
    ///
    /// ## Formula
    /// ```text
    /// net = amount * 10000 / (10000 + bps)     (integer division, floors)
    /// tax = amount - net
    /// ```
    /// For 25% (2500 bps) this is `amount - amount * 100 / 125`.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::money::Money;
    /// use kasse_core::types::TaxRate;
    ///
    /// let total = Money::from_minor(10190); // 101,90
    /// let tax = total.included_tax(TaxRate::from_percent(25));
    /// assert_eq!(tax.minor(), 2038); // 20,38
    /// ```
    pub fn included_tax(&self, rate: TaxRate) -> Money {
        // i128 so large totals can't overflow the multiplication
        let net = self.0 as i128 * 10_000 / (10_000 + rate.bps() as i128);
        Money(self.0 - net as i64)
    }

    /// Number of whole `per_unit` amounts contained in this amount.
    ///
    /// Used for loyalty marks: one mark per 50 kr spent. A zero or negative
    /// divisor yields zero.
    pub fn whole_units_of(&self, per_unit: Money) -> u64 {
        if per_unit.0 <= 0 || self.0 <= 0 {
            return 0;
        }
        (self.0 / per_unit.0) as u64
    }
}

fn amount_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "amount".to_string(),
        min: 0,
        max: i64::MAX,
    }
}

fn parse_amount(field: &str, value: &str) -> ValidationResult<i64> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("\"{}\" is not a whole number ({})", value, e),
        })?;

    if parsed < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(parsed)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Receipt formatting: `major,minor` with two minor digits.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let text = format!("{}{},{:02}", sign, self.major().abs(), self.minor_part());
        // pad() so callers can align amounts with `{:>10}`
        f.pad(&text)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Discount lines: base line total minus charged line total.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1002).to_string(), "10,02");
        assert_eq!(Money::from_minor(500).to_string(), "5,00");
        assert_eq!(Money::from_minor(7).to_string(), "0,07");
        assert_eq!(Money::from_minor(0).to_string(), "0,00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5,50");
    }

    #[test]
    fn test_display_respects_alignment() {
        assert_eq!(format!("{:>10}", Money::from_minor(2595)), "     25,95");
        assert_eq!(format!("{:<6}|", Money::from_minor(100)), "1,00  |");
    }

    #[test]
    fn test_parse_parts() {
        assert_eq!(Money::parse_parts("10", "02").unwrap().minor(), 1002);
        assert_eq!(Money::parse_parts(" 0 ", " 7 ").unwrap().minor(), 7);
        assert_eq!(Money::parse_parts("1", "150").unwrap().minor(), 250);

        assert!(matches!(
            Money::parse_parts("-1", "0"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            Money::parse_parts("1", "-5"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            Money::parse_parts("1.5", "0"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(Money::parse_parts("", "0").is_err());
        assert!(Money::parse_parts(&i64::MAX.to_string(), "0").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!(a.checked_add(b).unwrap().minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!(a.checked_mul_quantity(3).unwrap().minor(), 3000);
        assert_eq!(a.checked_mul_quantity(0).unwrap(), Money::zero());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let max = Money::from_minor(i64::MAX);

        assert!(matches!(
            max.checked_mul_quantity(2),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            max.checked_add(Money::from_minor(1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(max.checked_mul_quantity(1).unwrap(), max);
        assert_eq!(max.checked_add(Money::zero()).unwrap(), max);
    }

    #[test]
    fn test_included_tax() {
        let rate = TaxRate::from_percent(25);
        assert_eq!(Money::from_minor(10190).included_tax(rate).minor(), 2038);
        assert_eq!(Money::from_minor(12500).included_tax(rate).minor(), 2500);
        assert_eq!(Money::zero().included_tax(rate).minor(), 0);
        // 1 øre: net floors to 0, so the whole øre is tax
        assert_eq!(Money::from_minor(1).included_tax(rate).minor(), 1);
        assert_eq!(
            Money::from_minor(10190).included_tax(TaxRate::from_percent(0)).minor(),
            0
        );
    }

    #[test]
    fn test_whole_units_of() {
        let per_mark = Money::from_major_minor(50, 0);
        assert_eq!(Money::from_minor(10190).whole_units_of(per_mark), 2);
        assert_eq!(Money::from_minor(4999).whole_units_of(per_mark), 0);
        assert_eq!(Money::from_minor(5000).whole_units_of(per_mark), 1);
        assert_eq!(Money::from_minor(5000).whole_units_of(Money::zero()), 0);
    }
}
