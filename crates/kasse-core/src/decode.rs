//! # Line Decoder
//!
//! Turns one line of a price or discount file into a typed record.
//!
//! ## Formats
//! ```text
//! product:   <barcode>,<category>,<name>,<kr>,<ore>     e.g. 1,MEJERI,SKYR,22,75
//! discount:  <barcode>,<limit>,<kr>,<ore>               e.g. 1,5,20,00
//! ```
//! Fields are trimmed. Decoding is all-or-nothing: a record is only
//! returned when every field is valid, so a bad line can never partially
//! change the catalog.

use crate::catalog::Catalog;
use crate::error::{CoreResult, ValidationError, ValidationResult};
use crate::money::Money;
use crate::product::Product;

pub const PRODUCT_LINE_FORMAT: &str = "<barcode>,<category>,<name>,<kr>,<ore>";
pub const DISCOUNT_LINE_FORMAT: &str = "<barcode>,<limit>,<kr>,<ore>";

/// A decoded catalog line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub barcode: String,
    pub category: String,
    pub name: String,
    pub price: Money,
}

impl ProductRecord {
    /// Validates the record into a product.
    pub fn into_product(self) -> CoreResult<Product> {
        Product::new(&self.barcode, &self.category, &self.name, self.price)
    }

    /// Builds the product and adds it to `catalog`.
    pub fn apply(self, catalog: &mut Catalog) -> CoreResult<()> {
        catalog.add(self.into_product()?)
    }
}

/// A decoded discount line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountRecord {
    pub barcode: String,
    pub min_quantity: u32,
    pub price: Money,
}

impl DiscountRecord {
    /// Attaches the tier to the product in `catalog`.
    pub fn apply(self, catalog: &mut Catalog) -> CoreResult<()> {
        catalog.attach_tier(&self.barcode, self.min_quantity, self.price)
    }
}

/// Decodes `<barcode>,<category>,<name>,<kr>,<ore>`.
///
/// ## Example
/// ```rust
/// use kasse_core::decode::decode_product_line;
///
/// let record = decode_product_line("1, MEJERI, SKYR YOGHURT, 22, 75").unwrap();
/// assert_eq!(record.name, "SKYR YOGHURT");
/// assert_eq!(record.price.minor(), 2275);
///
/// assert!(decode_product_line("1235,test,test,10").is_err());
/// ```
pub fn decode_product_line(line: &str) -> ValidationResult<ProductRecord> {
    let fields = split_fields(line, 5, PRODUCT_LINE_FORMAT)?;

    Ok(ProductRecord {
        barcode: fields[0].to_string(),
        category: fields[1].to_string(),
        name: fields[2].to_string(),
        price: Money::parse_parts(fields[3], fields[4])?,
    })
}

/// Decodes `<barcode>,<limit>,<kr>,<ore>`.
///
/// The limit must be a non-negative whole number. A limit of 0 decodes but
/// is rejected when the tier is attached.
pub fn decode_discount_line(line: &str) -> ValidationResult<DiscountRecord> {
    let fields = split_fields(line, 4, DISCOUNT_LINE_FORMAT)?;

    let min_quantity = fields[1]
        .parse::<u32>()
        .map_err(|e| ValidationError::InvalidFormat {
            field: "minimum quantity".to_string(),
            reason: format!("\"{}\" is not a non-negative whole number ({})", fields[1], e),
        })?;

    Ok(DiscountRecord {
        barcode: fields[0].to_string(),
        min_quantity,
        price: Money::parse_parts(fields[2], fields[3])?,
    })
}

fn split_fields<'a>(
    line: &'a str,
    expected: usize,
    format: &'static str,
) -> ValidationResult<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() != expected {
        return Err(ValidationError::FieldCount {
            expected,
            found: fields.len(),
            format,
        });
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_decode_product_line() {
        let record = decode_product_line("12345,Dairy,Milk,10,02").unwrap();
        assert_eq!(
            record,
            ProductRecord {
                barcode: "12345".to_string(),
                category: "Dairy".to_string(),
                name: "Milk".to_string(),
                price: Money::from_minor(1002),
            }
        );
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        for line in ["1235,test,test,10", "1,a,b,1,2,3", "", "just text"] {
            let err = decode_product_line(line).unwrap_err();
            assert!(matches!(err, ValidationError::FieldCount { expected: 5, .. }), "{line}");
        }
        assert!(matches!(
            decode_discount_line("1,5,20"),
            Err(ValidationError::FieldCount { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn test_bad_amounts_rejected() {
        assert!(decode_product_line("1,Fruit,Apple,-1,00").is_err());
        assert!(decode_product_line("1,Fruit,Apple,ten,00").is_err());
        assert!(decode_discount_line("1,five,20,00").is_err());
        assert!(decode_discount_line("1,-5,20,00").is_err());
        assert!(decode_discount_line("1,5,20,-1").is_err());
    }

    #[test]
    fn test_decode_discount_line() {
        let record = decode_discount_line(" 1 , 5 , 20 , 00 ").unwrap();
        assert_eq!(record.barcode, "1");
        assert_eq!(record.min_quantity, 5);
        assert_eq!(record.price, Money::from_minor(2000));

        assert_eq!(decode_discount_line("1,0,1,00").unwrap().min_quantity, 0);
    }

    #[test]
    fn test_malformed_line_leaves_catalog_unchanged() {
        let mut catalog = Catalog::new();
        assert!(decode_product_line("1235,test,test,10").is_err());
        assert!(catalog.is_empty());

        decode_product_line("1,Fruit,Orange,24,95")
            .unwrap()
            .apply(&mut catalog)
            .unwrap();
        let err = decode_product_line("1,Fruit,Copy,1,00")
            .unwrap()
            .apply(&mut catalog)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(catalog.get("1").unwrap().name(), "Orange");
    }

    #[test]
    fn test_empty_identity_field_rejected_on_apply() {
        let mut catalog = Catalog::new();
        let err = decode_product_line("1,,Orange,24,95")
            .unwrap()
            .apply(&mut catalog)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_discount_apply() {
        let mut catalog = Catalog::new();
        decode_product_line("1,Fruit,Orange,24,95")
            .unwrap()
            .apply(&mut catalog)
            .unwrap();

        decode_discount_line("1,5,20,00")
            .unwrap()
            .apply(&mut catalog)
            .unwrap();
        assert_eq!(
            catalog.get("1").unwrap().final_price(5).unwrap(),
            Money::from_minor(2000)
        );

        let err = decode_discount_line("9,5,20,00")
            .unwrap()
            .apply(&mut catalog)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(catalog.len(), 1);

        let err = decode_discount_line("1,0,1,00")
            .unwrap()
            .apply(&mut catalog)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
