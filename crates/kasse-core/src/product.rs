//! # Product
//!
//! A catalog entry: barcode, category, display name and its tiered price.
//!
//! Identity fields are fixed at construction. Only the price tiers change,
//! and only through the discount methods on [`Product`]; the underlying
//! tier table is never handed out by reference.

use serde::Serialize;

use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{TieredPrice, BASE_QUANTITY};
use crate::validation::validate_required;

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    barcode: String,
    category: String,
    name: String,
    price: TieredPrice,
}

impl Product {
    /// Creates a product with a single (base) price.
    ///
    /// Barcode, category and name are trimmed and must not be empty; the
    /// base price must not be negative.
    ///
    /// ## Example
    /// ```rust
    /// use kasse_core::{Money, Product};
    ///
    /// let apple = Product::new("012345678", "Fruit", "Apple", Money::from_minor(512)).unwrap();
    /// assert_eq!(apple.final_price(100).unwrap(), Money::from_minor(512));
    /// ```
    pub fn new(
        barcode: &str,
        category: &str,
        name: &str,
        base_price: Money,
    ) -> CoreResult<Self> {
        Ok(Product {
            barcode: validate_required("barcode", barcode)?,
            category: validate_required("category", category)?,
            name: validate_required("name", name)?,
            price: TieredPrice::new(base_price)?,
        })
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds or replaces the price used from `min_quantity` units upward.
    pub fn add_discount(&mut self, min_quantity: u32, price: Money) -> CoreResult<()> {
        self.price.add_tier(min_quantity, price)
    }

    /// Removes a discount tier; the base price cannot be removed.
    pub fn remove_discount(&mut self, min_quantity: u32) -> CoreResult<Option<Money>> {
        self.price.remove_tier(min_quantity)
    }

    /// Makes the product "normal price only".
    pub fn clear_discounts(&mut self) {
        self.price.clear_tiers();
    }

    /// Replaces the base (quantity 1) price.
    pub fn change_base_price(&mut self, price: Money) -> CoreResult<()> {
        self.price.add_tier(BASE_QUANTITY, price)
    }

    pub fn base_price(&self) -> CoreResult<Money> {
        self.price.base_price()
    }

    /// Unit price when `quantity` units are bought in total.
    pub fn final_price(&self, quantity: u32) -> CoreResult<Money> {
        self.price.resolve(quantity)
    }

    /// Whether buying `quantity` units triggers a price other than the base.
    pub fn is_discounted_at(&self, quantity: u32) -> CoreResult<bool> {
        Ok(self.final_price(quantity)? != self.base_price()?)
    }

    /// Snapshot of the price tiers, ascending by quantity.
    pub fn tiers(&self) -> Vec<PriceTier> {
        self.price
            .tiers()
            .into_iter()
            .map(|(min_quantity, price)| PriceTier {
                min_quantity,
                price,
            })
            .collect()
    }
}

/// A copied (quantity, price) pair for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub min_quantity: u32,
    pub price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorKind};

    fn apple() -> Product {
        Product::new("012345678", "Fruit", "Apple", Money::from_minor(512)).unwrap()
    }

    #[test]
    fn test_product_fields() {
        let product = apple();

        assert_eq!(product.barcode(), "012345678");
        assert_eq!(product.category(), "Fruit");
        assert_eq!(product.name(), "Apple");
        assert_eq!(product.base_price().unwrap(), Money::from_minor(512));
        assert_eq!(product.final_price(100).unwrap(), Money::from_minor(512));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let product = Product::new(" 1 ", " Dairy", "Skyr ", Money::zero()).unwrap();
        assert_eq!(product.barcode(), "1");
        assert_eq!(product.category(), "Dairy");
        assert_eq!(product.name(), "Skyr");
    }

    #[test]
    fn test_discounted_product() {
        let mut product = apple();
        product.add_discount(5, Money::from_minor(412)).unwrap();

        assert_eq!(product.final_price(4).unwrap(), Money::from_minor(512));
        assert_eq!(product.final_price(5).unwrap(), Money::from_minor(412));
        assert_eq!(product.final_price(6).unwrap(), Money::from_minor(412));
        assert_eq!(product.base_price().unwrap(), Money::from_minor(512));
        assert!(!product.is_discounted_at(4).unwrap());
        assert!(product.is_discounted_at(5).unwrap());
    }

    #[test]
    fn test_change_base_price() {
        let mut product = apple();
        product.change_base_price(Money::from_minor(400)).unwrap();

        assert_eq!(product.base_price().unwrap(), Money::from_minor(400));
        assert_eq!(product.final_price(5).unwrap(), Money::from_minor(400));
    }

    #[test]
    fn test_negative_base_price_change_rejected() {
        let mut product = apple();
        assert!(product.change_base_price(Money::from_minor(-512)).is_err());
        assert_eq!(product.base_price().unwrap(), Money::from_minor(512));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let price = Money::from_minor(5);
        for (barcode, category, name) in [
            ("", "Category", "Name"),
            ("Barcode", "", "Name"),
            ("Barcode", "Category", ""),
        ] {
            let err = Product::new(barcode, category, name, price).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = Product::new("Test", "Negative", "Price", Money::from_minor(-512)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_tiers_are_copies() {
        let mut product = apple();
        product.add_discount(3, Money::from_minor(450)).unwrap();

        let tiers = product.tiers();
        assert_eq!(
            tiers,
            vec![
                PriceTier {
                    min_quantity: 1,
                    price: Money::from_minor(512)
                },
                PriceTier {
                    min_quantity: 3,
                    price: Money::from_minor(450)
                },
            ]
        );

        product.clear_discounts();
        assert_eq!(tiers.len(), 2);
        assert_eq!(product.tiers().len(), 1);
    }
}
