//! # Catalog
//!
//! The store assortment: every product keyed by its barcode.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup ──► Catalog::new() (empty)                                    │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  product lines ──► add() ──► grows, never shrinks                       │
//! │  discount lines ──► attach_tier() ──► tiers change, identity doesn't    │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  baskets ──► get(barcode) ──► price lookups at render time              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::product::Product;

/// Keyed collection of products. Barcodes are unique.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product; a duplicate barcode fails and leaves the catalog as is.
    pub fn add(&mut self, product: Product) -> CoreResult<()> {
        if self.products.contains_key(product.barcode()) {
            return Err(ValidationError::Duplicate {
                field: "barcode".to_string(),
                value: product.barcode().to_string(),
            }
            .into());
        }

        self.products.insert(product.barcode().to_string(), product);
        Ok(())
    }

    pub fn get(&self, barcode: &str) -> CoreResult<&Product> {
        self.products
            .get(barcode)
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))
    }

    pub fn has(&self, barcode: &str) -> bool {
        self.products.contains_key(barcode)
    }

    /// Adds or overwrites a price tier on an existing product.
    pub fn attach_tier(&mut self, barcode: &str, min_quantity: u32, price: Money) -> CoreResult<()> {
        self.get_mut(barcode)?.add_discount(min_quantity, price)
    }

    /// Removes a discount tier from an existing product.
    pub fn remove_tier(&mut self, barcode: &str, min_quantity: u32) -> CoreResult<Option<Money>> {
        self.get_mut(barcode)?.remove_discount(min_quantity)
    }

    /// Resets a product to its base price only.
    pub fn clear_tiers(&mut self, barcode: &str) -> CoreResult<()> {
        self.get_mut(barcode)?.clear_discounts();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in barcode order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    fn get_mut(&mut self, barcode: &str) -> CoreResult<&mut Product> {
        self.products
            .get_mut(barcode)
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))
    }
}
