//! # Cash Register
//!
//! Tracks the basket currently being scanned and the history of closed ones.
//!
//! ## History Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start_new_basket()                                                     │
//! │     │                                                                   │
//! │     ├── current open?  ──► finalize it ──► push to history              │
//! │     └── open a fresh basket as current                                  │
//! │                                                                         │
//! │  finalize_current()  ──► finalize ──► push to history ──► no current    │
//! │                                                                         │
//! │  grand_total() = Σ history totals (frozen) + current total (live)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The open basket always counts towards the grand total, so the last
//! transaction is never lost just because no new basket was started.

use uuid::Uuid;

use crate::basket::Basket;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::receipt::ReceiptRenderer;

/// The current basket plus every finalized basket, oldest first.
#[derive(Debug, Clone, Default)]
pub struct CashRegister {
    history: Vec<Basket>,
    current: Option<Basket>,
}

impl CashRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the open basket (if any) into history and opens a new one.
    pub fn start_new_basket(
        &mut self,
        catalog: &Catalog,
        renderer: &dyn ReceiptRenderer,
    ) -> CoreResult<Uuid> {
        if self.current.is_some() {
            self.finalize_current(catalog, renderer)?;
        }

        let basket = Basket::new();
        let id = basket.id();
        self.current = Some(basket);
        Ok(id)
    }

    /// Adds one unit of the product with `barcode` to the open basket.
    ///
    /// Unknown barcodes are rejected before the basket is touched.
    pub fn add_purchase(&mut self, catalog: &Catalog, barcode: &str) -> CoreResult<u32> {
        let basket = self.current.as_mut().ok_or(CoreError::NoOpenBasket)?;
        let product = catalog.get(barcode)?;
        basket.add_purchase(product)
    }

    /// Removes one unit of the product with `barcode` from the open basket.
    pub fn remove_purchase(&mut self, catalog: &Catalog, barcode: &str) -> CoreResult<u32> {
        let basket = self.current.as_mut().ok_or(CoreError::NoOpenBasket)?;
        let product = catalog.get(barcode)?;
        basket.remove_purchase(product)
    }

    /// Finalizes the open basket, moves it to history and returns its text.
    pub fn finalize_current(
        &mut self,
        catalog: &Catalog,
        renderer: &dyn ReceiptRenderer,
    ) -> CoreResult<String> {
        let basket = self.current.as_mut().ok_or(CoreError::NoOpenBasket)?;
        let text = basket.finalize(catalog, renderer)?.to_string();

        if let Some(basket) = self.current.take() {
            self.history.push(basket);
        }
        Ok(text)
    }

    /// The open basket, if there is one.
    pub fn current(&self) -> Option<&Basket> {
        self.current.as_ref()
    }

    /// The most recent basket: the open one, else the last finalized one.
    pub fn latest(&self) -> Option<&Basket> {
        self.current.as_ref().or_else(|| self.history.last())
    }

    /// Finalized baskets, oldest first.
    pub fn history(&self) -> &[Basket] {
        &self.history
    }

    /// Total of every basket, finalized and open.
    pub fn grand_total(&self, catalog: &Catalog) -> CoreResult<Money> {
        self.history
            .iter()
            .chain(self.current.iter())
            .try_fold(Money::zero(), |sum, basket| -> CoreResult<Money> {
                Ok(sum.checked_add(basket.total(catalog)?)?)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::product::Product;
    use crate::receipt::CategoryReceipt;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(Product::new("1", "Fruit", "Orange", Money::from_minor(2495)).unwrap())
            .unwrap();
        catalog
            .add(Product::new("2", "Fruit", "Apple", Money::from_minor(2500)).unwrap())
            .unwrap();
        catalog
    }

    #[test]
    fn test_no_open_basket() {
        let catalog = catalog();
        let mut register = CashRegister::new();

        let err = register.add_purchase(&catalog, "1").unwrap_err();
        assert!(matches!(err, CoreError::NoOpenBasket));
        assert_eq!(err.kind(), ErrorKind::IllegalOperation);
        assert!(register
            .finalize_current(&catalog, &CategoryReceipt::default())
            .is_err());
    }

    #[test]
    fn test_unknown_barcode_leaves_basket_alone() {
        let catalog = catalog();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();
        register.start_new_basket(&catalog, &renderer).unwrap();

        let err = register.add_purchase(&catalog, "404").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(register.current().unwrap().is_empty());
    }

    #[test]
    fn test_start_new_basket_moves_current_to_history() {
        let catalog = catalog();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();

        let first = register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "1").unwrap();
        let second = register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "2").unwrap();

        assert_ne!(first, second);
        assert_eq!(register.history().len(), 1);
        assert_eq!(register.history()[0].id(), first);
        assert!(register.history()[0].is_finalized());
        assert_eq!(register.current().unwrap().id(), second);
    }

    #[test]
    fn test_grand_total_includes_open_basket() {
        let catalog = catalog();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();
        assert_eq!(register.grand_total(&catalog).unwrap(), Money::zero());

        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "1").unwrap();
        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "2").unwrap();
        register.add_purchase(&catalog, "2").unwrap();

        assert_eq!(
            register.grand_total(&catalog).unwrap(),
            Money::from_minor(2495 + 2 * 2500)
        );
    }

    #[test]
    fn test_finalize_current() {
        let catalog = catalog();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();
        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "1").unwrap();

        let text = register.finalize_current(&catalog, &renderer).unwrap();
        assert!(text.contains("Orange"));
        assert!(register.current().is_none());
        assert_eq!(register.history().len(), 1);
        assert_eq!(register.latest().unwrap().id(), register.history()[0].id());
        assert_eq!(
            register.grand_total(&catalog).unwrap(),
            Money::from_minor(2495)
        );
    }

    #[test]
    fn test_remove_purchase() {
        let catalog = catalog();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();
        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "1").unwrap();

        assert_eq!(register.remove_purchase(&catalog, "1").unwrap(), 0);
        assert!(register.remove_purchase(&catalog, "1").is_err());
        assert!(register.remove_purchase(&catalog, "ghost").is_err());
    }

    #[test]
    fn test_grand_total_overflow_is_an_error() {
        let mut catalog = catalog();
        catalog
            .add(Product::new("9", "Big", "Huge", Money::from_minor(i64::MAX)).unwrap())
            .unwrap();
        let renderer = CategoryReceipt::default();
        let mut register = CashRegister::new();

        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "9").unwrap();
        register.start_new_basket(&catalog, &renderer).unwrap();
        register.add_purchase(&catalog, "1").unwrap();

        let err = register.grand_total(&catalog).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
