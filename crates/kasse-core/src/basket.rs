//! # Basket
//!
//! The purchases of one transaction and, once finalized, its receipt.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐   finalize()    ┌─────────────┐                          │
//! │   │   Open   │ ──────────────► │  Finalized  │  (one-way)               │
//! │   └──────────┘                 └─────────────┘                          │
//! │     │  add_purchase              │  add/remove/finalize → BasketClosed  │
//! │     │  remove_purchase           │  render → cached text                │
//! │     │  render → recomputed       │  total  → frozen total               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Uses the Whole Basket
//! The unit price of a product is resolved from the TOTAL quantity of that
//! product in the basket, so each scan can move every unit of the product
//! into a cheaper tier.
//!
//! ## References Into the Catalog
//! The basket stores barcodes, not products. Prices are looked up in the
//! [`Catalog`] whenever the basket is priced while open; finalizing freezes
//! the priced [`ReceiptSnapshot`] so later tier edits can't change it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::product::Product;
use crate::receipt::{CategoryGroup, ReceiptLayout, ReceiptLine, ReceiptRenderer, ReceiptSnapshot};

/// Frozen result of finalizing a basket.
#[derive(Debug, Clone)]
struct FinalReceipt {
    snapshot: ReceiptSnapshot,
    text: String,
}

/// Barcodes of one category in first-scan order.
#[derive(Debug, Clone)]
struct Group {
    category: String,
    barcodes: Vec<String>,
}

/// A multiset of purchased products.
///
/// ## Invariants
/// - Every barcode in `counts` has a count ≥ 1
/// - Every barcode in `counts` appears in exactly one group, and vice versa
/// - Nothing changes once `finalized` is set
#[derive(Debug, Clone)]
pub struct Basket {
    id: Uuid,
    opened_at: DateTime<Utc>,
    counts: BTreeMap<String, u32>,
    groups: Vec<Group>,
    finalized: Option<FinalReceipt>,
}

impl Basket {
    /// Opens an empty basket.
    pub fn new() -> Self {
        Basket {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            counts: BTreeMap::new(),
            groups: Vec::new(),
            finalized: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    // =========================================================================
    // Mutation (Open only)
    // =========================================================================

    /// Adds one unit of `product`; returns the new purchased count.
    pub fn add_purchase(&mut self, product: &Product) -> CoreResult<u32> {
        self.ensure_open()?;

        let count = self.counts.entry(product.barcode().to_string()).or_insert(0);
        *count += 1;
        let count = *count;

        if count == 1 {
            self.register_in_group(product);
        }

        Ok(count)
    }

    /// Removes one unit of `product`; returns the remaining count.
    ///
    /// At zero the product leaves the basket and its category group.
    pub fn remove_purchase(&mut self, product: &Product) -> CoreResult<u32> {
        self.ensure_open()?;

        let barcode = product.barcode();
        let count = self
            .counts
            .get_mut(barcode)
            .ok_or_else(|| CoreError::NotInBasket(barcode.to_string()))?;
        *count -= 1;
        let remaining = *count;

        if remaining == 0 {
            self.counts.remove(barcode);
            self.unregister_from_group(barcode);
        }

        Ok(remaining)
    }

    /// Prices the basket, renders it, caches both and closes the basket.
    pub fn finalize(
        &mut self,
        catalog: &Catalog,
        renderer: &dyn ReceiptRenderer,
    ) -> CoreResult<&str> {
        self.ensure_open()?;

        let mut snapshot = self.build_snapshot(catalog, renderer.layout())?;
        snapshot.closed_at = Some(Utc::now());
        let text = renderer.render(&snapshot);

        let receipt = self.finalized.insert(FinalReceipt { snapshot, text });
        Ok(&receipt.text)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_present(&self, product: &Product) -> bool {
        self.counts.contains_key(product.barcode())
    }

    /// Purchased count, if the barcode is in the basket.
    pub fn quantity(&self, barcode: &str) -> Option<u32> {
        self.counts.get(barcode).copied()
    }

    /// Unit price of `product`: the base price when `is_base`, otherwise the
    /// price resolved for the purchased count.
    pub fn unit_price(&self, product: &Product, is_base: bool) -> CoreResult<Money> {
        let quantity = self
            .quantity(product.barcode())
            .ok_or_else(|| CoreError::NotInBasket(product.barcode().to_string()))?;

        if is_base {
            product.base_price()
        } else {
            product.final_price(quantity)
        }
    }

    /// Sum of `resolved unit price * count` over all products.
    ///
    /// A finalized basket answers with its frozen total.
    pub fn total(&self, catalog: &Catalog) -> CoreResult<Money> {
        if let Some(receipt) = &self.finalized {
            return Ok(receipt.snapshot.total);
        }

        self.counts
            .iter()
            .try_fold(Money::zero(), |total, (barcode, &qty)| -> CoreResult<Money> {
                let product = catalog.get(barcode)?;
                let line_total = self.unit_price(product, false)?.checked_mul_quantity(qty)?;
                Ok(total.checked_add(line_total)?)
            })
    }

    /// Priced view of the basket; frozen once finalized.
    pub fn snapshot(&self, catalog: &Catalog, layout: &ReceiptLayout) -> CoreResult<ReceiptSnapshot> {
        match &self.finalized {
            Some(receipt) => Ok(receipt.snapshot.clone()),
            None => self.build_snapshot(catalog, layout),
        }
    }

    /// Receipt text: rendered on the fly while open, cached once finalized.
    pub fn render(&self, catalog: &Catalog, renderer: &dyn ReceiptRenderer) -> CoreResult<String> {
        match &self.finalized {
            Some(receipt) => Ok(receipt.text.clone()),
            None => {
                let snapshot = self.build_snapshot(catalog, renderer.layout())?;
                Ok(renderer.render(&snapshot))
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_finalized() {
            return Err(CoreError::BasketClosed {
                basket_id: self.id.to_string(),
            });
        }
        Ok(())
    }

    fn register_in_group(&mut self, product: &Product) {
        let barcode = product.barcode().to_string();
        match self
            .groups
            .iter_mut()
            .find(|g| g.category == product.category())
        {
            Some(group) => group.barcodes.push(barcode),
            None => self.groups.push(Group {
                category: product.category().to_string(),
                barcodes: vec![barcode],
            }),
        }
    }

    fn unregister_from_group(&mut self, barcode: &str) {
        for group in &mut self.groups {
            group.barcodes.retain(|b| b != barcode);
        }
        self.groups.retain(|g| !g.barcodes.is_empty());
    }

    fn build_snapshot(&self, catalog: &Catalog, layout: &ReceiptLayout) -> CoreResult<ReceiptSnapshot> {
        let mut categories = Vec::with_capacity(self.groups.len());
        let mut total = Money::zero();

        for group in &self.groups {
            let mut lines = Vec::with_capacity(group.barcodes.len());

            for barcode in &group.barcodes {
                let product = catalog.get(barcode)?;
                let quantity = self
                    .quantity(barcode)
                    .ok_or_else(|| CoreError::NotInBasket(barcode.clone()))?;
                let base_unit_price = self.unit_price(product, true)?;
                let unit_price = self.unit_price(product, false)?;
                let line_total = unit_price.checked_mul_quantity(quantity)?;
                let base_total = base_unit_price.checked_mul_quantity(quantity)?;

                total = total.checked_add(line_total)?;
                lines.push(ReceiptLine {
                    barcode: barcode.clone(),
                    name: product.name().to_string(),
                    quantity,
                    base_unit_price,
                    unit_price,
                    line_total,
                    discount: base_total - line_total,
                });
            }

            categories.push(CategoryGroup {
                category: group.category.clone(),
                lines,
            });
        }

        Ok(ReceiptSnapshot {
            basket_id: self.id,
            opened_at: self.opened_at,
            closed_at: None,
            categories,
            total,
            marks: total.whole_units_of(layout.kroner_per_mark),
            tax: total.included_tax(layout.tax_rate),
        })
    }
}

impl Default for Basket {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
