//! # Tiered Pricing
//!
//! Quantity-based price breaks for a single product.
//!
//! ## Resolution Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tiers:   qty ≥ 1 → 1,20     qty ≥ 5 → 1,00     qty ≥ 10 → 0,50         │
//! │                                                                         │
//! │  bought:  0  1  2  3  4 │ 5  6  7  8  9 │ 10 11 12 ...                  │
//! │  price:   ── 1,20 ───── │ ─── 1,00 ──── │ ──── 0,50 ────►               │
//! │                                                                         │
//! │  The tier with the greatest threshold ≤ quantity wins. Thresholds are  │
//! │  map keys, so two tiers can never tie.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The quantity is always the TOTAL bought of the product in the basket,
//! never a single scan: ten separate scans of the same barcode reach the
//! ten-piece tier.
//!
//! `TieredPrice` is crate-private. Outside code only sees it through
//! [`Product`](crate::product::Product).

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_min_quantity, validate_price};

/// Quantity of the tier that holds the normal (non-discounted) price.
pub const BASE_QUANTITY: u32 = 1;

/// Mapping from minimum quantity to unit price.
///
/// ## Invariants
/// - A tier at [`BASE_QUANTITY`] always exists
/// - No price is negative
/// - No tier sits at quantity 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TieredPrice {
    tiers: BTreeMap<u32, Money>,
}

impl TieredPrice {
    /// Creates a price with only the base tier.
    pub fn new(base_price: Money) -> CoreResult<Self> {
        validate_price(base_price)?;

        let mut tiers = BTreeMap::new();
        tiers.insert(BASE_QUANTITY, base_price);
        Ok(TieredPrice { tiers })
    }

    /// Inserts a tier, overwriting any tier at the same threshold.
    ///
    /// A tier at quantity 1 replaces the base price.
    pub fn add_tier(&mut self, min_quantity: u32, price: Money) -> CoreResult<()> {
        validate_min_quantity(min_quantity)?;
        validate_price(price)?;

        self.tiers.insert(min_quantity, price);
        Ok(())
    }

    /// Removes a discount tier and returns its price, if one was registered.
    ///
    /// Removing a threshold that has no tier is a no-op.
    pub fn remove_tier(&mut self, min_quantity: u32) -> CoreResult<Option<Money>> {
        if min_quantity == BASE_QUANTITY {
            return Err(CoreError::BaseTierProtected);
        }

        Ok(self.tiers.remove(&min_quantity))
    }

    /// Drops every tier except the base price.
    pub fn clear_tiers(&mut self) {
        self.tiers.retain(|&qty, _| qty == BASE_QUANTITY);
    }

    /// The quantity-1 price.
    pub fn base_price(&self) -> CoreResult<Money> {
        self.tiers
            .get(&BASE_QUANTITY)
            .copied()
            .ok_or(CoreError::MissingBaseTier)
    }

    /// The unit price that applies when `quantity` units are bought.
    ///
    /// Quantity 0 prices at the base tier.
    pub fn resolve(&self, quantity: u32) -> CoreResult<Money> {
        self.tiers
            .range(..=quantity.max(BASE_QUANTITY))
            .next_back()
            .map(|(_, price)| *price)
            .ok_or(CoreError::MissingBaseTier)
    }

    /// Copy of all tiers in ascending threshold order.
    pub fn tiers(&self) -> Vec<(u32, Money)> {
        self.tiers.iter().map(|(q, p)| (*q, *p)).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
