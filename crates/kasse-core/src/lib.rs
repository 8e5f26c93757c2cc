//! # kasse-core: Pricing and Receipt Logic
//!
//! Pure business logic for the Kasse point-of-sale ledger: tiered product
//! prices, baskets, receipts and the register history. No I/O happens here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasse Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 kasse-cli (command loop)                        │   │
//! │  │   read files ──► decode lines ──► dispatch verbs ──► print      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasse-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │ decode  │─►│ catalog │◄─│ basket  │─►│ receipt │           │   │
//! │  │   │  lines  │  │ product │  │register │  │renderers│           │   │
//! │  │   └─────────┘  │ pricing │  └─────────┘  └─────────┘           │   │
//! │  │                └─────────┘                                      │   │
//! │  │   NO I/O • NO LOGGING SETUP • INTEGER MONEY                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Small value types ([`TaxRate`])
//! - `pricing` - Quantity tiers (crate-private)
//! - [`product`] - Catalog entries
//! - [`catalog`] - Products keyed by barcode
//! - [`basket`] - Purchases of one transaction
//! - [`receipt`] - Snapshots and text renderers
//! - [`register`] - Current basket and history
//! - [`decode`] - Product/discount line decoding
//! - [`validation`] - Shared input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasse_core::{Basket, CategoryReceipt, Catalog, Money, Product};
//!
//! let mut catalog = Catalog::new();
//! catalog.add(Product::new("12345", "MEJERI", "MÆLK", Money::from_minor(1002)).unwrap()).unwrap();
//! catalog.attach_tier("12345", 10, Money::from_minor(500)).unwrap();
//!
//! let mut basket = Basket::new();
//! let milk = catalog.get("12345").unwrap();
//! for _ in 0..10 {
//!     basket.add_purchase(milk).unwrap();
//! }
//!
//! assert_eq!(basket.total(&catalog).unwrap(), Money::from_minor(5000));
//! let text = basket.render(&catalog, &CategoryReceipt::default()).unwrap();
//! assert!(text.contains("RABAT"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod catalog;
pub mod decode;
pub mod error;
pub mod money;
pub(crate) mod pricing;
pub mod product;
pub mod receipt;
pub mod register;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::Basket;
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError, ValidationResult};
pub use money::Money;
pub use pricing::BASE_QUANTITY;
pub use product::{PriceTier, Product};
pub use receipt::{
    renderer_for, CategoryReceipt, ReceiptLayout, ReceiptRenderer, ReceiptSnapshot,
    ReceiptStyle, TotalsReceipt,
};
pub use register::CashRegister;
pub use types::TaxRate;
