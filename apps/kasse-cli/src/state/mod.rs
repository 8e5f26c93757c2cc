//! # State Module
//!
//! Session state for the command loop.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         Session                                  │  │
//! │  │                                                                  │  │
//! │  │   Catalog            CashRegister          Box<dyn Renderer>     │  │
//! │  │   products by        open basket +         chosen from           │  │
//! │  │   barcode            closed history        receipt.style         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  One operator, one thread: the loop owns the session outright, so no   │
//! │  locking is involved.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;

pub use session::{BasketSummary, HistorySummary, LineFailure, LoadReport, Session};
