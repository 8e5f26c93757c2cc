//! # Receipt Commands
//!
//! Basket lifecycle from the command line.
//!
//! ```text
//! add receipt new ──► open ──► add/remove receipt <barcode> ──► close
//!                      ▲                                          │
//!                      └──── add receipt new (closes the old one) ┘
//! ```

use std::path::Path;

use super::Reply;
use crate::error::CliError;
use crate::state::Session;

/// `add receipt new`
pub fn new_basket(session: &mut Session) -> Result<Reply, CliError> {
    let id = session.start_new_basket()?;
    Ok(Reply::Text(format!("Started receipt {}", id)))
}

/// `add receipt <barcode>`
pub fn add_purchase(session: &mut Session, barcode: &str) -> Result<Reply, CliError> {
    let count = session.add_purchase(barcode)?;
    let name = session.catalog().get(barcode.trim())?.name().to_string();
    Ok(Reply::Text(format!("{} x {}", count, name)))
}

/// `remove receipt <barcode>`
pub fn remove_purchase(session: &mut Session, barcode: &str) -> Result<Reply, CliError> {
    let count = session.remove_purchase(barcode)?;
    let name = session.catalog().get(barcode.trim())?.name().to_string();
    Ok(Reply::Text(format!("{} x {}", count, name)))
}

/// `read receipt <file>`
pub fn read_receipt(session: &mut Session, path: &Path) -> Result<Reply, CliError> {
    let report = session.receipt_from_file(path)?;
    Ok(Reply::Text(report.to_string()))
}

/// `close`
pub fn close(session: &mut Session) -> Result<Reply, CliError> {
    Ok(Reply::Text(session.finalize_current()?))
}
