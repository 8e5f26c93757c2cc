//! # Catalog Commands
//!
//! `read prices`, `read discounts`, `add product`, `add discount`.

use std::path::Path;

use tracing::info;

use super::Reply;
use crate::error::CliError;
use crate::state::Session;

/// `read prices <file>`
pub fn read_products(session: &mut Session, path: &Path) -> Result<Reply, CliError> {
    let report = session.populate_catalog(path)?;
    Ok(Reply::Text(report.to_string()))
}

/// `read discounts <file>`
pub fn read_discounts(session: &mut Session, path: &Path) -> Result<Reply, CliError> {
    let report = session.load_discounts(path)?;
    Ok(Reply::Text(report.to_string()))
}

/// `add product <barcode>,<category>,<name>,<kr>,<ore>`
pub fn add_product(session: &mut Session, line: &str) -> Result<Reply, CliError> {
    session.add_product_line(line)?;
    info!(products = session.catalog().len(), "Product added");
    Ok(Reply::Text("Product added".to_string()))
}

/// `add discount <barcode>,<limit>,<kr>,<ore>`
pub fn add_discount(session: &mut Session, line: &str) -> Result<Reply, CliError> {
    session.add_discount_line(line)?;
    Ok(Reply::Text("Discount added".to_string()))
}
