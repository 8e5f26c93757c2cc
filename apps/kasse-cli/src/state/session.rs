//! # Session State
//!
//! Everything one operator session owns: the catalog, the register and the
//! receipt renderer picked by configuration.
//!
//! ## File Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line-by-line loading                                 │
//! │                                                                         │
//! │  read_to_string(path) ── missing? ──► CliError (FileNotFound)           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  for each line:                                                         │
//! │     blank?          ──► skipped                                         │
//! │     decode + apply  ──► applied                                         │
//! │     any error       ──► recorded in LoadReport, next line               │
//! │                                                                         │
//! │  A bad line never stops the file and never half-changes the catalog.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::Path;

use kasse_core::decode::{decode_discount_line, decode_product_line};
use kasse_core::{
    renderer_for, CashRegister, Catalog, CoreError, Money, ReceiptLayout, ReceiptRenderer,
    ReceiptSnapshot,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::CliError;

// =============================================================================
// Load Report
// =============================================================================

/// A rejected line from an input file.
#[derive(Debug, Clone)]
pub struct LineFailure {
    /// 1-based line number in the file
    pub line_no: usize,
    pub line: String,
    pub error: CliError,
}

/// Outcome of processing one input file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// What was loaded, for the summary line ("products", "discounts", ...)
    pub subject: &'static str,
    pub applied: usize,
    pub skipped_blank: usize,
    pub failures: Vec<LineFailure>,
}

impl LoadReport {
    fn new(subject: &'static str) -> Self {
        LoadReport {
            subject,
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(
                f,
                "line {}: {} (\"{}\")",
                failure.line_no, failure.error, failure.line
            )?;
        }
        write!(f, "Read {} {}", self.applied, self.subject)?;
        if !self.failures.is_empty() {
            write!(f, ", {} line(s) rejected", self.failures.len())?;
        }
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// One interactive session.
pub struct Session {
    catalog: Catalog,
    register: CashRegister,
    renderer: Box<dyn ReceiptRenderer>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Session {
            catalog: Catalog::new(),
            register: CashRegister::new(),
            renderer: renderer_for(config.receipt.style, config.layout()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn register(&self) -> &CashRegister {
        &self.register
    }

    pub fn layout(&self) -> &ReceiptLayout {
        self.renderer.layout()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds one product from a `<barcode>,<category>,<name>,<kr>,<ore>` line.
    pub fn add_product_line(&mut self, line: &str) -> Result<(), CliError> {
        let record = decode_product_line(line)?;
        debug!(barcode = %record.barcode, "Adding product");
        record.apply(&mut self.catalog)?;
        Ok(())
    }

    /// Attaches one tier from a `<barcode>,<limit>,<kr>,<ore>` line.
    pub fn add_discount_line(&mut self, line: &str) -> Result<(), CliError> {
        let record = decode_discount_line(line)?;
        debug!(
            barcode = %record.barcode,
            min_quantity = record.min_quantity,
            "Adding discount tier"
        );
        record.apply(&mut self.catalog)?;
        Ok(())
    }

    /// Reads a price file into the catalog.
    pub fn populate_catalog(&mut self, path: &Path) -> Result<LoadReport, CliError> {
        self.load_lines(path, "products", Self::add_product_line)
    }

    /// Reads a discount file and attaches every tier.
    pub fn load_discounts(&mut self, path: &Path) -> Result<LoadReport, CliError> {
        self.load_lines(path, "discounts", Self::add_discount_line)
    }

    // =========================================================================
    // Baskets
    // =========================================================================

    /// Opens a new basket; the open one (if any) goes to history first.
    pub fn start_new_basket(&mut self) -> Result<Uuid, CliError> {
        let id = self
            .register
            .start_new_basket(&self.catalog, self.renderer.as_ref())?;
        info!(basket_id = %id, "Started new basket");
        Ok(id)
    }

    /// Scans one unit of `barcode`. Returns the new count.
    pub fn add_purchase(&mut self, barcode: &str) -> Result<u32, CliError> {
        let count = self.register.add_purchase(&self.catalog, barcode.trim())?;
        debug!(barcode = %barcode, count, "Purchase added");
        Ok(count)
    }

    /// Takes one unit of `barcode` back out. Returns the remaining count.
    pub fn remove_purchase(&mut self, barcode: &str) -> Result<u32, CliError> {
        let count = self
            .register
            .remove_purchase(&self.catalog, barcode.trim())?;
        debug!(barcode = %barcode, count, "Purchase removed");
        Ok(count)
    }

    /// Starts a basket and scans one barcode per line of `path`.
    ///
    /// The file must exist before anything changes.
    pub fn receipt_from_file(&mut self, path: &Path) -> Result<LoadReport, CliError> {
        let contents = read_file(path)?;
        self.start_new_basket()?;
        Ok(self.apply_lines(path, &contents, "purchases", |session, line| {
            session.add_purchase(line).map(|_| ())
        }))
    }

    /// Closes the open basket and returns its receipt text.
    pub fn finalize_current(&mut self) -> Result<String, CliError> {
        let text = self
            .register
            .finalize_current(&self.catalog, self.renderer.as_ref())?;
        info!(baskets = self.register.history().len(), "Basket closed");
        Ok(text)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Receipt of the open basket, else of the last closed one.
    pub fn render_current(&self) -> Result<String, CliError> {
        let basket = self.register.latest().ok_or(CoreError::NoOpenBasket)?;
        Ok(basket.render(&self.catalog, self.renderer.as_ref())?)
    }

    /// Snapshot of the same basket `render_current` prints.
    pub fn current_snapshot(&self) -> Result<ReceiptSnapshot, CliError> {
        let basket = self.register.latest().ok_or(CoreError::NoOpenBasket)?;
        Ok(basket.snapshot(&self.catalog, self.layout())?)
    }

    /// Pretty JSON of [`Session::current_snapshot`].
    pub fn current_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self.current_snapshot()?)?)
    }

    /// Sum over every basket, closed and open.
    pub fn grand_total(&self) -> Result<Money, CliError> {
        Ok(self.register.grand_total(&self.catalog)?)
    }

    /// Per-basket totals for `print all`.
    pub fn history_summary(&self) -> Result<HistorySummary, CliError> {
        let baskets = self
            .register
            .history()
            .iter()
            .chain(self.register.current())
            .map(|basket| {
                Ok(BasketSummary {
                    basket_id: basket.id(),
                    open: !basket.is_finalized(),
                    total: basket.total(&self.catalog)?,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(HistorySummary {
            total: self.grand_total()?,
            baskets,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn load_lines<F>(
        &mut self,
        path: &Path,
        subject: &'static str,
        apply: F,
    ) -> Result<LoadReport, CliError>
    where
        F: Fn(&mut Self, &str) -> Result<(), CliError>,
    {
        let contents = read_file(path)?;
        Ok(self.apply_lines(path, &contents, subject, apply))
    }

    fn apply_lines<F>(
        &mut self,
        path: &Path,
        contents: &str,
        subject: &'static str,
        apply: F,
    ) -> LoadReport
    where
        F: Fn(&mut Self, &str) -> Result<(), CliError>,
    {
        let mut report = LoadReport::new(subject);

        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                report.skipped_blank += 1;
                continue;
            }

            match apply(self, line) {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    debug!(
                        path = %path.display(),
                        line_no = index + 1,
                        "Rejected line: {}",
                        error
                    );
                    report.failures.push(LineFailure {
                        line_no: index + 1,
                        line: line.to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            path = %path.display(),
            applied = report.applied,
            rejected = report.failures.len(),
            "Read {}",
            subject
        );
        report
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::from_io(path, e))
}

// =============================================================================
// History Summary
// =============================================================================

/// One basket's line in `print all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketSummary {
    pub basket_id: Uuid,
    pub open: bool,
    pub total: Money,
}

/// Totals across the register history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub baskets: Vec<BasketSummary>,
    pub total: Money,
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOTAL: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn session() -> Session {
        let mut session = Session::new(&AppConfig::default());
        session.add_product_line("12345,MEJERI,MÆLK,10,02").unwrap();
        session.add_product_line("2,FRUGT,ÆBLE,3,00").unwrap();
        session
    }

    #[test]
    fn test_add_lines() {
        let mut session = session();
        assert_eq!(session.catalog().len(), 2);

        let err = session.add_product_line("1235,test,test,10").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(session.catalog().len(), 2);

        let err = session.add_discount_line("999,2,1,00").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!session.catalog().has("999"));

        session.add_discount_line("12345,10,5,00").unwrap();
        assert_eq!(
            session.catalog().get("12345").unwrap().final_price(10).unwrap(),
            Money::from_minor(500)
        );
    }

    #[test]
    fn test_purchase_needs_open_basket() {
        let mut session = session();
        let err = session.add_purchase("12345").unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalOperation);
        assert!(session.render_current().is_err());
    }

    #[test]
    fn test_render_falls_back_to_last_closed() {
        let mut session = session();
        session.start_new_basket().unwrap();
        session.add_purchase("2").unwrap();
        let closed = session.finalize_current().unwrap();

        assert_eq!(session.render_current().unwrap(), closed);
        assert!(session.add_purchase("2").is_err());
    }

    #[test]
    fn test_history_summary() {
        let mut session = session();
        session.start_new_basket().unwrap();
        session.add_purchase("2").unwrap();
        session.start_new_basket().unwrap();
        session.add_purchase("12345").unwrap();

        let summary = session.history_summary().unwrap();
        assert_eq!(summary.baskets.len(), 2);
        assert!(!summary.baskets[0].open);
        assert!(summary.baskets[1].open);
        assert_eq!(summary.total, Money::from_minor(300 + 1002));
        assert_eq!(summary.to_string(), "TOTAL: 13,02");
    }

    #[test]
    fn test_load_report_display() {
        let mut report = LoadReport::new("products");
        report.applied = 3;
        report.failures.push(LineFailure {
            line_no: 2,
            line: "bad".to_string(),
            error: CliError::new(ErrorCode::ValidationError, "broken"),
        });

        assert!(!report.is_clean());
        assert_eq!(
            report.to_string(),
            "line 2: broken (\"bad\")\nRead 3 products, 1 line(s) rejected"
        );
    }
}
