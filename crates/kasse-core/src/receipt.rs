//! # Receipt Rendering
//!
//! Turns a frozen basket snapshot into receipt text.
//!
//! ## Category Receipt Layout (38 columns)
//! ```text
//! ┌──────────────────────────────────────┐
//! │             * MEJERI *               │  header centered in 38 columns
//! │FRILANDSÆG                       25,95│  qty 1: name ← 28 → | amount → 10
//! │SKUMMETMÆLK                           │  qty > 1: name alone...
//! │ 3 x 5,95                        17,85│  ...then " qty x base" and total
//! │SKYR YOGHURT                          │
//! │ 2 x 22,75                       26,00│
//! │RABAT                            19,50-  discount marker past column 38
//! │                                      │
//! │TOTAL                           101,90│
//! │                                      │
//! │KØBET HAR UDLØST 2 MÆRKER             │  one mark per 50 kr
//! │                                      │
//! │MOMS UDGØR                       20,38│  25% tax contained in the total
//! └──────────────────────────────────────┘
//! ```
//!
//! ## Renderer Selection
//! Renderers implement [`ReceiptRenderer`] and only ever see a
//! [`ReceiptSnapshot`]; which one is used is a configuration choice
//! ([`ReceiptStyle`]), resolved by [`renderer_for`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Layout Constants
// =============================================================================

/// Total receipt width in columns.
pub const LINE_WIDTH: usize = 38;

/// Width of the left-aligned label column; the amount fills the rest.
pub const LABEL_WIDTH: usize = 28;

/// Sales tax contained in every price, in whole percent.
pub const SALES_TAX_PERCENT: u32 = 25;

/// Spend needed for one loyalty mark (50 kr).
pub const KRONER_PER_MARK: Money = Money::from_major_minor(50, 0);

const DISCOUNT_LABEL: &str = "RABAT";
const TOTAL_LABEL: &str = "TOTAL";
const TAX_LABEL: &str = "MOMS UDGØR";

// =============================================================================
// Snapshot
// =============================================================================

/// One product line of a receipt, fully priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub barcode: String,
    pub name: String,
    pub quantity: u32,
    /// Quantity-1 price.
    pub base_unit_price: Money,
    /// Price resolved for the total quantity bought.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub line_total: Money,
    /// `base_unit_price * quantity - line_total`.
    pub discount: Money,
}

impl ReceiptLine {
    /// True when the resolved price differs from the base price.
    pub fn is_discounted(&self) -> bool {
        self.unit_price != self.base_unit_price
    }
}

/// Lines sharing a category, in the order they were first scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub lines: Vec<ReceiptLine>,
}

/// Everything a renderer needs, computed once from a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSnapshot {
    pub basket_id: Uuid,
    pub opened_at: DateTime<Utc>,
    /// Set once the basket is finalized.
    pub closed_at: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryGroup>,
    pub total: Money,
    pub marks: u64,
    pub tax: Money,
}

impl ReceiptSnapshot {
    /// Number of distinct products on the receipt.
    pub fn line_count(&self) -> usize {
        self.categories.iter().map(|g| g.lines.len()).sum()
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Column widths and the tax/mark policy used when building a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptLayout {
    pub line_width: usize,
    pub label_width: usize,
    pub tax_rate: TaxRate,
    pub kroner_per_mark: Money,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        ReceiptLayout {
            line_width: LINE_WIDTH,
            label_width: LABEL_WIDTH,
            tax_rate: TaxRate::from_percent(SALES_TAX_PERCENT),
            kroner_per_mark: KRONER_PER_MARK,
        }
    }
}

impl ReceiptLayout {
    /// `label` left-aligned in the label column, `amount` right-aligned after it.
    pub fn priced_line(&self, label: &str, amount: Money) -> String {
        let amount_width = self.line_width.saturating_sub(self.label_width);
        format!(
            "{:<label_w$}{:>amount_w$}",
            label,
            amount,
            label_w = self.label_width,
            amount_w = amount_width
        )
    }

    /// `* CATEGORY *` shifted right to sit in the middle of the line.
    pub fn category_header(&self, category: &str) -> String {
        let header = format!("* {} *", category);
        let len = header.chars().count() as i64;
        let indent = ((self.line_width as i64 - len) / 2 - 1).max(0) as usize;
        format!("{}{}", " ".repeat(indent), header)
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// Produces receipt text from a snapshot.
pub trait ReceiptRenderer {
    /// Layout used both for text and for the tax/marks figures in the snapshot.
    fn layout(&self) -> &ReceiptLayout;

    fn render(&self, snapshot: &ReceiptSnapshot) -> String;
}

/// Full receipt grouped by category, with discounts, marks and tax.
#[derive(Debug, Clone, Default)]
pub struct CategoryReceipt {
    layout: ReceiptLayout,
}

impl CategoryReceipt {
    pub fn new(layout: ReceiptLayout) -> Self {
        CategoryReceipt { layout }
    }
}

impl ReceiptRenderer for CategoryReceipt {
    fn layout(&self) -> &ReceiptLayout {
        &self.layout
    }

    fn render(&self, snapshot: &ReceiptSnapshot) -> String {
        let layout = &self.layout;
        let mut out = String::from("\n");

        for group in &snapshot.categories {
            out.push_str(&layout.category_header(&group.category));
            out.push('\n');

            for line in &group.lines {
                if line.quantity == 1 {
                    out.push_str(&layout.priced_line(&line.name, line.line_total));
                    out.push('\n');
                } else {
                    out.push_str(&line.name);
                    out.push('\n');
                    let qty_label = format!(" {} x {}", line.quantity, line.base_unit_price);
                    out.push_str(&layout.priced_line(&qty_label, line.line_total));
                    out.push('\n');
                }

                if line.is_discounted() {
                    out.push_str(&layout.priced_line(DISCOUNT_LABEL, line.discount));
                    out.push_str("-\n");
                }
            }

            out.push('\n');
        }

        out.push_str(&layout.priced_line(TOTAL_LABEL, snapshot.total));
        out.push_str("\n\n");

        out.push_str(&format!("KØBET HAR UDLØST {} MÆRKER\n\n", snapshot.marks));

        out.push_str(&layout.priced_line(TAX_LABEL, snapshot.tax));
        out.push_str("\n\n");

        out
    }
}

/// One-line receipt with the total only.
#[derive(Debug, Clone, Default)]
pub struct TotalsReceipt {
    layout: ReceiptLayout,
}

impl TotalsReceipt {
    pub fn new(layout: ReceiptLayout) -> Self {
        TotalsReceipt { layout }
    }
}

impl ReceiptRenderer for TotalsReceipt {
    fn layout(&self) -> &ReceiptLayout {
        &self.layout
    }

    fn render(&self, snapshot: &ReceiptSnapshot) -> String {
        format!("TOTAL: {}", snapshot.total)
    }
}

/// Which renderer to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStyle {
    /// [`CategoryReceipt`]
    #[default]
    Category,
    /// [`TotalsReceipt`]
    Totals,
}

impl FromStr for ReceiptStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(ReceiptStyle::Category),
            "totals" | "simple" => Ok(ReceiptStyle::Totals),
            other => Err(ValidationError::InvalidFormat {
                field: "receipt style".to_string(),
                reason: format!("unknown style \"{}\", expected category or totals", other),
            }),
        }
    }
}

/// Builds the renderer selected by configuration.
pub fn renderer_for(style: ReceiptStyle, layout: ReceiptLayout) -> Box<dyn ReceiptRenderer> {
    match style {
        ReceiptStyle::Category => Box::new(CategoryReceipt::new(layout)),
        ReceiptStyle::Totals => Box::new(TotalsReceipt::new(layout)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, qty: u32, base: i64, unit: i64) -> ReceiptLine {
        let base = Money::from_minor(base);
        let unit = Money::from_minor(unit);
        ReceiptLine {
            barcode: name.to_lowercase(),
            name: name.to_string(),
            quantity: qty,
            base_unit_price: base,
            unit_price: unit,
            line_total: Money::from_minor(unit.minor() * i64::from(qty)),
            discount: Money::from_minor((base.minor() - unit.minor()) * i64::from(qty)),
        }
    }

    fn snapshot(categories: Vec<CategoryGroup>, total: i64) -> ReceiptSnapshot {
        let layout = ReceiptLayout::default();
        let total = Money::from_minor(total);
        ReceiptSnapshot {
            basket_id: Uuid::nil(),
            opened_at: Utc::now(),
            closed_at: None,
            categories,
            total,
            marks: total.whole_units_of(layout.kroner_per_mark),
            tax: total.included_tax(layout.tax_rate),
        }
    }

    #[test]
    fn test_priced_line_columns() {
        let layout = ReceiptLayout::default();
        let text = layout.priced_line("FRILANDSÆG", Money::from_minor(2595));

        assert_eq!(text.chars().count(), LINE_WIDTH);
        assert!(text.starts_with("FRILANDSÆG "));
        assert!(text.ends_with("     25,95"));
    }

    #[test]
    fn test_category_header_centering() {
        let layout = ReceiptLayout::default();
        // "* MEJERI *" is 10 chars: (38 - 10) / 2 - 1 = 13 spaces
        assert_eq!(layout.category_header("MEJERI"), format!("{}* MEJERI *", " ".repeat(13)));
        let long = "X".repeat(40);
        assert_eq!(layout.category_header(&long), format!("* {} *", long));
    }

    #[test]
    fn test_category_receipt_single_and_multi() {
        let snap = snapshot(
            vec![CategoryGroup {
                category: "MEJERI".to_string(),
                lines: vec![line("FRILANDSÆG", 1, 2595, 2595), line("SKUMMETMÆLK", 3, 595, 595)],
            }],
            4380,
        );
        let text = CategoryReceipt::default().render(&snap);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], format!("{}* MEJERI *", " ".repeat(13)));
        assert_eq!(lines[2], format!("{:<28}{:>10}", "FRILANDSÆG", "25,95"));
        assert_eq!(lines[3], "SKUMMETMÆLK");
        assert_eq!(lines[4], format!("{:<28}{:>10}", " 3 x 5,95", "17,85"));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], format!("{:<28}{:>10}", "TOTAL", "43,80"));
        assert_eq!(lines[8], "KØBET HAR UDLØST 0 MÆRKER");
        assert_eq!(lines[10], format!("{:<28}{:>10}", "MOMS UDGØR", "8,76"));
        assert!(!text.contains("RABAT"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_category_receipt_discount_line() {
        let snap = snapshot(
            vec![CategoryGroup {
                category: "Dairy".to_string(),
                lines: vec![line("Milk", 10, 1002, 500)],
            }],
            5000,
        );
        let text = CategoryReceipt::default().render(&snap);

        assert!(text.contains(&format!("{:<28}{:>10}\n", " 10 x 10,02", "50,00")));
        assert!(text.contains(&format!("{:<28}{:>10}-\n", "RABAT", "50,20")));
        assert!(text.contains("KØBET HAR UDLØST 1 MÆRKER"));
    }

    #[test]
    fn test_empty_receipt() {
        let text = CategoryReceipt::default().render(&snapshot(vec![], 0));
        let expected = format!(
            "\n{:<28}{:>10}\n\nKØBET HAR UDLØST 0 MÆRKER\n\n{:<28}{:>10}\n\n",
            "TOTAL", "0,00", "MOMS UDGØR", "0,00"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_totals_receipt() {
        let text = TotalsReceipt::default().render(&snapshot(vec![], 2385));
        assert_eq!(text, "TOTAL: 23,85");
    }

    #[test]
    fn test_receipt_style_parsing() {
        assert_eq!("category".parse::<ReceiptStyle>().unwrap(), ReceiptStyle::Category);
        assert_eq!(" Totals ".parse::<ReceiptStyle>().unwrap(), ReceiptStyle::Totals);
        assert!("fancy".parse::<ReceiptStyle>().is_err());
    }

    #[test]
    fn test_renderer_for_style() {
        let snap = snapshot(vec![], 100);
        let layout = ReceiptLayout::default();
        assert_eq!(renderer_for(ReceiptStyle::Totals, layout).render(&snap), "TOTAL: 1,00");
        assert!(renderer_for(ReceiptStyle::Category, layout)
            .render(&snap)
            .contains("MOMS UDGØR"));
    }
}
