//! Ledger report read model.
//!
//! A disposable, rebuildable view of the store: one row per transaction with
//! the running stock level after it, plus a per-product summary. Rendering to a
//! spreadsheet or any other format is left to the caller; [`LedgerReport::records`]
//! gives plain text cells in column order.

use chrono::NaiveDateTime;
use serde::Serialize;

use warehouse_core::{ProductName, Quantity};
use warehouse_events::TransactionKind;
use warehouse_events::event::timestamp;
use warehouse_inventory::StockBook;

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub product: ProductName,
    pub action: TransactionKind,
    pub quantity: Quantity,
    #[serde(serialize_with = "timestamp::serialize")]
    pub datetime: NaiveDateTime,
    /// Stock level after this transaction, folded from the start of the log.
    pub stock_after: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub name: ProductName,
    pub quantity: Quantity,
    pub transactions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerReport {
    pub products: Vec<ProductSummary>,
    pub rows: Vec<ReportRow>,
}

impl LedgerReport {
    pub const HEADERS: [&'static str; 5] = ["Product", "Action", "Quantity", "Date/Time", "Stock After"];

    /// Build from the current store, products in name order.
    pub fn from_book(book: &StockBook) -> Self {
        let mut report = Self::default();
        for product in book.sorted() {
            report.products.push(ProductSummary {
                name: product.name().clone(),
                quantity: product.quantity(),
                transactions: product.history().len(),
            });
            report
                .rows
                .extend(product.running_stock().map(|(tx, stock_after)| ReportRow {
                    product: product.name().clone(),
                    action: tx.action,
                    quantity: tx.quantity,
                    datetime: tx.datetime,
                    stock_after,
                }));
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Rows belonging to one product.
    pub fn rows_for<'a>(&'a self, name: &'a ProductName) -> impl Iterator<Item = &'a ReportRow> + 'a {
        self.rows.iter().filter(move |row| &row.product == name)
    }

    /// Text cells in [`LedgerReport::HEADERS`] order.
    pub fn records(&self) -> Vec<[String; 5]> {
        self.rows
            .iter()
            .map(|row| {
                [
                    row.product.to_string(),
                    row.action.to_string(),
                    row.quantity.to_string(),
                    timestamp::format(&row.datetime),
                    row.stock_after.to_string(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use warehouse_inventory::Inventory;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample() -> Inventory {
        let mut inv = Inventory::new();
        inv.add_or_replace("widget", 10, at(8)).unwrap();
        inv.add_stock("widget", 5, at(9)).unwrap();
        inv.sell_stock("widget", 3, at(10)).unwrap();
        inv.add_or_replace("anchor", 2, at(11)).unwrap();
        inv
    }

    #[test]
    fn running_stock_column_follows_the_log() {
        let inv = sample();
        let report = LedgerReport::from_book(inv.book());
        let widget = ProductName::parse("widget").unwrap();

        let levels: Vec<i64> = report.rows_for(&widget).map(|row| row.stock_after).collect();
        assert_eq!(levels, vec![10, 15, 12]);

        let names: Vec<&str> = report.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["anchor", "widget"]);
        assert_eq!(report.products[1].transactions, 3);
    }

    #[test]
    fn undo_entries_show_in_the_ledger() {
        let mut inv = sample();
        inv.undo(at(12)).unwrap(); // anchor creation
        inv.undo(at(12)).unwrap(); // the sale

        let report = LedgerReport::from_book(inv.book());
        let last = report.rows.last().unwrap();
        assert_eq!(last.action, TransactionKind::UndoSell);
        assert_eq!(last.stock_after, 15);
        assert_eq!(report.products.len(), 1);
    }

    #[test]
    fn records_are_text_cells() {
        let report = LedgerReport::from_book(sample().book());
        let first = &report.records()[0];
        assert_eq!(first[0], "anchor");
        assert_eq!(first[1], "initial");
        assert_eq!(first[3], "2024-02-29T11:00:00");
        assert_eq!(LedgerReport::HEADERS[4], "Stock After");
    }

    #[test]
    fn empty_store_gives_empty_report() {
        let report = LedgerReport::from_book(&StockBook::new());
        assert!(report.is_empty());
        assert!(report.records().is_empty());
    }
}
