//! Bulk import of `(name, quantity)` pairs.
//!
//! Turning CSV or free text into rows is the caller's business; this module
//! only takes rows that are already split into a name and a number.

use chrono::NaiveDateTime;

use warehouse_core::{DomainError, DomainResult, ProductName, Quantity};

use crate::inventory::{Inventory, Upsert};

/// One product line to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub name: String,
    pub quantity: i64,
}

impl ImportRow {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    fn validate(&self, line: usize) -> DomainResult<(ProductName, Quantity)> {
        let name = ProductName::parse(&self.name)
            .map_err(|err| DomainError::invalid_name(format!("row {line}: {err}")))?;
        let quantity = Quantity::try_from(self.quantity)
            .map_err(|err| DomainError::invalid_quantity(format!("row {line}: {err}")))?;
        Ok((name, quantity))
    }
}

impl<S: Into<String>> From<(S, i64)> for ImportRow {
    fn from((name, quantity): (S, i64)) -> Self {
        Self::new(name, quantity)
    }
}

/// How many rows created a product and how many overwrote one.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub replaced: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.created + self.replaced
    }
}

impl Inventory {
    /// Apply every row as an add-or-replace.
    ///
    /// All rows are validated first; one bad row rejects the batch with the
    /// store untouched. Each row becomes its own undoable step, so a batch of
    /// N rows takes N undos to reverse.
    pub fn import<I>(&mut self, rows: I, at: NaiveDateTime) -> DomainResult<ImportSummary>
    where
        I: IntoIterator,
        I::Item: Into<ImportRow>,
    {
        let validated = rows
            .into_iter()
            .map(Into::into)
            .enumerate()
            .map(|(idx, row): (usize, ImportRow)| row.validate(idx + 1))
            .collect::<DomainResult<Vec<_>>>()?;

        let mut summary = ImportSummary::default();
        for (name, quantity) in validated {
            match self.upsert(name, quantity, at) {
                Upsert::Created => summary.created += 1,
                Upsert::Replaced { .. } => summary.replaced += 1,
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    #[test]
    fn counts_created_and_replaced() {
        let mut inv = Inventory::new();
        inv.add_or_replace("bolt", 1, at()).unwrap();

        let summary = inv
            .import(vec![("Bolt", 10_i64), ("nut", 20), ("washer", 30), ("NUT", 25)], at())
            .unwrap();

        assert_eq!(summary, ImportSummary { created: 2, replaced: 2 });
        assert_eq!(summary.total(), 4);
        assert_eq!(inv.book().len(), 3);
        assert_eq!(inv.log().undo_depth(), 5);
    }

    #[test]
    fn one_bad_row_rejects_the_batch() {
        let mut inv = Inventory::new();
        let before = inv.clone();

        let err = inv
            .import(vec![ImportRow::new("bolt", 1), ImportRow::new("nut", -2)], at())
            .unwrap_err();

        match err {
            DomainError::InvalidQuantity(msg) => assert!(msg.contains("row 2")),
            other => panic!("Expected InvalidQuantity, got {other:?}"),
        }
        assert_eq!(inv, before);
    }

    #[test]
    fn each_row_is_its_own_undo_step() {
        let mut inv = Inventory::new();
        inv.import(vec![("a", 1_i64), ("b", 2)], at()).unwrap();

        inv.undo(at()).unwrap();
        assert_eq!(inv.book().len(), 1);
        inv.undo(at()).unwrap();
        assert!(inv.book().is_empty());
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut inv = Inventory::new();
        let summary = inv.import(Vec::<ImportRow>::new(), at()).unwrap();
        assert_eq!(summary, ImportSummary::default());
        assert_eq!(inv.log().undo_depth(), 0);
    }
}
