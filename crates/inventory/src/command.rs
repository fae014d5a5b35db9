//! Invertible command records.
//!
//! Each record carries the pre-image it needs to be undone and redone without
//! looking anything up beyond the product it names:
//!
//! | Record | Undo | Redo |
//! |---|---|---|
//! | `AddProduct` | remove the product | recreate it with an `initial` entry |
//! | `RemoveProduct` | reinsert the snapshot verbatim | remove it again |
//! | `Replace` | `initial_replace` back to the old level | `initial_replace` to the new level |
//! | `AddStock` | restore the previous level, log `undo_add` | `add` the delta again |
//! | `SellStock` | restore the previous level, log `undo_sell` | `sell` the delta again |
//!
//! Undo never removes log entries; it appends compensating ones.
//!
//! Application checks every precondition before touching the book, so a record
//! either applies completely or not at all. Under linear undo/redo the
//! preconditions always hold; a [`DomainError::ReplayConflict`] means the book
//! was changed behind the log's back.

use chrono::NaiveDateTime;

use warehouse_core::{DomainError, DomainResult, ProductName, Quantity};

use crate::book::StockBook;
use crate::product::Product;
use crate::snapshot::ProductSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRecord {
    AddProduct {
        name: ProductName,
        quantity: Quantity,
    },
    RemoveProduct {
        snapshot: ProductSnapshot,
    },
    Replace {
        name: ProductName,
        old_quantity: Quantity,
        new_quantity: Quantity,
    },
    AddStock {
        name: ProductName,
        delta: Quantity,
        previous_quantity: Quantity,
    },
    SellStock {
        name: ProductName,
        delta: Quantity,
        previous_quantity: Quantity,
    },
}

impl CommandRecord {
    /// Stable command name (e.g. "stock.sell").
    pub fn kind(&self) -> &'static str {
        match self {
            CommandRecord::AddProduct { .. } => "product.add",
            CommandRecord::RemoveProduct { .. } => "product.remove",
            CommandRecord::Replace { .. } => "product.replace",
            CommandRecord::AddStock { .. } => "stock.add",
            CommandRecord::SellStock { .. } => "stock.sell",
        }
    }

    /// The product this record touches.
    pub fn product(&self) -> &ProductName {
        match self {
            CommandRecord::AddProduct { name, .. }
            | CommandRecord::Replace { name, .. }
            | CommandRecord::AddStock { name, .. }
            | CommandRecord::SellStock { name, .. } => name,
            CommandRecord::RemoveProduct { snapshot } => &snapshot.name,
        }
    }

    /// Apply the inverse effect.
    pub fn undo(&self, book: &mut StockBook, at: NaiveDateTime) -> DomainResult<()> {
        match self {
            CommandRecord::AddProduct { name, .. } => {
                if book.remove(name).is_none() {
                    return Err(missing(name));
                }
            }
            CommandRecord::RemoveProduct { snapshot } => {
                if book.contains(&snapshot.name) {
                    return Err(present(&snapshot.name));
                }
                book.insert(Product::from_snapshot(snapshot.clone()));
            }
            CommandRecord::Replace {
                name,
                old_quantity,
                new_quantity,
            } => {
                let product = existing(book, name)?;
                expect_level(product, *new_quantity)?;
                product.replace(*old_quantity, at);
            }
            CommandRecord::AddStock {
                name,
                delta,
                previous_quantity,
            } => {
                let after_receipt = previous_quantity
                    .checked_add(*delta)
                    .ok_or_else(|| malformed(self))?;
                let product = existing(book, name)?;
                expect_level(product, after_receipt)?;
                product.revert_add(*previous_quantity, *delta, at);
            }
            CommandRecord::SellStock {
                name,
                delta,
                previous_quantity,
            } => {
                let after_sale = previous_quantity
                    .checked_sub(*delta)
                    .ok_or_else(|| malformed(self))?;
                let product = existing(book, name)?;
                expect_level(product, after_sale)?;
                product.revert_sell(*previous_quantity, *delta, at);
            }
        }
        Ok(())
    }

    /// Re-apply the forward effect.
    pub fn redo(&self, book: &mut StockBook, at: NaiveDateTime) -> DomainResult<()> {
        match self {
            CommandRecord::AddProduct { name, quantity } => {
                if book.contains(name) {
                    return Err(present(name));
                }
                book.insert(Product::create(name.clone(), *quantity, at));
            }
            CommandRecord::RemoveProduct { snapshot } => {
                if book.remove(&snapshot.name).is_none() {
                    return Err(missing(&snapshot.name));
                }
            }
            CommandRecord::Replace {
                name,
                old_quantity,
                new_quantity,
            } => {
                let product = existing(book, name)?;
                expect_level(product, *old_quantity)?;
                product.replace(*new_quantity, at);
            }
            CommandRecord::AddStock {
                name,
                delta,
                previous_quantity,
            } => {
                let product = existing(book, name)?;
                expect_level(product, *previous_quantity)?;
                product
                    .add(*delta, at)
                    .map_err(|err| DomainError::replay_conflict(err.to_string()))?;
            }
            CommandRecord::SellStock {
                name,
                delta,
                previous_quantity,
            } => {
                let product = existing(book, name)?;
                expect_level(product, *previous_quantity)?;
                product
                    .try_sell(*delta, at)
                    .map_err(|err| DomainError::replay_conflict(err.to_string()))?;
            }
        }
        Ok(())
    }
}

fn existing<'a>(book: &'a mut StockBook, name: &ProductName) -> DomainResult<&'a mut Product> {
    book.get_mut(name).ok_or_else(|| missing(name))
}

fn expect_level(product: &Product, expected: Quantity) -> DomainResult<()> {
    if product.quantity() == expected {
        Ok(())
    } else {
        Err(DomainError::replay_conflict(format!(
            "{} holds {} units, expected {expected}",
            product.name(),
            product.quantity()
        )))
    }
}

fn missing(name: &ProductName) -> DomainError {
    DomainError::replay_conflict(format!("{name} is not in the store"))
}

fn present(name: &ProductName) -> DomainError {
    DomainError::replay_conflict(format!("{name} is already in the store"))
}

fn malformed(record: &CommandRecord) -> DomainError {
    DomainError::replay_conflict(format!(
        "{} record for {} is inconsistent",
        record.kind(),
        record.product()
    ))
}
