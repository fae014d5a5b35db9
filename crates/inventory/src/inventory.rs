use chrono::NaiveDateTime;

use warehouse_core::{DomainError, DomainResult, ProductName, Quantity};

use crate::book::StockBook;
use crate::command::CommandRecord;
use crate::history::CommandLog;
use crate::product::Product;
use crate::snapshot::{ProductSnapshot, StoreSnapshot};

/// Outcome of [`Inventory::add_or_replace`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Replaced { previous: Quantity },
}

/// Aggregate: the entity store plus its undo/redo history.
///
/// Every successful mutation pushes exactly one record and clears the redo
/// stack; every rejected one leaves both the book and the log untouched.
/// Inputs are validated (names normalized, quantities coerced) before any
/// lookup or mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    book: StockBook,
    log: CommandLog,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(max_depth: Option<usize>) -> Self {
        Self {
            book: StockBook::new(),
            log: CommandLog::with_limit(max_depth),
        }
    }

    /// Rehydrate from a persisted snapshot. History always starts empty.
    pub fn from_snapshot(snapshot: StoreSnapshot, max_depth: Option<usize>) -> Self {
        Self {
            book: StockBook::from_snapshot(snapshot),
            log: CommandLog::with_limit(max_depth),
        }
    }

    pub fn book(&self) -> &StockBook {
        &self.book
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.book.snapshot()
    }

    /// Create `name` with `quantity`, or overwrite its level if it exists.
    pub fn add_or_replace(
        &mut self,
        name: &str,
        quantity: i64,
        at: NaiveDateTime,
    ) -> DomainResult<Upsert> {
        let name = ProductName::parse(name)?;
        let quantity = Quantity::try_from(quantity)?;
        Ok(self.upsert(name, quantity, at))
    }

    pub(crate) fn upsert(&mut self, name: ProductName, quantity: Quantity, at: NaiveDateTime) -> Upsert {
        if let Some(product) = self.book.get_mut(&name) {
            let previous = product.quantity();
            product.replace(quantity, at);
            self.log.record(CommandRecord::Replace {
                name,
                old_quantity: previous,
                new_quantity: quantity,
            });
            Upsert::Replaced { previous }
        } else {
            self.book.insert(Product::create(name.clone(), quantity, at));
            self.log.record(CommandRecord::AddProduct { name, quantity });
            Upsert::Created
        }
    }

    /// Receive `delta` units of an existing product. Returns the new level.
    pub fn add_stock(&mut self, name: &str, delta: i64, at: NaiveDateTime) -> DomainResult<Quantity> {
        let name = ProductName::parse(name)?;
        let delta = movement(delta)?;
        let product = self.book.require_mut(&name)?;
        let previous_quantity = product.quantity();
        product.add(delta, at)?;
        let quantity = product.quantity();
        self.log.record(CommandRecord::AddStock {
            name,
            delta,
            previous_quantity,
        });
        Ok(quantity)
    }

    /// Sell `delta` units of an existing product. Returns the new level.
    pub fn sell_stock(&mut self, name: &str, delta: i64, at: NaiveDateTime) -> DomainResult<Quantity> {
        let name = ProductName::parse(name)?;
        let delta = movement(delta)?;
        let product = self.book.require_mut(&name)?;
        let previous_quantity = product.quantity();
        product.try_sell(delta, at)?;
        let quantity = product.quantity();
        self.log.record(CommandRecord::SellStock {
            name,
            delta,
            previous_quantity,
        });
        Ok(quantity)
    }

    /// Remove a product, keeping a full snapshot on the undo stack.
    pub fn remove(&mut self, name: &str) -> DomainResult<ProductSnapshot> {
        let name = ProductName::parse(name)?;
        let product = self
            .book
            .remove(&name)
            .ok_or_else(|| DomainError::not_found(name.as_str()))?;
        let snapshot = product.snapshot();
        self.log.record(CommandRecord::RemoveProduct {
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    pub fn undo(&mut self, at: NaiveDateTime) -> DomainResult<CommandRecord> {
        self.log.undo(&mut self.book, at)
    }

    pub fn redo(&mut self, at: NaiveDateTime) -> DomainResult<CommandRecord> {
        self.log.redo(&mut self.book, at)
    }

    /// Drop every product and all history. Not undoable.
    pub fn clear(&mut self) {
        self.book.clear();
        self.log.clear();
    }

    /// Swap in a freshly loaded book. History recorded against the old book is
    /// dropped with it.
    pub fn replace_book(&mut self, book: StockBook) {
        self.book = book;
        self.log.clear();
    }
}

/// Stock movements must be positive whole units.
fn movement(delta: i64) -> DomainResult<Quantity> {
    let delta = Quantity::try_from(delta)?;
    if delta == Quantity::ZERO {
        return Err(DomainError::invalid_quantity("a stock movement cannot be zero"));
    }
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use warehouse_events::TransactionKind;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 4)
            .unwrap()
            .and_hms_opt(16, 45, 0)
            .unwrap()
    }

    fn name(raw: &str) -> ProductName {
        ProductName::parse(raw).unwrap()
    }

    fn quantity_of(inventory: &Inventory, raw: &str) -> Option<u64> {
        inventory.book().get(&name(raw)).map(|p| p.quantity().get())
    }

    #[test]
    fn widget_walkthrough() {
        let mut inv = Inventory::new();

        assert_eq!(inv.add_or_replace("Widget", 10, at()).unwrap(), Upsert::Created);
        assert_eq!(quantity_of(&inv, "widget"), Some(10));
        assert_eq!(inv.log().undo_depth(), 1);

        assert_eq!(inv.add_stock("widget", 5, at()).unwrap(), Quantity::new(15));

        let err = inv.sell_stock("WIDGET", 20, at()).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("widget", 20, 15));
        assert_eq!(quantity_of(&inv, "widget"), Some(15));
        assert_eq!(inv.log().undo_depth(), 2);

        inv.undo(at()).unwrap();
        assert_eq!(quantity_of(&inv, "widget"), Some(10));

        inv.undo(at()).unwrap();
        assert_eq!(quantity_of(&inv, "widget"), None);

        inv.redo(at()).unwrap();
        assert_eq!(quantity_of(&inv, "widget"), Some(10));
    }

    #[test]
    fn replace_reports_previous_level() {
        let mut inv = Inventory::new();
        inv.add_or_replace("bolt", 3, at()).unwrap();
        assert_eq!(
            inv.add_or_replace("BOLT", 8, at()).unwrap(),
            Upsert::Replaced {
                previous: Quantity::new(3)
            }
        );

        inv.undo(at()).unwrap();
        let bolt = inv.book().get(&name("bolt")).unwrap();
        assert_eq!(bolt.quantity(), Quantity::new(3));
        assert_eq!(bolt.history().last().unwrap().action, TransactionKind::InitialReplace);
        assert!(bolt.is_consistent());
    }

    #[test]
    fn remove_then_undo_restores_every_event() {
        let mut inv = Inventory::new();
        inv.add_or_replace("widget", 10, at()).unwrap();
        inv.add_stock("widget", 2, at()).unwrap();
        inv.sell_stock("widget", 4, at()).unwrap();
        let before = inv.book().product_snapshot(&name("widget")).unwrap();
        assert_eq!(before.transactions.len(), 3);

        let removed = inv.remove("Widget").unwrap();
        assert_eq!(removed, before);
        assert!(inv.book().is_empty());

        inv.undo(at()).unwrap();
        assert_eq!(inv.book().product_snapshot(&name("widget")).unwrap(), before);
    }

    #[test]
    fn rejections_push_nothing() {
        let mut inv = Inventory::new();
        inv.add_or_replace("widget", 1, at()).unwrap();
        let before = inv.clone();

        assert!(matches!(inv.add_stock("ghost", 1, at()), Err(DomainError::NotFound(_))));
        assert!(matches!(inv.sell_stock("ghost", 1, at()), Err(DomainError::NotFound(_))));
        assert!(matches!(inv.remove("ghost"), Err(DomainError::NotFound(_))));
        assert!(matches!(inv.add_stock("widget", -1, at()), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(inv.add_stock("widget", 0, at()), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(inv.add_or_replace("widget", -3, at()), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(inv.add_or_replace("  ", 3, at()), Err(DomainError::InvalidName(_))));

        assert_eq!(inv, before);
    }

    #[test]
    fn new_command_after_undo_clears_redo() {
        let mut inv = Inventory::new();
        inv.add_or_replace("widget", 1, at()).unwrap();
        inv.add_stock("widget", 1, at()).unwrap();
        inv.undo(at()).unwrap();
        inv.redo(at()).unwrap();
        inv.add_stock("widget", 1, at()).unwrap();

        assert_eq!(inv.redo(at()).unwrap_err(), DomainError::NothingToRedo);
    }

    #[test]
    fn clear_and_replace_book_drop_history() {
        let mut inv = Inventory::new();
        inv.add_or_replace("widget", 1, at()).unwrap();
        inv.replace_book(StockBook::new());
        assert_eq!(inv.log().undo_depth(), 0);

        inv.add_or_replace("widget", 1, at()).unwrap();
        inv.clear();
        assert!(inv.book().is_empty());
        assert_eq!(inv.undo(at()).unwrap_err(), DomainError::NothingToUndo);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Upsert(u8, i64),
        Add(u8, i64),
        Sell(u8, i64),
        Remove(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..3, 0i64..50).prop_map(|(n, q)| Op::Upsert(n, q)),
            (0u8..3, 1i64..50).prop_map(|(n, q)| Op::Add(n, q)),
            (0u8..3, 1i64..50).prop_map(|(n, q)| Op::Sell(n, q)),
            (0u8..3).prop_map(Op::Remove),
        ]
    }

    fn apply(inv: &mut Inventory, op: &Op) -> bool {
        let label = |n: &u8| format!("item-{n}");
        match op {
            Op::Upsert(n, q) => inv.add_or_replace(&label(n), *q, at()).is_ok(),
            Op::Add(n, q) => inv.add_stock(&label(n), *q, at()).is_ok(),
            Op::Sell(n, q) => inv.sell_stock(&label(n), *q, at()).is_ok(),
            Op::Remove(n) => inv.remove(&label(n)).is_ok(),
        }
    }

    fn levels(inv: &Inventory) -> Vec<(String, u64)> {
        inv.book()
            .sorted()
            .into_iter()
            .map(|p| (p.name().to_string(), p.quantity().get()))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 300,
            ..ProptestConfig::default()
        })]

        /// Property: undo restores the pre-operation levels, redo the post-operation ones.
        #[test]
        fn undo_redo_round_trip(
            setup in prop::collection::vec(op_strategy(), 0..20),
            op in op_strategy()
        ) {
            let mut inv = Inventory::new();
            for step in &setup {
                apply(&mut inv, step);
            }

            let before = levels(&inv);
            if apply(&mut inv, &op) {
                let after = levels(&inv);
                inv.undo(at()).unwrap();
                prop_assert_eq!(levels(&inv), before);
                inv.redo(at()).unwrap();
                prop_assert_eq!(levels(&inv), after);
            } else {
                prop_assert_eq!(levels(&inv), before);
            }
            prop_assert!(inv.book().inconsistent().is_empty());
        }

        /// Property: unwinding all history walks back to an empty store.
        #[test]
        fn full_unwind_empties_the_store(ops in prop::collection::vec(op_strategy(), 0..30)) {
            let mut inv = Inventory::new();
            for step in &ops {
                apply(&mut inv, step);
            }
            while inv.log().undo_depth() > 0 {
                inv.undo(at()).unwrap();
            }
            prop_assert!(inv.book().is_empty());
        }
    }
}
