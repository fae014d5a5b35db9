use chrono::NaiveDateTime;

use warehouse_core::{DomainError, DomainResult, Entity, ProductName, Quantity};
use warehouse_events::{RunningStock, Transaction, TransactionKind};

use crate::snapshot::ProductSnapshot;

/// A stock entity: a named quantity plus the log that explains it.
///
/// `quantity` is a cache of folding `history` (see [`RunningStock`]); every
/// mutator appends exactly one transaction and updates the cache in the same
/// step, and failed mutations touch neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: ProductName,
    quantity: Quantity,
    history: Vec<Transaction>,
}

impl Product {
    /// Create a product with an `initial` entry for its opening stock.
    pub fn create(name: ProductName, quantity: Quantity, at: NaiveDateTime) -> Self {
        Self {
            name,
            quantity,
            history: vec![Transaction::new(TransactionKind::Initial, quantity, at)],
        }
    }

    /// Rebuild a product verbatim from a snapshot (no entry is appended).
    pub fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        Self {
            name: snapshot.name,
            quantity: snapshot.quantity,
            history: snapshot.transactions,
        }
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Receive `delta` units.
    pub fn add(&mut self, delta: Quantity, at: NaiveDateTime) -> DomainResult<()> {
        let next = self.quantity.checked_add(delta).ok_or_else(|| {
            DomainError::invalid_quantity(format!(
                "adding {delta} to {} overflows the stock counter",
                self.quantity
            ))
        })?;
        self.set(next, TransactionKind::Add, delta, at);
        Ok(())
    }

    /// Sell `delta` units if that many are on hand.
    ///
    /// Returns `false` and leaves the product untouched otherwise.
    pub fn sell(&mut self, delta: Quantity, at: NaiveDateTime) -> bool {
        self.try_sell(delta, at).is_ok()
    }

    /// Like [`Product::sell`], reporting the shortfall.
    pub fn try_sell(&mut self, delta: Quantity, at: NaiveDateTime) -> DomainResult<()> {
        let next = self.quantity.checked_sub(delta).ok_or_else(|| {
            DomainError::insufficient_stock(self.name.as_str(), delta.get(), self.quantity.get())
        })?;
        self.set(next, TransactionKind::Sell, delta, at);
        Ok(())
    }

    /// Overwrite the stock level, recording an `initial_replace` entry.
    pub fn replace(&mut self, quantity: Quantity, at: NaiveDateTime) {
        self.set(quantity, TransactionKind::InitialReplace, quantity, at);
    }

    /// Take back a receipt of `delta` units, returning to `previous`.
    ///
    /// Callers must have checked `quantity == previous + delta`.
    pub(crate) fn revert_add(&mut self, previous: Quantity, delta: Quantity, at: NaiveDateTime) {
        self.set(previous, TransactionKind::UndoAdd, delta, at);
    }

    /// Take back a sale of `delta` units, returning to `previous`.
    ///
    /// Callers must have checked `quantity + delta == previous`.
    pub(crate) fn revert_sell(&mut self, previous: Quantity, delta: Quantity, at: NaiveDateTime) {
        self.set(previous, TransactionKind::UndoSell, delta, at);
    }

    fn set(&mut self, next: Quantity, kind: TransactionKind, value: Quantity, at: NaiveDateTime) {
        self.history.push(Transaction::new(kind, value, at));
        self.quantity = next;
    }

    /// Each transaction paired with the stock level right after it.
    pub fn running_stock(&self) -> impl Iterator<Item = (&Transaction, i64)> + '_ {
        self.history
            .iter()
            .zip(RunningStock::column(&self.history))
    }

    /// Whether folding the log reproduces the cached quantity.
    pub fn is_consistent(&self) -> bool {
        RunningStock::fold(&self.history) == self.quantity.as_i64()
    }

    /// Full copy of the persistent state.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: self.name.clone(),
            quantity: self.quantity,
            transactions: self.history.clone(),
        }
    }
}

impl Entity for Product {
    type Id = ProductName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}
