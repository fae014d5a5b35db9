//! Running-stock reduction over a transaction log.
//!
//! The log is the source of truth; a product's `quantity` is a cache of
//! [`RunningStock::fold`] over its history. Rules, applied left to right from
//! an implicit zero:
//!
//! | action | effect |
//! |---|---|
//! | `initial`, `initial_replace` | stock = value |
//! | `add` | stock += value |
//! | `sell` | stock -= value |
//! | `undo_add` | stock -= value |
//! | `undo_sell` | stock += value |
//!
//! Every reporting consumer reads these values from here instead of folding
//! on its own.

use crate::event::{Event, Transaction, TransactionKind};

/// A projection builds a read value from an append-only event stream.
///
/// Projections are deterministic: replaying the same events from the same
/// starting point always yields the same state.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the projection.
    fn apply(&mut self, event: &Self::Ev);
}

/// Stock level after each transaction of one product.
///
/// Kept signed so that hand-edited or legacy logs that dip below zero still
/// fold to a value instead of failing.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RunningStock {
    current: i64,
}

impl RunningStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    /// Fold a whole log into the final stock level.
    pub fn fold<'a>(history: impl IntoIterator<Item = &'a Transaction>) -> i64 {
        let mut running = Self::new();
        for tx in history {
            running.apply(tx);
        }
        running.current
    }

    /// Stock level after every entry, in log order.
    pub fn column<'a>(history: impl IntoIterator<Item = &'a Transaction>) -> Vec<i64> {
        let mut running = Self::new();
        history
            .into_iter()
            .map(|tx| {
                running.apply(tx);
                running.current
            })
            .collect()
    }
}

impl Projection for RunningStock {
    type Ev = Transaction;

    fn apply(&mut self, event: &Transaction) {
        let value = event.quantity.as_i64();
        self.current = match event.action {
            TransactionKind::Initial | TransactionKind::InitialReplace => value,
            TransactionKind::Add | TransactionKind::UndoSell => self.current.saturating_add(value),
            TransactionKind::Sell | TransactionKind::UndoAdd => self.current.saturating_sub(value),
        };
    }
}
