//! Inventory engine (application-level orchestration).
//!
//! `InventoryService` composes the pure [`Inventory`] aggregate with a
//! [`SnapshotStore`] and a [`Notifier`]. Every mutating call runs the same
//! pipeline:
//!
//! ```text
//! Call
//!   ↓
//! 1. Take the store lock
//!   ↓
//! 2. Validate + mutate the aggregate (pure; pushes one undo record per step)
//!   ↓
//! 3. Persist the full snapshot (failures are logged, the change stays in memory)
//!   ↓
//! 4. Release the lock
//!   ↓
//! 5. Notify (best effort, copied values only)
//! ```
//!
//! ## Guarantees
//!
//! - **Linearizable**: steps 2 and 3 of two calls never interleave
//! - **All-or-nothing**: a rejected call leaves products and history untouched
//! - **Best-effort durability**: persistence failures never fail the call
//!
//! This module contains no IO itself; it composes the store and notifier traits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use tracing::{debug, error, info, warn};

use warehouse_core::{DomainError, DomainResult, ProductName, Quantity};
use warehouse_events::{NoopNotifier, Notice, Notifier, Transaction};
use warehouse_inventory::{
    CommandRecord, ImportRow, ImportSummary, Inventory, ProductSnapshot, StockBook, StoreSnapshot,
    Upsert,
};

use crate::config::InventoryConfig;
use crate::report::LedgerReport;
use crate::snapshot_store::{JsonFileStore, SnapshotStore, SnapshotStoreError};

/// Thread-safe inventory engine.
///
/// ## Construction
///
/// ```no_run
/// use warehouse_infra::{InventoryConfig, InventoryService};
///
/// let service = InventoryService::from_config(&InventoryConfig::default());
/// service.add_or_replace("Widget", 10).unwrap();
/// assert_eq!(service.undo_depth(), 1);
/// ```
///
/// Construction never fails: a missing or unreadable snapshot is logged and
/// the service starts empty.
#[derive(Debug)]
pub struct InventoryService<S, N = NoopNotifier> {
    state: Mutex<Inventory>,
    store: S,
    notifier: N,
    clock: fn() -> NaiveDateTime,
    persist_failures: AtomicU64,
}

impl InventoryService<JsonFileStore> {
    /// Open the JSON file named by `config`.
    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::open(config.store(), config.history_limit)
    }
}

impl<S: SnapshotStore> InventoryService<S> {
    /// Load whatever `store` holds and start with empty undo/redo history.
    pub fn open(store: S, history_limit: Option<usize>) -> Self {
        let snapshot = load_initial(&store);
        let inventory = Inventory::from_snapshot(snapshot, history_limit);

        for name in inventory.book().inconsistent() {
            warn!(product = %name, "transaction log does not fold to the stored quantity");
        }

        Self {
            state: Mutex::new(inventory),
            store,
            notifier: NoopNotifier,
            clock: Transaction::now,
            persist_failures: AtomicU64::new(0),
        }
    }
}

impl<S, N> InventoryService<S, N>
where
    S: SnapshotStore,
    N: Notifier,
{
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> InventoryService<S, M> {
        let Self {
            state,
            store,
            clock,
            persist_failures,
            ..
        } = self;
        InventoryService {
            state,
            store,
            notifier,
            clock,
            persist_failures,
        }
    }

    /// Override the timestamp source used for new log entries.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create `name` at `quantity`, or overwrite the level of an existing product.
    pub fn add_or_replace(&self, name: &str, quantity: i64) -> DomainResult<Upsert> {
        let product = ProductName::parse(name)?;
        let level = Quantity::try_from(quantity)?;

        let outcome = self.mutate("product.add_or_replace", |inv, at| {
            inv.add_or_replace(product.as_str(), quantity, at)
        })?;

        self.notifier.notify(match outcome {
            Upsert::Created => Notice::ProductCreated {
                name: product,
                quantity: level,
            },
            Upsert::Replaced { previous } => Notice::ProductReplaced {
                name: product,
                previous,
                quantity: level,
            },
        });
        Ok(outcome)
    }

    /// Receive stock. Returns the new level.
    pub fn add_stock(&self, name: &str, delta: i64) -> DomainResult<Quantity> {
        let product = ProductName::parse(name)?;
        let moved = Quantity::try_from(delta)?;

        let quantity = self.mutate("stock.add", |inv, at| inv.add_stock(product.as_str(), delta, at))?;

        self.notifier.notify(Notice::StockAdded {
            name: product,
            delta: moved,
            quantity,
        });
        Ok(quantity)
    }

    /// Sell stock. Returns the new level; `InsufficientStock` leaves everything as it was.
    pub fn sell_stock(&self, name: &str, delta: i64) -> DomainResult<Quantity> {
        let product = ProductName::parse(name)?;
        let moved = Quantity::try_from(delta)?;

        let quantity = self.mutate("stock.sell", |inv, at| inv.sell_stock(product.as_str(), delta, at))?;

        self.notifier.notify(Notice::StockSold {
            name: product,
            delta: moved,
            quantity,
        });
        Ok(quantity)
    }

    /// Remove a product. Returns the snapshot kept for undo.
    pub fn remove(&self, name: &str) -> DomainResult<ProductSnapshot> {
        let snapshot = self.mutate("product.remove", |inv, _| inv.remove(name))?;

        self.notifier.notify(Notice::ProductRemoved {
            name: snapshot.name.clone(),
        });
        Ok(snapshot)
    }

    pub fn undo(&self) -> DomainResult<CommandRecord> {
        let record = self.mutate("history.undo", |inv, at| {
            let record = inv.undo(at)?;
            info!(
                command = record.kind(),
                product = %record.product(),
                undo_depth = inv.log().undo_depth(),
                redo_depth = inv.log().redo_depth(),
                "undone"
            );
            Ok(record)
        })?;

        self.notifier.notify(Notice::Undone {
            command: record.kind(),
        });
        Ok(record)
    }

    pub fn redo(&self) -> DomainResult<CommandRecord> {
        let record = self.mutate("history.redo", |inv, at| {
            let record = inv.redo(at)?;
            info!(
                command = record.kind(),
                product = %record.product(),
                undo_depth = inv.log().undo_depth(),
                redo_depth = inv.log().redo_depth(),
                "redone"
            );
            Ok(record)
        })?;

        self.notifier.notify(Notice::Redone {
            command: record.kind(),
        });
        Ok(record)
    }

    /// Add-or-replace every row; see [`Inventory::import`]. Persists once.
    pub fn import<I>(&self, rows: I) -> DomainResult<ImportSummary>
    where
        I: IntoIterator,
        I::Item: Into<ImportRow>,
    {
        let summary = self.mutate("import", |inv, at| inv.import(rows, at))?;

        info!(
            created = summary.created,
            replaced = summary.replaced,
            "import completed"
        );
        self.notifier.notify(Notice::Imported {
            created: summary.created,
            replaced: summary.replaced,
        });
        Ok(summary)
    }

    /// Drop every product and both history stacks. Not undoable.
    pub fn clear_all(&self) {
        {
            let mut inventory = self.lock();
            let dropped = inventory.book().len();
            inventory.clear();
            self.persist(&inventory, "store.clear");
            info!(products = dropped, "inventory cleared");
        }
        self.notifier.notify(Notice::Cleared);
    }

    /// Re-read the store and replace every product (no merge).
    ///
    /// Returns the number of products loaded, or `None` if nothing has been
    /// saved yet. Undo/redo history is cleared on success; on `None` or error
    /// the in-memory state is untouched.
    pub fn reload(&self) -> Result<Option<usize>, SnapshotStoreError> {
        let products = {
            let mut inventory = self.lock();
            let snapshot = match self.store.load() {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => {
                    warn!(store = %self.store.describe(), "nothing to reload");
                    return Ok(None);
                }
                Err(err) => {
                    error!(store = %self.store.describe(), error = %err, "reload failed; keeping current inventory");
                    return Err(err);
                }
            };
            inventory.replace_book(StockBook::from_snapshot(snapshot));
            inventory.book().len()
        };

        info!(products, "inventory reloaded");
        self.notifier.notify(Notice::Reloaded { products });
        Ok(Some(products))
    }

    /// Persist now, handing any store error to the caller.
    pub fn save(&self) -> Result<(), SnapshotStoreError> {
        let inventory = self.lock();
        self.store.save(&inventory.snapshot())
    }

    pub fn get(&self, name: &str) -> Option<ProductSnapshot> {
        let name = ProductName::parse(name).ok()?;
        self.lock().book().product_snapshot(&name)
    }

    pub fn quantity(&self, name: &str) -> Option<Quantity> {
        let name = ProductName::parse(name).ok()?;
        self.lock().book().get(&name).map(|product| product.quantity())
    }

    /// Every product, in name order.
    pub fn list(&self) -> Vec<ProductSnapshot> {
        self.snapshot().products
    }

    /// Products whose name contains `fragment` (case-insensitive), in name order.
    pub fn search(&self, fragment: &str) -> Vec<ProductSnapshot> {
        self.lock()
            .book()
            .search(fragment)
            .into_iter()
            .map(|product| product.snapshot())
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().snapshot()
    }

    pub fn report(&self) -> LedgerReport {
        LedgerReport::from_book(self.lock().book())
    }

    pub fn len(&self) -> usize {
        self.lock().book().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().book().is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.lock().log().undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.lock().log().redo_depth()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_depth() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_depth() > 0
    }

    /// Saves that failed since construction.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    // Every mutation validates before it writes, so the state behind a
    // poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inventory> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T, F>(&self, command: &'static str, op: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Inventory, NaiveDateTime) -> DomainResult<T>,
    {
        let mut inventory = self.lock();
        let at = (self.clock)();

        match op(&mut inventory, at) {
            Ok(value) => {
                debug!(command, undo_depth = inventory.log().undo_depth(), "command applied");
                self.persist(&inventory, command);
                Ok(value)
            }
            Err(err @ DomainError::ReplayConflict(_)) => {
                error!(command, error = %err, "history record could not be replayed; dropped");
                Err(err)
            }
            Err(err) => {
                debug!(command, error = %err, "command rejected");
                Err(err)
            }
        }
    }

    fn persist(&self, inventory: &Inventory, command: &'static str) {
        if let Err(err) = self.store.save(&inventory.snapshot()) {
            self.persist_failures.fetch_add(1, Ordering::Relaxed);
            error!(
                command,
                store = %self.store.describe(),
                error = %err,
                "failed to persist inventory; change kept in memory"
            );
        }
    }
}

fn load_initial<S: SnapshotStore>(store: &S) -> StoreSnapshot {
    match store.load() {
        Ok(Some(snapshot)) => {
            info!(store = %store.describe(), products = snapshot.len(), "inventory loaded");
            snapshot
        }
        Ok(None) => {
            warn!(store = %store.describe(), "no saved inventory; starting empty");
            StoreSnapshot::default()
        }
        Err(err) => {
            error!(store = %store.describe(), error = %err, "could not load inventory; starting empty");
            StoreSnapshot::default()
        }
    }
}
