//! Inventory domain module.
//!
//! This crate contains business rules for stock keeping, implemented purely as
//! deterministic domain logic (no IO, no clocks, no locking). Callers pass the
//! timestamp to stamp on new transactions.
//!
//! - [`Product`]: one stock entity and its append-only transaction log
//! - [`StockBook`]: the entity store, keyed by normalized name
//! - [`CommandRecord`] / [`CommandLog`]: invertible records and the undo/redo stacks
//! - [`Inventory`]: the aggregate tying the three together

pub mod book;
pub mod command;
pub mod history;
pub mod import;
pub mod inventory;
pub mod product;
pub mod snapshot;

pub use book::StockBook;
pub use command::CommandRecord;
pub use history::CommandLog;
pub use import::{ImportRow, ImportSummary};
pub use inventory::{Inventory, Upsert};
pub use product::Product;
pub use snapshot::{ProductSnapshot, StoreSnapshot};
