//! Whole-store snapshot persistence.
//!
//! The engine writes the full product set after every successful mutation and
//! reads it once at startup. Undo/redo history is never persisted.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemorySnapshotStore;
pub use json_file::JsonFileStore;
pub use r#trait::{SnapshotStore, SnapshotStoreError};
