//! Infrastructure layer: snapshot persistence, configuration, and the
//! lock-guarded inventory service that ties the domain to them.

pub mod config;
pub mod report;
pub mod service;
pub mod snapshot_store;


pub use config::InventoryConfig;
pub use report::{LedgerReport, ProductSummary, ReportRow};
pub use service::InventoryService;
pub use snapshot_store::{InMemorySnapshotStore, JsonFileStore, SnapshotStore, SnapshotStoreError};
