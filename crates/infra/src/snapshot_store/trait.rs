use std::sync::Arc;

use thiserror::Error;

use warehouse_inventory::StoreSnapshot;

/// Errors raised by a [`SnapshotStore`].
///
/// These are **infrastructure errors** (storage, encoding) as opposed to domain
/// errors (validation, stock levels). The service logs them and keeps serving
/// from memory; only explicit `save`/`reload` calls hand them to the caller.
///
/// ## Error Categories
///
/// - **Io**: The backing medium could not be read or written
/// - **Malformed**: Stored data exists but is not a valid snapshot
/// - **Serialize**: The in-memory snapshot could not be encoded
/// - **Unavailable**: The store refused the operation (e.g. a poisoned lock)
#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("snapshot I/O failed for {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot in {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("snapshot serialization failed: {0}")]
    Serialize(String),

    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

impl SnapshotStoreError {
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            location: location.into(),
            source,
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Whole-store snapshot persistence.
///
/// ## Semantics
///
/// `load()`:
/// - Returns `Ok(None)` when nothing has been saved yet (first run)
/// - Returns `Err(Malformed)` when data exists but cannot be decoded
///
/// `save()`:
/// - Replaces the previous snapshot entirely
/// - Must be atomic: a reader sees either the old or the new snapshot, never a
///   partial write
///
/// Callers serialize access; implementations only need `Send + Sync` so the
/// service can be shared across threads.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<StoreSnapshot>, SnapshotStoreError>;

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), SnapshotStoreError>;

    /// Human-readable location for log lines (a path, "memory", ...).
    fn describe(&self) -> String;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Option<StoreSnapshot>, SnapshotStoreError> {
        (**self).load()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), SnapshotStoreError> {
        (**self).save(snapshot)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
