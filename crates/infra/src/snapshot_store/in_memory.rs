use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use warehouse_inventory::StoreSnapshot;

use super::r#trait::{SnapshotStore, SnapshotStoreError};

/// In-memory snapshot store.
///
/// Intended for tests/dev. `set_fail_saves(true)` makes every save fail, which
/// is how tests exercise the degraded-persistence path.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Option<StoreSnapshot>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already "on disk".
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last successfully saved snapshot.
    pub fn stored(&self) -> Option<StoreSnapshot> {
        self.snapshot.read().ok().and_then(|guard| guard.clone())
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<StoreSnapshot>, SnapshotStoreError> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| SnapshotStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), SnapshotStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SnapshotStoreError::Unavailable("saves disabled".to_string()));
        }
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| SnapshotStoreError::Unavailable("lock poisoned".to_string()))?;
        *guard = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
