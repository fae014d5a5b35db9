use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use warehouse_inventory::StoreSnapshot;

use super::r#trait::{SnapshotStore, SnapshotStoreError};

/// Snapshot store backed by a single JSON document on disk.
///
/// Document shape:
///
/// ```json
/// { "products": [ { "name": "widget", "quantity": 12, "transactions": [ ... ] } ] }
/// ```
///
/// Saves go through a sibling `<file>.tmp` that is renamed over the target, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    /// Toggle indented output. Compact output is smaller; indented is diffable.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut raw: OsString = self.path.as_os_str().to_owned();
        raw.push(".tmp");
        PathBuf::from(raw)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn encode(&self, snapshot: &StoreSnapshot) -> Result<Vec<u8>, SnapshotStoreError> {
        let mut body = if self.pretty {
            serde_json::to_vec_pretty(snapshot)
        } else {
            serde_json::to_vec(snapshot)
        }
        .map_err(|e| SnapshotStoreError::Serialize(e.to_string()))?;
        body.push(b'\n');
        Ok(body)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoreSnapshot>, SnapshotStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SnapshotStoreError::io(self.location(), err)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SnapshotStoreError::malformed(self.location(), e))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), SnapshotStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| SnapshotStoreError::io(parent.display().to_string(), e))?;
        }

        let body = self.encode(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(|e| SnapshotStoreError::io(tmp.display().to_string(), e))?;

        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(SnapshotStoreError::io(self.location(), err));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use warehouse_core::{ProductName, Quantity};
    use warehouse_inventory::Inventory;

    fn sample() -> StoreSnapshot {
        let at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        let mut inv = Inventory::new();
        inv.add_or_replace("Widget", 10, at).unwrap();
        inv.sell_stock("widget", 3, at).unwrap();
        inv.snapshot()
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/dir/stock.json"));

        let snapshot = sample();
        store.save(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), Some(snapshot));
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn writes_the_documented_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("stock.json")).with_pretty(false);
        store.save(&sample()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let widget = &value["products"][0];
        assert_eq!(widget["name"], "widget");
        assert_eq!(widget["quantity"], 7);
        assert_eq!(widget["transactions"][0]["action"], "initial");
        assert_eq!(widget["transactions"][1]["action"], "sell");
        assert_eq!(widget["transactions"][1]["datetime"], "2024-03-04T05:06:07");
        assert!(!raw.contains("\n  "));
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.json");
        fs::write(&path, "{ not json").unwrap();

        match JsonFileStore::new(&path).load() {
            Err(SnapshotStoreError::Malformed { location, .. }) => {
                assert!(location.ends_with("stock.json"))
            }
            other => panic!("Expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn reads_documents_written_by_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.json");
        fs::write(
            &path,
            r#"{"products":[{"name":"Bolt","quantity":4,"transactions":[
                {"action":"initial","quantity":5,"datetime":"2023-12-01T08:00:00.123456"},
                {"action":"sell","quantity":1,"datetime":"2023-12-01T09:00:00"}]}]}"#,
        )
        .unwrap();

        let snapshot = JsonFileStore::new(&path).load().unwrap().unwrap();
        let bolt = &snapshot.products[0];
        assert_eq!(bolt.name, ProductName::parse("bolt").unwrap());
        assert_eq!(bolt.quantity, Quantity::new(4));
        assert_eq!(bolt.transactions.len(), 2);
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is an existing directory, so the rename cannot land.
        let target = dir.path().join("taken");
        fs::create_dir_all(target.join("inner")).unwrap();

        let store = JsonFileStore::new(&target);
        match store.save(&sample()) {
            Err(SnapshotStoreError::Io { .. }) => {}
            other => panic!("Expected Io, got {other:?}"),
        }
        assert!(!store.tmp_path().exists());
    }
}
