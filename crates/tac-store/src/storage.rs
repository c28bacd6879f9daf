//! Key-value storage backends and the store's save hook.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StoreResult;
use crate::snapshot::Snapshot;

/// A string key-value blob store, such as browser local storage.
pub trait KeyValueStore {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> StoreResult<()>;
}

/// An in-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Borrow a value directly.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A key-value store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a directory store.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The backing directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

impl<K: KeyValueStore> KeyValueStore for Rc<RefCell<K>> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.borrow_mut().set(key, value)
    }
}

/// Receives a fresh snapshot after every store mutation.
pub trait SnapshotSink {
    /// Persist `snapshot`. Failures are the sink's to handle.
    fn persist(&mut self, snapshot: &Snapshot);
}

/// A sink writing snapshots to a key-value store, logging failed writes.
#[derive(Debug, Clone, Default)]
pub struct StorageSink<K> {
    store: K,
}

impl<K: KeyValueStore> StorageSink<K> {
    /// Wrap a key-value store.
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> K {
        self.store
    }
}

impl<K: KeyValueStore> SnapshotSink for StorageSink<K> {
    fn persist(&mut self, snapshot: &Snapshot) {
        if let Err(err) = snapshot.save(&mut self.store) {
            tracing::warn!(%err, "failed to persist snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{CUSTOM_DICE_KEY, POOLS_KEY, SIDEBAR_WIDTH_KEY};

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new().with("a", "1");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.set("a", "2".to_string()).unwrap();
        assert_eq!(store.value("a"), Some("2"));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn dir_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path().join("state")).unwrap();
        assert_eq!(store.get(POOLS_KEY).unwrap(), None);

        store.set(POOLS_KEY, "[]".to_string()).unwrap();
        assert!(store.root().join("tactician_pools.json").exists());
        assert_eq!(store.get(POOLS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn storage_sink_writes_all_keys() {
        let shared = Rc::new(RefCell::new(MemoryStore::new()));
        let mut sink = StorageSink::new(Rc::clone(&shared));
        sink.persist(&Snapshot {
            sidebar_width: Some(300),
            ..Snapshot::default()
        });

        let store = shared.borrow();
        assert_eq!(store.value(POOLS_KEY), Some("[]"));
        assert_eq!(store.value(CUSTOM_DICE_KEY), Some("[]"));
        assert_eq!(store.value(SIDEBAR_WIDTH_KEY), Some("300"));
    }

    #[test]
    fn dir_store_round_trips_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirStore::open(dir.path()).unwrap();
        let snapshot = Snapshot {
            sidebar_width: Some(512),
            ..Snapshot::default()
        };
        snapshot.save(&mut store).unwrap();
        assert_eq!(Snapshot::load(&store), snapshot);
    }
}
