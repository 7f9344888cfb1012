//! Durable key-value storage underneath the tracker.
//!
//! Records are whole JSON documents, replaced on every write. Two backends
//! ship with the engine: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`] which keeps one `<key>.json` file per record.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use crate::{EngineError, ResultEngine};

/// A persistent string-to-string map.
pub trait KeyValueStore {
    /// Reads a record; `Ok(None)` when it was never written.
    fn get(&self, key: &str) -> ResultEngine<Option<String>>;

    /// Replaces a record.
    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()>;
}

/// In-memory store. Counts writes per key so callers can observe them.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    writes: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record without counting it as a write.
    pub fn with_record(mut self, key: &str, value: &str) -> Self {
        self.records.insert(key.to_string(), value.to_string());
        self
    }

    /// How many times `key` was written through [`KeyValueStore::set`].
    pub fn writes(&self, key: &str) -> usize {
        self.writes.get(key).copied().unwrap_or(0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        self.records.insert(key.to_string(), value.to_string());
        *self.writes.entry(key.to_string()).or_default() += 1;
        Ok(())
    }
}

/// File-backed store: each key lives in `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> ResultEngine<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(EngineError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn scratch_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(Uuid::new_v4().to_string())
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new().with_record("seed", "1");
        assert_eq!(store.get("seed").unwrap().as_deref(), Some("1"));
        assert_eq!(store.writes("seed"), 0);

        store.set("seed", "2").unwrap();
        store.set("seed", "3").unwrap();
        assert_eq!(store.get("seed").unwrap().as_deref(), Some("3"));
        assert_eq!(store.writes("seed"), 2);
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_creates_dir() {
        let dir = scratch_dir();
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("appState").unwrap(), None);

        store.set("appState", "{\"title\":\"Trip\"}").unwrap();
        assert!(dir.join("appState.json").exists());
        assert!(!dir.join("appState.json.tmp").exists());

        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.get("appState").unwrap().as_deref(),
            Some("{\"title\":\"Trip\"}")
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let mut store = FileStore::new(scratch_dir());
        assert_eq!(
            store.set("../escape", "x"),
            Err(EngineError::InvalidKey("../escape".to_string()))
        );
        assert!(store.get("").is_err());
    }
}
