//! Persistence Port
//!
//! Progress is read and written through an injected [`KeyValueStore`],
//! scoped per logical store. A missing key is `Ok(None)`; callers seed
//! defaults. Values that no longer deserialize are logged and treated as
//! missing.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Logical store a key lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The progress record.
    Progress,
    /// Working attempts, keyed by puzzle kind and seed.
    Puzzles,
    /// Hint counters and session start timestamps.
    Meta,
}

impl Scope {
    /// All scopes.
    pub const ALL: [Scope; 3] = [Scope::Progress, Scope::Puzzles, Scope::Meta];

    /// Name used for file backends.
    pub fn name(self) -> &'static str {
        match self {
            Scope::Progress => "progress",
            Scope::Puzzles => "puzzles",
            Scope::Meta => "meta",
        }
    }
}

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("store i/o error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value persistence, one namespace per [`Scope`].
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write (overwrite) a value.
    fn put(&mut self, scope: Scope, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Read and deserialize a value. Undecodable values count as missing.
pub fn load<T, S>(store: &S, scope: Scope, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(scope, key)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(scope = scope.name(), key, error = %e, "Discarding unreadable stored value");
            Ok(None)
        }
    }
}

/// Serialize and write a value.
pub fn save<T, S>(store: &mut S, scope: Scope, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.put(scope, key, value)
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store, used by tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<(Scope, String), Value>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(&(scope, key.to_string())).cloned())
    }

    fn put(&mut self, scope: Scope, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert((scope, key.to_string()), value);
        Ok(())
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// One pretty-printed JSON object file per scope under a directory.
///
/// Writes go to a temporary file that is renamed over the old one, so a
/// scope's file is always a complete document.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    /// Backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, scope: Scope) -> PathBuf {
        self.dir.join(format!("{}.json", scope.name()))
    }

    fn read_scope(&self, scope: Scope) -> Result<Map<String, Value>, StoreError> {
        let path = self.path(scope);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => {
                warn!(path = %path.display(), found = ?other, "Store file is not an object, starting empty");
                Ok(Map::new())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                Ok(Map::new())
            }
        }
    }

    fn write_scope(&self, scope: Scope, map: &Map<String, Value>) -> Result<(), StoreError> {
        let path = self.path(scope);
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(map)?;
        fs::write(&tmp, text).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), keys = map.len(), "Store file written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_scope(scope)?.remove(key))
    }

    fn put(&mut self, scope: Scope, key: &str, value: Value) -> Result<(), StoreError> {
        let mut map = self.read_scope(scope)?;
        map.insert(key.to_string(), value);
        self.write_scope(scope, &map)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::hints::HintState;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("logic-looper-{}-{}-{}", tag, std::process::id(), nanos))
    }

    #[test]
    fn test_memory_store_scopes_are_separate() {
        let mut store = MemoryStore::new();
        store.put(Scope::Meta, "k", Value::from(1)).unwrap();
        assert_eq!(store.get(Scope::Meta, "k").unwrap(), Some(Value::from(1)));
        assert_eq!(store.get(Scope::Puzzles, "k").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_typed_load_and_save() {
        let mut store = MemoryStore::new();
        let hints = HintState { remaining: 1, used: 2 };
        save(&mut store, Scope::Meta, "hints-2026-03-01", &hints).unwrap();
        let loaded: Option<HintState> = load(&store, Scope::Meta, "hints-2026-03-01").unwrap();
        assert_eq!(loaded, Some(hints));
    }

    #[test]
    fn test_undecodable_value_is_a_miss() {
        let mut store = MemoryStore::new();
        store.put(Scope::Meta, "hints-x", Value::from("garbage")).unwrap();
        let loaded: Option<HintState> = load(&store, Scope::Meta, "hints-x").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = scratch_dir("persist");
        {
            let mut store = JsonFileStore::open(&dir).unwrap();
            store.put(Scope::Progress, "logic-progress", serde_json::json!({"streak": 4})).unwrap();
            store.put(Scope::Meta, "start-2026-03-01", Value::from(1_772_000_000_000i64)).unwrap();
        }
        let store = JsonFileStore::open(&dir).unwrap();
        let value = store.get(Scope::Progress, "logic-progress").unwrap().unwrap();
        assert_eq!(value["streak"], 4);
        assert!(store.get(Scope::Meta, "start-2026-03-01").unwrap().is_some());
        assert!(store.get(Scope::Puzzles, "anything").unwrap().is_none());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = scratch_dir("corrupt");
        let mut store = JsonFileStore::open(&dir).unwrap();
        fs::write(dir.join("meta.json"), "{ not json").unwrap();
        assert!(store.get(Scope::Meta, "k").unwrap().is_none());
        store.put(Scope::Meta, "k", Value::Bool(true)).unwrap();
        assert_eq!(store.get(Scope::Meta, "k").unwrap(), Some(Value::Bool(true)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_recovers_from_non_object_file() {
        let dir = scratch_dir("non-object");
        let mut store = JsonFileStore::open(&dir).unwrap();
        fs::write(dir.join("meta.json"), "[1, 2, 3]").unwrap();
        assert!(store.get(Scope::Meta, "k").unwrap().is_none());
        store.put(Scope::Meta, "k", Value::from(7)).unwrap();
        assert_eq!(store.get(Scope::Meta, "k").unwrap(), Some(Value::from(7)));
        fs::remove_dir_all(&dir).unwrap();
    }
}
