//! File-backed store persisting every entry into one JSON file.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::cache::store::lock;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::{CacheError, Result};

/// Default location of the cache file.
pub const DEFAULT_FILE_PATH: &str = "./.vix/cache_http.json";

/// Configuration for [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStoreConfig {
    /// JSON file holding the whole key to entry map
    pub file_path: PathBuf,
    /// Pretty-print the JSON (easier to inspect, larger on disk)
    pub pretty_json: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            pretty_json: false,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    loaded: bool,
    map: HashMap<String, CacheEntry>,
}

// == File Store ==
/// Durable store backed by a single JSON file.
///
/// The file is read on first access, not at construction. Every mutation
/// rewrites the whole file while the store lock is held, so reads and writes
/// are strictly serialized. If a write fails the in-memory map keeps the
/// mutation and the error is returned; the next successful flush persists it.
#[derive(Debug)]
pub struct FileStore {
    config: FileStoreConfig,
    inner: Mutex<Inner>,
}

impl FileStore {
    pub fn new(config: FileStoreConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Store over `path` with compact JSON.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStoreConfig {
            file_path: path.into(),
            pretty_json: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.file_path
    }

    // == Load ==
    /// Populates the map from disk once.
    ///
    /// A missing file is an empty cache. An unreadable-as-JSON file (e.g. left
    /// truncated by a crash mid-write) is discarded with a warning. Any other
    /// read error is returned and loading is retried on the next call.
    fn load(&self, inner: &mut Inner) -> Result<()> {
        if inner.loaded {
            return Ok(());
        }

        let path = &self.config.file_path;
        inner.map = match fs::read(path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cache file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(CacheError::io(path, e)),
        };
        inner.loaded = true;

        info!(path = %path.display(), entries = inner.map.len(), "Cache file loaded");
        Ok(())
    }

    // == Flush ==
    /// Rewrites the cache file from the in-memory map.
    fn flush(&self, map: &HashMap<String, CacheEntry>) -> Result<()> {
        let path = &self.config.file_path;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
        }

        let bytes = if self.config.pretty_json {
            serde_json::to_vec_pretty(map)?
        } else {
            serde_json::to_vec(map)?
        };
        fs::write(path, bytes).map_err(|e| CacheError::io(path, e))?;

        debug!(path = %path.display(), entries = map.len(), "Cache file flushed");
        Ok(())
    }
}

impl CacheStore for FileStore {
    fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let mut inner = lock(&self.inner, "file")?;
        self.load(&mut inner)?;

        inner.map.insert(key.to_string(), entry);
        self.flush(&inner.map)
    }

    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let mut inner = lock(&self.inner, "file")?;
        self.load(&mut inner)?;

        Ok(inner.map.get(key).cloned())
    }

    fn erase(&self, key: &str) -> Result<()> {
        let mut inner = lock(&self.inner, "file")?;
        self.load(&mut inner)?;

        if inner.map.remove(key).is_some() {
            self.flush(&inner.map)?;
        }
        Ok(())
    }

    /// Empties the store and persists the empty state without reading the
    /// old file first.
    fn clear(&self) -> Result<()> {
        let mut inner = lock(&self.inner, "file")?;
        inner.map.clear();
        inner.loaded = true;
        self.flush(&inner.map)
    }

    fn erase_if(&self, pred: &dyn Fn(&CacheEntry) -> bool) -> Result<usize> {
        let mut inner = lock(&self.inner, "file")?;
        self.load(&mut inner)?;

        let before = inner.map.len();
        inner.map.retain(|_, entry| !pred(entry));
        let removed = before - inner.map.len();

        if removed > 0 {
            self.flush(&inner.map)?;
        }
        Ok(removed)
    }

    fn len(&self) -> Result<usize> {
        let mut inner = lock(&self.inner, "file")?;
        self.load(&mut inner)?;
        Ok(inner.map.len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::at(dir.path().join("cache.json"))
    }

    fn sample() -> CacheEntry {
        CacheEntry::new(200, "{\"ok\":true}", 1_700_000_000_000)
            .with_header("content-type", "application/json")
    }

    #[test]
    fn test_construction_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let _store = store_in(&dir);

        assert!(!dir.path().join("cache.json").exists());
    }

    #[test]
    fn test_put_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.put("GET /a", sample()).unwrap();

        let raw = fs::read_to_string(dir.path().join("cache.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["GET /a"]["status"], 200);
        assert_eq!(json["GET /a"]["body"], "{\"ok\":true}");
        assert_eq!(json["GET /a"]["headers"]["content-type"], "application/json");
        assert_eq!(json["GET /a"]["created_at_ms"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).put("GET /a", sample()).unwrap();

        let reopened = store_in(&dir);

        assert_eq!(reopened.get("GET /a").unwrap(), Some(sample()));
        assert_eq!(reopened.len().unwrap(), 1);
    }

    #[test]
    fn test_get_does_not_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.get("missing").unwrap().is_none());
        assert!(!dir.path().join("cache.json").exists());
    }

    #[test]
    fn test_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pretty.json");
        let store = FileStore::new(FileStoreConfig {
            file_path: path.clone(),
            pretty_json: true,
        });

        store.put("k", sample()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("  \"k\""));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("cache.json");
        let store = FileStore::at(&path);

        store.put("k", sample()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_erase_and_clear_persist() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.put("a", sample()).unwrap();
        store.put("b", sample()).unwrap();

        store.erase("a").unwrap();
        assert_eq!(store_in(&dir).len().unwrap(), 1);

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store_in(&dir).is_empty().unwrap());
    }

    #[test]
    fn test_clear_overwrites_unloaded_file() {
        let dir = TempDir::new().unwrap();
        store_in(&dir).put("a", sample()).unwrap();

        store_in(&dir).clear().unwrap();

        assert!(store_in(&dir).get("a").unwrap().is_none());
    }

    #[test]
    fn test_erase_absent_key_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.erase("nope").unwrap();

        assert!(!dir.path().join("cache.json").exists());
    }

    #[test]
    fn test_erase_if_persists_subset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.put("old", CacheEntry::new(200, "", 10)).unwrap();
        store.put("new", CacheEntry::new(200, "", 1_000)).unwrap();

        assert_eq!(store.erase_if(&|e: &CacheEntry| e.created_at_ms < 100).unwrap(), 1);
        assert_eq!(store.erase_if(&|e: &CacheEntry| e.created_at_ms < 100).unwrap(), 0);

        let reopened = store_in(&dir);
        assert!(reopened.get("old").unwrap().is_none());
        assert!(reopened.get("new").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{\"truncated\": {\"status\": 2").unwrap();

        let store = FileStore::at(&path);

        assert!(store.is_empty().unwrap());
        store.put("k", sample()).unwrap();
        assert_eq!(FileStore::at(&path).len().unwrap(), 1);
    }

    #[test]
    fn test_empty_file_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "").unwrap();

        assert!(FileStore::at(&path).is_empty().unwrap());
    }

    #[test]
    fn test_failed_flush_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let store = FileStore::at(sub.join("cache.json"));
        store.put("a", sample()).unwrap();

        // A regular file where the parent directory is expected
        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, "x").unwrap();

        let err = store.put("k", sample()).unwrap_err();

        assert!(matches!(err, CacheError::Io { .. }));
        assert_eq!(store.get("k").unwrap(), Some(sample()));
        assert_eq!(store.get("a").unwrap(), Some(sample()));
    }

    #[test]
    fn test_failed_flush_keeps_removals() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let store = FileStore::at(sub.join("cache.json"));
        store.put("a", CacheEntry::new(200, "", 10)).unwrap();
        store.put("b", CacheEntry::new(200, "", 1_000)).unwrap();
        store.put("c", sample()).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, "x").unwrap();

        let err = store.erase("a").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
        assert!(store.get("a").unwrap().is_none());
        assert_eq!(store.len().unwrap(), 2);

        let err = store
            .erase_if(&|e: &CacheEntry| e.created_at_ms < 2_000)
            .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
        assert!(store.get("b").unwrap().is_none());
        assert_eq!(store.get("c").unwrap(), Some(sample()));

        let err = store.clear().unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_unreadable_file_is_retried() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        // A directory where the file is expected fails with something other
        // than NotFound
        fs::create_dir(&path).unwrap();
        let store = FileStore::at(&path);

        let err = store.get("k").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));

        fs::remove_dir(&path).unwrap();
        let seeded = HashMap::from([("k".to_string(), sample())]);
        fs::write(&path, serde_json::to_vec(&seeded).unwrap()).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(sample()));
        assert_eq!(store.len().unwrap(), 1);
    }
}
