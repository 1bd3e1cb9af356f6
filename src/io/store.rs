use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::io::lock::{BoardLock, LockError};
use crate::model::item::TriageItem;

/// Directory holding the board's persistent state.
pub const BOARD_DIR_NAME: &str = "z10";
/// The record store file inside the board directory.
pub const BOARD_FILE_NAME: &str = "board.json";

/// Current on-disk schema version.
const SCHEMA_VERSION: u64 = 1;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a triage board: no {BOARD_DIR_NAME}/{BOARD_FILE_NAME} found (run `zt init`)")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("board file has schema version {found}, newer than supported version {SCHEMA_VERSION}")]
    UnsupportedVersion { found: u64 },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk shape of the board file. The item collection keeps its
/// historical store name `layout`; `kv` is the auxiliary keyed value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardFile {
    version: u64,
    #[serde(rename = "layout", default)]
    items: IndexMap<String, TriageItem>,
    #[serde(default)]
    kv: IndexMap<String, serde_json::Value>,
}

impl BoardFile {
    fn empty() -> Self {
        BoardFile {
            version: SCHEMA_VERSION,
            items: IndexMap::new(),
            kv: IndexMap::new(),
        }
    }
}

/// Durable, per-board storage for the full item collection plus an
/// auxiliary keyed value store.
///
/// The underlying file is opened lazily: the first operation creates or
/// migrates the schema, and later (or concurrent) opens share that one
/// initialization. Every mutation takes the advisory board lock, rereads
/// the file, applies the change, and atomically replaces the file, so a
/// batch either lands whole or not at all.
pub struct Store {
    dir: PathBuf,
    opened: Mutex<bool>,
}

/// Discover the board by walking up from the given directory, looking for
/// a `z10/board.json`.
pub fn discover_board(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR_NAME);
        if board_dir.join(BOARD_FILE_NAME).exists() {
            return Ok(board_dir);
        }
        if !current.pop() {
            return Err(StoreError::NotABoard);
        }
    }
}

impl Store {
    /// A store rooted at the given board directory. No I/O happens until
    /// the first operation.
    pub fn new(board_dir: impl Into<PathBuf>) -> Self {
        Store {
            dir: board_dir.into(),
            opened: Mutex::new(false),
        }
    }

    /// The board directory this store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record store file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(BOARD_FILE_NAME)
    }

    /// Every stored item, in file order. Ordering beyond that is the
    /// filter engine's concern.
    pub fn get_all(&self) -> Result<Vec<TriageItem>, StoreError> {
        self.ensure_open()?;
        let file = self.read_file()?;
        Ok(file.items.into_values().collect())
    }

    /// Upsert by id: a new id appends, an existing id overwrites its
    /// record in place.
    pub fn put(&self, item: &TriageItem) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = BoardLock::acquire_default(&self.dir)?;
        let mut file = self.read_file()?;
        file.items.insert(item.id.clone(), item.clone());
        self.write_file(&file)
    }

    /// Remove the record with this id. Missing ids are not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = BoardLock::acquire_default(&self.dir)?;
        let mut file = self.read_file()?;
        file.items.shift_remove(id);
        self.write_file(&file)
    }

    /// Apply `put` semantics to every element as one durable unit; the
    /// single atomic file replacement makes partial application impossible.
    pub fn bulk_put(&self, items: &[TriageItem]) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = BoardLock::acquire_default(&self.dir)?;
        let mut file = self.read_file()?;
        for item in items {
            file.items.insert(item.id.clone(), item.clone());
        }
        self.write_file(&file)
    }

    /// Read a value from the auxiliary keyed store.
    pub fn kv_get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.ensure_open()?;
        let file = self.read_file()?;
        Ok(file.kv.get(key).cloned())
    }

    /// Write a value into the auxiliary keyed store.
    pub fn kv_put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.ensure_open()?;
        let _lock = BoardLock::acquire_default(&self.dir)?;
        let mut file = self.read_file()?;
        file.kv.insert(key.to_string(), value);
        self.write_file(&file)
    }

    /// Create or migrate the schema exactly once per store handle.
    /// Concurrent first uses block on the mutex and find the work done.
    fn ensure_open(&self) -> Result<(), StoreError> {
        let mut opened = self.opened.lock().unwrap();
        if !*opened {
            self.init_schema()?;
            *opened = true;
        }
        Ok(())
    }

    /// Idempotent schema creation/migration, run under the board lock so
    /// two processes cannot race duplicate creation attempts.
    fn init_schema(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let _lock = BoardLock::acquire_default(&self.dir)?;

        let path = self.file_path();
        if !path.exists() {
            return self.write_file(&BoardFile::empty());
        }

        let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
            path: path.clone(),
            source: e,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| StoreError::Parse {
                path: path.clone(),
                source: e,
            })?;

        // Version 0 wrote a bare array of items; lift it into the envelope.
        if let Some(records) = value.as_array() {
            let items: Vec<TriageItem> = serde_json::from_value(serde_json::Value::Array(
                records.clone(),
            ))
            .map_err(|e| StoreError::Parse {
                path: path.clone(),
                source: e,
            })?;
            let mut file = BoardFile::empty();
            for item in items {
                file.items.insert(item.id.clone(), item);
            }
            return self.write_file(&file);
        }

        let found = value.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if found > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion { found });
        }
        Ok(())
    }

    fn read_file(&self) -> Result<BoardFile, StoreError> {
        let path = self.file_path();
        let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| StoreError::Parse { path, source: e })
    }

    /// Replace the board file atomically (temp file + rename).
    fn write_file(&self, file: &BoardFile) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(file).map_err(|e| StoreError::Parse {
            path: self.file_path(),
            source: e,
        })?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(self.file_path()).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> Store {
        Store::new(tmp.path().join(BOARD_DIR_NAME))
    }

    #[test]
    fn first_use_creates_the_schema() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.get_all().unwrap().is_empty());

        let text = fs::read_to_string(store.file_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["layout"].is_object());
        assert!(value["kv"].is_object());
    }

    #[test]
    fn put_then_get_all_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let item = TriageItem::new("a", "First");
        store.put(&item).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all, vec![item]);
    }

    #[test]
    fn put_with_existing_id_overwrites_without_duplicating() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.put(&TriageItem::new("a", "Old title")).unwrap();
        let before = store.get_all().unwrap().len();

        store.put(&TriageItem::new("a", "New title")).unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), before);
        assert_eq!(all[0].title, "New title");
    }

    #[test]
    fn delete_removes_and_tolerates_missing_ids() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.put(&TriageItem::new("a", "First")).unwrap();

        store.delete("a").unwrap();
        assert!(store.get_all().unwrap().is_empty());

        // Deleting again is a no-op, not an error
        store.delete("a").unwrap();
        store.delete("never-existed").unwrap();
    }

    #[test]
    fn bulk_put_upserts_every_record() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.put(&TriageItem::new("a", "Old")).unwrap();

        store
            .bulk_put(&[TriageItem::new("a", "Replaced"), TriageItem::new("b", "Added")])
            .unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Replaced");
        assert_eq!(all[1].title, "Added");
    }

    #[test]
    fn get_all_preserves_insertion_order() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        for id in ["one", "two", "three"] {
            store.put(&TriageItem::new(id, id)).unwrap();
        }
        // Updating an existing record keeps its position
        store.put(&TriageItem::new("one", "one again")).unwrap();

        let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
    }

    #[test]
    fn legacy_bare_array_file_migrates_into_envelope() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(BOARD_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(BOARD_FILE_NAME),
            r#"[{"id":"a","title":"Carried over"}]"#,
        )
        .unwrap();

        let store = Store::new(&dir);
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Carried over");

        let text = fs::read_to_string(store.file_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
    }

    #[test]
    fn newer_schema_version_is_refused_not_clobbered() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(BOARD_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        let original = r#"{"version":99,"layout":{},"kv":{}}"#;
        fs::write(dir.join(BOARD_FILE_NAME), original).unwrap();

        let store = Store::new(&dir);
        assert!(matches!(
            store.get_all(),
            Err(StoreError::UnsupportedVersion { found: 99 })
        ));
        // The file was left alone
        assert_eq!(fs::read_to_string(dir.join(BOARD_FILE_NAME)).unwrap(), original);
    }

    #[test]
    fn kv_store_round_trips_values() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.kv_get("layout").unwrap().is_none());

        store
            .kv_put("layout", serde_json::json!({"cols": 4}))
            .unwrap();
        let value = store.kv_get("layout").unwrap().unwrap();
        assert_eq!(value["cols"], 4);

        // Items and kv live side by side
        store.put(&TriageItem::new("a", "First")).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
        assert!(store.kv_get("layout").unwrap().is_some());
    }

    #[test]
    fn discover_walks_up_to_the_board() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(BOARD_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(BOARD_FILE_NAME), "{\"version\":1}").unwrap();

        let nested = tmp.path().join("deep/nested/dir");
        fs::create_dir_all(&nested).unwrap();
        let found = discover_board(&nested).unwrap();
        assert_eq!(found, dir);
    }

    #[test]
    fn discover_fails_outside_any_board() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(StoreError::NotABoard)
        ));
    }
}
