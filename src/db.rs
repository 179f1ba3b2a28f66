//! Persistence bridge: the single JSON document holding tasks, categories and
//! settings, and the storage backends that read and replace it.
//!
//! Every write replaces the whole document. The file backend writes to a
//! temporary file in the target directory and renames it over the old one, so
//! a crash mid-write leaves the previous document intact.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

use crate::category::Category;
use crate::error::{Error, Result};
use crate::task::Task;

/// Default file name inside the data directory.
pub const DATA_FILE: &str = "todoforme-data.json";

/// Settings key holding the UTC offset used for the carry-over day boundary.
pub const CARRY_OVER_OFFSET_KEY: &str = "carryOverUtcOffsetHours";

const DEFAULT_CARRY_OVER_OFFSET: i32 = 9;

/// Opaque key/value settings map.
pub type Settings = Map<String, Value>;

pub fn default_settings() -> Settings {
    let mut settings = Map::new();
    settings.insert("theme".into(), json!("pink"));
    settings.insert("notifications".into(), json!(true));
    settings.insert("autoSave".into(), json!(true));
    settings.insert(CARRY_OVER_OFFSET_KEY.into(), json!(DEFAULT_CARRY_OVER_OFFSET));
    settings
}

/// Stored settings laid over the defaults, key by key.
pub fn merge_with_defaults(stored: &Settings) -> Settings {
    let mut merged = default_settings();
    for (k, v) in stored {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// A whole-hour UTC offset in -23..=23, if `value` is one.
pub fn parse_offset_hours(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .filter(|v| (-23..=23).contains(v))
        .and_then(|v| i32::try_from(v).ok())
}

/// Offset in hours for "today"/"yesterday" during carry-over. A missing or
/// out-of-range value yields the default.
pub fn carry_over_offset(settings: &Settings) -> i32 {
    match settings.get(CARRY_OVER_OFFSET_KEY) {
        None => DEFAULT_CARRY_OVER_OFFSET,
        Some(value) => parse_offset_hours(value).unwrap_or_else(|| {
            tracing::warn!(%value, "ignoring invalid carry-over offset");
            DEFAULT_CARRY_OVER_OFFSET
        }),
    }
}

/// The on-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub todos: Vec<Task>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default = "default_settings")]
    pub settings: Settings,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            categories: Vec::new(),
            settings: default_settings(),
        }
    }
}

/// Full snapshot produced by `export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub todos: Vec<Task>,
    pub categories: Vec<Category>,
    pub settings: Settings,
    pub export_date: String,
}

/// Shape accepted by `import`; each present field replaces its collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBundle {
    #[serde(default)]
    pub todos: Option<Vec<Task>>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl ImportBundle {
    pub fn is_empty(&self) -> bool {
        self.todos.is_none() && self.categories.is_none() && self.settings.is_none()
    }
}

/// Whole-collection get/set over the document.
///
/// Backends implement `read`/`write`; the collection accessors are built on
/// top and always replace an entire collection.
pub trait Storage {
    fn read(&self) -> Result<Document>;
    fn write(&self, doc: Document) -> Result<()>;

    /// Where the document lives, if anywhere.
    fn path(&self) -> Option<&Path> {
        None
    }

    fn todos(&self) -> Result<Vec<Task>> {
        Ok(self.read()?.todos)
    }

    fn set_todos(&self, todos: &[Task]) -> Result<()> {
        let mut doc = self.read()?;
        doc.todos = todos.to_vec();
        self.write(doc)
    }

    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.read()?.categories)
    }

    fn set_categories(&self, categories: &[Category]) -> Result<()> {
        let mut doc = self.read()?;
        doc.categories = categories.to_vec();
        self.write(doc)
    }

    fn settings(&self) -> Result<Settings> {
        Ok(merge_with_defaults(&self.read()?.settings))
    }

    fn set_setting(&self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.read()?;
        let mut settings = merge_with_defaults(&doc.settings);
        settings.insert(key.to_string(), value);
        doc.settings = settings;
        self.write(doc)
    }

    fn export(&self, at: DateTime<Utc>) -> Result<ExportBundle> {
        let doc = self.read()?;
        Ok(ExportBundle {
            settings: merge_with_defaults(&doc.settings),
            todos: doc.todos,
            categories: doc.categories,
            export_date: at.to_rfc3339(),
        })
    }

    fn import(&self, bundle: ImportBundle) -> Result<()> {
        let mut doc = self.read()?;
        if let Some(todos) = bundle.todos {
            doc.todos = todos;
        }
        if let Some(categories) = bundle.categories {
            doc.categories = categories;
        }
        if let Some(settings) = bundle.settings {
            doc.settings = settings;
        }
        self.write(doc)
    }

    /// Reset to an empty document with default settings.
    fn clear(&self) -> Result<()> {
        self.write(Document::default())
    }
}

/// JSON file backend with an in-memory copy of the document.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    cache: RefCell<Document>,
}

impl JsonFileStorage {
    /// Open the document at `path`. A missing file starts from defaults and is
    /// only created on the first write; an unparsable file is replaced by
    /// defaults on the next write.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = match fs::read_to_string(path) {
            Ok(buf) => match serde_json::from_str::<Document>(&buf) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid data file, starting fresh");
                    Document::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            cache: RefCell::new(doc),
        })
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn read(&self) -> Result<Document> {
        Ok(self.cache.borrow().clone())
    }

    fn write(&self, doc: Document) -> Result<()> {
        self.save(&doc)?;
        tracing::debug!(path = %self.path.display(), todos = doc.todos.len(), "document written");
        *self.cache.borrow_mut() = doc;
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-process backend; can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    doc: RefCell<Document>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: RefCell::new(doc),
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Document> {
        Ok(self.doc.borrow().clone())
    }

    fn write(&self, doc: Document) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "storage unavailable",
            )));
        }
        *self.doc.borrow_mut() = doc;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Copy the data file into a `backup/` directory beside it, stamped with the
/// local time. Returns the backup path.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "data file does not exist",
        )));
    }
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DATA_FILE);
    let backup_path = backup_dir.join(format!("{timestamp}_{file_name}"));
    fs::copy(path, &backup_path)?;
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn task(id: &str) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            emoji: None,
            description: None,
            status: Status::Waiting,
            date_created: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            start_time: None,
            end_time: None,
            total_time: 0,
            parent_id: None,
            children: Vec::new(),
            category: None,
            order: 0,
        }
    }

    #[test]
    fn missing_file_reads_defaults_without_creating_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);
        let storage = JsonFileStorage::open(&path).unwrap();
        assert!(storage.todos().unwrap().is_empty());
        assert_eq!(storage.settings().unwrap()["theme"], json!("pink"));
        assert!(!path.exists());
    }

    #[test]
    fn writes_replace_whole_file_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(DATA_FILE);
        let storage = JsonFileStorage::open(&path).unwrap();
        storage.set_todos(&[task("a"), task("b")]).unwrap();
        storage.set_todos(&[task("c")]).unwrap();

        let reopened = JsonFileStorage::open(&path).unwrap();
        let ids: Vec<String> = reopened.todos().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["c".to_string()]);

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != DATA_FILE)
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.read().unwrap(), Document::default());
    }

    #[test]
    fn stored_settings_merge_over_defaults() {
        let mut stored = Map::new();
        stored.insert("theme".into(), json!("mint"));
        let storage = MemoryStorage::with_document(Document {
            settings: stored,
            ..Document::default()
        });
        let settings = storage.settings().unwrap();
        assert_eq!(settings["theme"], json!("mint"));
        assert_eq!(settings["notifications"], json!(true));
        assert_eq!(carry_over_offset(&settings), 9);

        storage.set_setting(CARRY_OVER_OFFSET_KEY, json!(0)).unwrap();
        assert_eq!(carry_over_offset(&storage.settings().unwrap()), 0);
        assert_eq!(storage.settings().unwrap()["theme"], json!("mint"));
    }

    #[test]
    fn out_of_range_offset_falls_back_to_default() {
        let storage = MemoryStorage::default();
        for bad in [json!(1_000_000), json!(24), json!(-24), json!(i64::MAX), json!("nine")] {
            storage.set_setting(CARRY_OVER_OFFSET_KEY, bad).unwrap();
            assert_eq!(carry_over_offset(&storage.settings().unwrap()), 9);
        }
        storage.set_setting(CARRY_OVER_OFFSET_KEY, json!(-23)).unwrap();
        assert_eq!(carry_over_offset(&storage.settings().unwrap()), -23);
    }

    #[test]
    fn export_then_import_replaces_present_fields_only() {
        let storage = MemoryStorage::default();
        storage.set_todos(&[task("a")]).unwrap();
        storage
            .set_categories(&crate::category::default_categories())
            .unwrap();

        let at = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let bundle = storage.export(at).unwrap();
        assert_eq!(bundle.export_date, "2024-05-02T12:00:00+00:00");
        let text = serde_json::to_string(&bundle).unwrap();
        assert!(text.contains("\"exportDate\""));

        let partial: ImportBundle = serde_json::from_str(r#"{"todos": []}"#).unwrap();
        storage.import(partial).unwrap();
        assert!(storage.todos().unwrap().is_empty());
        assert_eq!(storage.categories().unwrap().len(), 5);

        let full: ImportBundle = serde_json::from_str(&text).unwrap();
        storage.import(full).unwrap();
        assert_eq!(storage.todos().unwrap().len(), 1);
    }

    #[test]
    fn clear_resets_document() {
        let storage = MemoryStorage::default();
        storage.set_todos(&[task("a")]).unwrap();
        storage.set_setting("theme", json!("dark")).unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.read().unwrap(), Document::default());
    }

    #[test]
    fn failing_backend_reports_errors() {
        let storage = MemoryStorage::default();
        storage.fail_writes(true);
        assert!(storage.set_todos(&[task("a")]).is_err());
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn backup_copies_into_backup_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);
        assert!(create_backup(&path).is_err());

        JsonFileStorage::open(&path).unwrap().set_todos(&[task("a")]).unwrap();
        let backup = create_backup(&path).unwrap();
        assert_eq!(backup.parent().unwrap(), dir.path().join("backup"));
        assert_eq!(fs::read(&backup).unwrap(), fs::read(&path).unwrap());
    }
}
