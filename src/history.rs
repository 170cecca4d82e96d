//! Comparison and import history
//!
//! Tool state lives in a `.swatch` directory found like git finds `.git`:
//! `SWATCH_DIR` env var first, then walking up from the working directory.
//! History files are plain JSON arrays; the baseline is the last imported
//! token file stored whole. The store serializes all mutations through
//! mutexes, so concurrent callers see a consistent newest-first order.

use crate::compare::ComparisonChanges;
use crate::model::{TokenMetadata, TokenNode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Most entries kept per history list; older ones fall off the end.
pub const MAX_ENTRIES: usize = 10;

const COMPARISON_FILE: &str = "comparison-history.json";
const IMPORT_FILE: &str = "import-history.json";
const BASELINE_FILE: &str = "baseline.json";

#[derive(Debug)]
pub enum HistoryError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "IO error: {}", e),
            HistoryError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(e: std::io::Error) -> Self {
        HistoryError::Io(e)
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// A file name plus the envelope metadata it carried, as recorded in
/// history entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStamp {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

/// One recorded comparison, with the full result stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub id: String,
    pub compared_at: String,
    pub old_file: FileStamp,
    pub new_file: FileStamp,
    pub changes: ComparisonChanges,
}

impl ComparisonEntry {
    pub fn new(old_file: FileStamp, new_file: FileStamp, changes: ComparisonChanges) -> Self {
        ComparisonEntry {
            id: Uuid::new_v4().to_string(),
            compared_at: chrono::Local::now().to_rfc3339(),
            old_file,
            new_file,
            changes,
        }
    }
}

/// One recorded import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub id: String,
    pub imported_at: String,
    pub file_name: String,
    pub token_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl ImportEntry {
    pub fn new(file_name: &str, token_count: usize, metadata: Option<TokenMetadata>) -> Self {
        ImportEntry {
            id: Uuid::new_v4().to_string(),
            imported_at: chrono::Local::now().to_rfc3339(),
            file_name: file_name.to_string(),
            token_count,
            metadata,
        }
    }
}

/// The last imported token file, kept whole so later commands can compare
/// against it and toggle tokens on and off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub file_name: String,
    pub imported_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
    pub tokens: Vec<TokenNode>,
}

/// File-backed store for history lists and the baseline.
pub struct HistoryStore {
    dir: PathBuf,
    comparisons: Mutex<Vec<ComparisonEntry>>,
    imports: Mutex<Vec<ImportEntry>>,
}

impl HistoryStore {
    /// Open the store at the default state directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&state_dir())
    }

    /// Open the store at an explicit directory, creating it if needed.
    pub fn open_at(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(HistoryStore {
            dir: dir.to_path_buf(),
            comparisons: Mutex::new(load_list(&dir.join(COMPARISON_FILE))?),
            imports: Mutex::new(load_list(&dir.join(IMPORT_FILE))?),
        })
    }

    /// Directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Comparison entries, newest first.
    pub fn comparisons(&self) -> Vec<ComparisonEntry> {
        self.comparisons.lock().expect("history lock poisoned").clone()
    }

    /// Import entries, newest first.
    pub fn imports(&self) -> Vec<ImportEntry> {
        self.imports.lock().expect("history lock poisoned").clone()
    }

    /// Record a comparison at the front of the list.
    ///
    /// An earlier entry for the same old/new file name pair is dropped
    /// first, then the list is capped at [`MAX_ENTRIES`].
    pub fn add_comparison(&self, entry: ComparisonEntry) -> Result<()> {
        let mut entries = self.comparisons.lock().expect("history lock poisoned");
        entries.retain(|e| {
            e.old_file.file_name != entry.old_file.file_name
                || e.new_file.file_name != entry.new_file.file_name
        });
        entries.insert(0, entry);
        entries.truncate(MAX_ENTRIES);
        save_list(&self.dir.join(COMPARISON_FILE), &entries)
    }

    /// Record an import at the front of the list, deduplicated by file
    /// name and capped like comparisons.
    pub fn add_import(&self, entry: ImportEntry) -> Result<()> {
        let mut entries = self.imports.lock().expect("history lock poisoned");
        entries.retain(|e| e.file_name != entry.file_name);
        entries.insert(0, entry);
        entries.truncate(MAX_ENTRIES);
        save_list(&self.dir.join(IMPORT_FILE), &entries)
    }

    /// Remove one comparison entry by id. Returns whether it existed.
    pub fn remove_comparison(&self, id: &str) -> Result<bool> {
        let mut entries = self.comparisons.lock().expect("history lock poisoned");
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            save_list(&self.dir.join(COMPARISON_FILE), &entries)?;
        }
        Ok(removed)
    }

    /// Remove one import entry by id. Returns whether it existed.
    pub fn remove_import(&self, id: &str) -> Result<bool> {
        let mut entries = self.imports.lock().expect("history lock poisoned");
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            save_list(&self.dir.join(IMPORT_FILE), &entries)?;
        }
        Ok(removed)
    }

    /// Drop all comparison entries.
    pub fn clear_comparisons(&self) -> Result<()> {
        let mut entries = self.comparisons.lock().expect("history lock poisoned");
        entries.clear();
        save_list(&self.dir.join(COMPARISON_FILE), &entries)
    }

    /// Drop all import entries.
    pub fn clear_imports(&self) -> Result<()> {
        let mut entries = self.imports.lock().expect("history lock poisoned");
        entries.clear();
        save_list(&self.dir.join(IMPORT_FILE), &entries)
    }

    /// Edit the stored changes of one comparison entry and persist them.
    ///
    /// `id` selects the entry (newest first when `None`); unknown ids
    /// leave the store untouched. Returns the updated entry.
    pub fn update_comparison<F>(&self, id: Option<&str>, mutate: F) -> Result<Option<ComparisonEntry>>
    where
        F: FnOnce(&mut ComparisonChanges),
    {
        let mut entries = self.comparisons.lock().expect("history lock poisoned");
        let entry = match id {
            Some(id) => entries.iter_mut().find(|e| e.id == id),
            None => entries.first_mut(),
        };
        let Some(entry) = entry else {
            return Ok(None);
        };
        mutate(&mut entry.changes);
        let updated = entry.clone();
        save_list(&self.dir.join(COMPARISON_FILE), &entries)?;
        Ok(Some(updated))
    }

    /// The stored baseline, if any.
    pub fn baseline(&self) -> Result<Option<Baseline>> {
        let path = self.dir.join(BASELINE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replace the stored baseline.
    pub fn set_baseline(&self, baseline: &Baseline) -> Result<()> {
        let content = serde_json::to_string_pretty(baseline)?;
        fs::write(self.dir.join(BASELINE_FILE), content)?;
        Ok(())
    }

    /// Delete the stored baseline. Returns whether one existed.
    pub fn clear_baseline(&self) -> Result<bool> {
        let path = self.dir.join(BASELINE_FILE);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

fn load_list<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save_list<T: Serialize>(path: &Path, entries: &[T]) -> Result<()> {
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content)?;
    Ok(())
}

/// Resolve the `.swatch` state directory (like git finds `.git`).
/// Can be overridden with the SWATCH_DIR env var.
fn state_dir() -> PathBuf {
    // Check env var first - always takes priority
    if let Ok(dir) = std::env::var("SWATCH_DIR") {
        return PathBuf::from(dir);
    }

    // Walk up directory tree to find a .swatch folder
    if let Ok(current_dir) = std::env::current_dir() {
        let mut dir = current_dir.as_path();
        loop {
            let swatch_dir = dir.join(".swatch");
            if swatch_dir.is_dir() {
                return swatch_dir;
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => break, // Reached filesystem root
            }
        }
    }

    // No .swatch found - default to current directory
    // (the first stateful command will create it here)
    PathBuf::from(".swatch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stamp(name: &str) -> FileStamp {
        FileStamp {
            file_name: name.to_string(),
            metadata: None,
        }
    }

    fn entry(old: &str, new: &str) -> ComparisonEntry {
        ComparisonEntry::new(stamp(old), stamp(new), ComparisonChanges::default())
    }

    #[test]
    fn test_open_creates_directory_and_empty_lists() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("state");
        let store = HistoryStore::open_at(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(store.comparisons().is_empty());
        assert!(store.imports().is_empty());
        assert!(store.baseline().unwrap().is_none());
    }

    #[test]
    fn test_add_comparison_newest_first_and_persisted() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        store.add_comparison(entry("c.json", "d.json")).unwrap();

        let entries = store.comparisons();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].old_file.file_name, "c.json");

        // A fresh store reads the same list back from disk.
        let reopened = HistoryStore::open_at(tmp.path()).unwrap();
        assert_eq!(reopened.comparisons(), entries);
    }

    #[test]
    fn test_same_file_pair_replaces_older_entry() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        store.add_comparison(entry("other.json", "b.json")).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();

        let entries = store.comparisons();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].old_file.file_name, "a.json");
        assert_eq!(entries[1].old_file.file_name, "other.json");
    }

    #[test]
    fn test_reversed_pair_is_a_distinct_entry() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        store.add_comparison(entry("b.json", "a.json")).unwrap();
        assert_eq!(store.comparisons().len(), 2);
    }

    #[test]
    fn test_history_caps_at_max_entries() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        for i in 0..(MAX_ENTRIES + 5) {
            store
                .add_comparison(entry(&format!("old-{i}.json"), "new.json"))
                .unwrap();
        }
        let entries = store.comparisons();
        assert_eq!(entries.len(), MAX_ENTRIES);
        // The newest survive.
        assert_eq!(entries[0].old_file.file_name, "old-14.json");
        assert_eq!(entries[MAX_ENTRIES - 1].old_file.file_name, "old-5.json");
    }

    #[test]
    fn test_remove_comparison_by_id() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        let id = store.comparisons()[0].id.clone();

        assert!(store.remove_comparison(&id).unwrap());
        assert!(store.comparisons().is_empty());
        assert!(!store.remove_comparison(&id).unwrap());
    }

    #[test]
    fn test_clear_comparisons() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        store.clear_comparisons().unwrap();
        assert!(store.comparisons().is_empty());

        let reopened = HistoryStore::open_at(tmp.path()).unwrap();
        assert!(reopened.comparisons().is_empty());
    }

    #[test]
    fn test_import_history_dedup_and_cap() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_import(ImportEntry::new("tokens.json", 10, None)).unwrap();
        store.add_import(ImportEntry::new("tokens.json", 12, None)).unwrap();

        let entries = store.imports();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].token_count, 12);

        for i in 0..MAX_ENTRIES + 2 {
            store
                .add_import(ImportEntry::new(&format!("t-{i}.json"), i, None))
                .unwrap();
        }
        assert_eq!(store.imports().len(), MAX_ENTRIES);
    }

    #[test]
    fn test_update_comparison_persists_suggestions() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();

        let updated = store
            .update_comparison(None, |changes| {
                changes.add_replacement_suggestion("gone", "replacement");
                changes.accept_auto_suggestion("gone");
            })
            .unwrap()
            .unwrap();
        assert!(updated.changes.is_accepted("gone"));

        let reopened = HistoryStore::open_at(tmp.path()).unwrap();
        let entries = reopened.comparisons();
        assert_eq!(
            entries[0].changes.suggestion_for("gone"),
            Some("replacement")
        );
        assert!(entries[0].changes.is_accepted("gone"));
    }

    #[test]
    fn test_update_comparison_unknown_id_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        store.add_comparison(entry("a.json", "b.json")).unwrap();
        let result = store
            .update_comparison(Some("no-such-id"), |changes| {
                changes.add_replacement_suggestion("x", "y");
            })
            .unwrap();
        assert!(result.is_none());
        assert!(store.comparisons()[0].changes.replacement_suggestions.is_empty());
    }

    #[test]
    fn test_baseline_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        let baseline = Baseline {
            file_name: "tokens.json".to_string(),
            imported_at: chrono::Local::now().to_rfc3339(),
            metadata: None,
            tokens: vec![TokenNode::token("Primary").with_path("color/primary")],
        };
        store.set_baseline(&baseline).unwrap();

        let loaded = store.baseline().unwrap().unwrap();
        assert_eq!(loaded.file_name, "tokens.json");
        assert_eq!(loaded.tokens.len(), 1);
        assert_eq!(loaded.tokens[0].identity(), "color/primary");

        assert!(store.clear_baseline().unwrap());
        assert!(store.baseline().unwrap().is_none());
        assert!(!store.clear_baseline().unwrap());
    }

    #[test]
    fn test_baseline_preserves_enabled_flags() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open_at(tmp.path()).unwrap();
        let mut tokens = vec![TokenNode::token("Primary").with_path("color/primary")];
        crate::model::set_enabled(&mut tokens, "color/primary", false);
        let baseline = Baseline {
            file_name: "tokens.json".to_string(),
            imported_at: chrono::Local::now().to_rfc3339(),
            metadata: None,
            tokens,
        };
        store.set_baseline(&baseline).unwrap();
        let loaded = store.baseline().unwrap().unwrap();
        assert!(!loaded.tokens[0].is_enabled);
    }
}
