//! Local draft persistence
//!
//! The browser keeps one serialized draft under a fixed key in local storage.
//! `KeyValueStore` models that storage so it can be backed by memory in tests
//! or by files on disk, and `DraftStore` is the adapter the wizard talks to.
//! Load failures degrade to "no draft" and save failures are logged; neither
//! reaches the wizard's caller.

use crate::error::{Result, WizardError};
use crate::types::Draft;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// String key-value storage shared across wizard mounts
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed key-value store
///
/// Each key is a file under the root directory. Atomic writes via temp file +
/// rename to prevent torn values.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    ///
    /// ASCII letters, digits and `-` are kept; every other byte (including
    /// `_`) is written as `_XX` hex, so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.root.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = std::fs::read_to_string(&path).map_err(|e| {
            WizardError::Persistence(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("tmp");

        std::fs::create_dir_all(&self.root).map_err(|e| {
            WizardError::Persistence(format!(
                "Failed to create store directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        std::fs::write(&tmp_path, value).map_err(|e| {
            WizardError::Persistence(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        std::fs::rename(&tmp_path, &path).map_err(|e| {
            WizardError::Persistence(format!(
                "Failed to rename {} → {}: {}",
                tmp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::debug!(key = %key, path = %path.display(), "Value stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WizardError::Persistence(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// In-memory key-value store for testing
///
/// Lost on drop. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|e| {
            WizardError::Persistence(format!("Failed to acquire store lock: {}", e))
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|e| {
            WizardError::Persistence(format!("Failed to acquire store lock: {}", e))
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|e| {
            WizardError::Persistence(format!("Failed to acquire store lock: {}", e))
        })?;
        values.remove(key);
        Ok(())
    }
}

/// Draft adapter over a key-value store slot
#[derive(Clone)]
pub struct DraftStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftStore {
    /// Create an adapter for the draft stored under `key`
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Storage key of the draft slot
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored draft, surfacing read and parse failures
    pub fn try_load(&self) -> Result<Option<Draft>> {
        let Some(json) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        if json.trim().is_empty() {
            return Ok(None);
        }
        let draft: Draft = serde_json::from_str(&json)?;
        Ok(Some(draft))
    }

    /// Load the stored draft; corrupt or unreadable content counts as absent
    pub fn load(&self) -> Option<Draft> {
        match self.try_load() {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unreadable draft");
                None
            }
        }
    }

    /// Load the stored draft or the empty default
    pub fn load_or_default(&self) -> Draft {
        self.load().unwrap_or_default()
    }

    /// Serialize and overwrite the draft slot
    pub fn try_save(&self, draft: &Draft) -> Result<()> {
        let json = serde_json::to_string(draft)?;
        self.backend.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, "Draft saved");
        Ok(())
    }

    /// Overwrite the draft slot; failures are logged and otherwise ignored
    pub fn save(&self, draft: &Draft) {
        if let Err(e) = self.try_save(draft) {
            tracing::warn!(key = %self.key, error = %e, "Failed to save draft");
        }
    }

    /// Remove the stored draft
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to clear draft");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Creativity, OutputFormat, Role};

    const KEY: &str = "promptify-prompt-draft";

    fn sample_draft() -> Draft {
        Draft {
            goal: "Summarize quarterly sales calls".to_string(),
            role: Role::Custom("Revenue Analyst".to_string()),
            target_audience: "Sales leadership".to_string(),
            context: "Transcripts are long and inconsistent in structure".to_string(),
            output_format: Some(OutputFormat::Report),
            tags: ["sales", "analysis"].into_iter().collect(),
            creativity: Some(Creativity::Conservative),
            specificity: None,
        }
    }

    fn memory_store() -> (MemoryKeyValueStore, DraftStore) {
        let backend = MemoryKeyValueStore::new();
        let store = DraftStore::new(Arc::new(backend.clone()), KEY);
        (backend, store)
    }

    /// Backend whose writes always fail, like a full browser quota
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(WizardError::Persistence("storage unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(WizardError::Persistence("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(WizardError::Persistence("storage unavailable".to_string()))
        }
    }

    #[test]
    fn test_memory_save_load() {
        let (_, store) = memory_store();
        let draft = sample_draft();

        store.save(&draft);
        assert_eq!(store.load(), Some(draft));
    }

    #[test]
    fn test_empty_store_loads_default() {
        let (_, store) = memory_store();
        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load_or_default(), Draft::default());
    }

    #[test]
    fn test_corrupt_content_is_absent() {
        let (backend, store) = memory_store();
        backend.set(KEY, "{not json").unwrap();

        assert!(matches!(store.try_load(), Err(WizardError::Serialization(_))));
        assert!(store.load().is_none());
        assert_eq!(store.load_or_default(), Draft::default());
    }

    #[test]
    fn test_wrong_shape_is_absent() {
        let (backend, store) = memory_store();
        backend.set(KEY, r#"{"outputFormat":"Interpretive Dance"}"#).unwrap();
        assert!(store.load().is_none());

        backend.set(KEY, "[1,2,3]").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let (_, store) = memory_store();
        store.save(&sample_draft());

        let newer = Draft {
            goal: "A different goal entirely".to_string(),
            ..Draft::default()
        };
        store.save(&newer);
        assert_eq!(store.load(), Some(newer));
    }

    #[test]
    fn test_clear_removes_slot() {
        let (backend, store) = memory_store();
        store.save(&sample_draft());
        assert_eq!(backend.len(), 1);

        store.clear();
        assert!(backend.is_empty());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_failing_backend_never_panics() {
        let store = DraftStore::new(Arc::new(FullStore), KEY);
        store.save(&sample_draft());
        store.clear();
        assert!(store.try_save(&sample_draft()).is_err());
        assert!(store.load().is_none());
        assert_eq!(store.load_or_default(), Draft::default());
    }

    #[test]
    fn test_file_store_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileKeyValueStore::new(dir.path());
        let store = DraftStore::new(Arc::new(FileKeyValueStore::new(dir.path())), KEY);

        store.save(&sample_draft());
        assert!(backend.path_for(KEY).exists());
        assert_eq!(store.load(), Some(sample_draft()));

        let content = std::fs::read_to_string(backend.path_for(KEY)).unwrap();
        assert!(content.contains("\"customRole\":\"Revenue Analyst\""));
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileKeyValueStore::new(dir.path());
        assert!(backend.get("absent").unwrap().is_none());
        backend.remove("absent").unwrap();
    }

    #[test]
    fn test_file_store_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("deep");
        let backend = FileKeyValueStore::new(&root);

        backend.set(KEY, "{}").unwrap();
        assert!(root.exists());
        assert_eq!(backend.get(KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileKeyValueStore::new(dir.path());

        backend.set(KEY, "first").unwrap();
        backend.set(KEY, "second").unwrap();

        let path = backend.path_for(KEY);
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(backend.get(KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_encodes_keys() {
        let backend = FileKeyValueStore::new("/tmp/store");
        assert_eq!(
            backend.path_for("../escape/attempt"),
            PathBuf::from("/tmp/store/_2E_2E_2Fescape_2Fattempt.json")
        );
        assert_eq!(
            backend.path_for(KEY),
            PathBuf::from("/tmp/store/promptify-prompt-draft.json")
        );
    }

    #[test]
    fn test_file_store_similar_keys_stay_apart() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileKeyValueStore::new(dir.path());
        assert_ne!(backend.path_for("a/b"), backend.path_for("a_b"));

        backend.set("a/b", "slash").unwrap();
        backend.set("a_b", "underscore").unwrap();
        assert_eq!(backend.get("a/b").unwrap().as_deref(), Some("slash"));
        assert_eq!(backend.get("a_b").unwrap().as_deref(), Some("underscore"));
    }
}
