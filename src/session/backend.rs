//! Key-value backends for persisted session state.
//!
//! This module provides the raw storage the session store sits on:
//! - `FileKeyValueStore` - KDL document in the data directory (default)
//! - `MemoryKeyValueStore` - In-process map for tests and embedders
//!
//! Multi-key writes are all-or-nothing in every backend: a reader sees either
//! all of the new values or none of them.

use crate::Result;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the session document inside the data directory.
pub const SESSION_FILE: &str = "session.kdl";

/// Required permissions for session.kdl (Unix: 0600, owner read/write only).
#[cfg(unix)]
pub const SESSION_FILE_MODE: u32 = 0o600;

/// Trait for backends that hold string values under string keys.
pub trait KeyValueStore: Send + Sync {
    /// Read several keys from one consistent snapshot.
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>>;

    /// Write several keys in one atomic step.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// Remove several keys in one atomic step. Missing keys are not an error.
    fn remove_many(&self, keys: &[&str]) -> Result<()>;

    /// Drop every stored value, whatever shape the storage is in.
    fn purge(&self) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Read a single key.
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_many(&[key])?.pop().flatten())
    }
}

/// Session state kept in a KDL document on disk.
///
/// # KDL Schema
///
/// ```kdl
/// // Machine-specific state - never sync
/// auth-token "eyJhbGciOiJIUzI1NiJ9..."
/// current-user "{\"id\":5,\"username\":\"bob\"}"
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `session.kdl` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_doc(&self) -> Result<KdlDocument> {
        if !self.path.exists() {
            return Ok(KdlDocument::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(content.parse::<KdlDocument>()?)
    }

    /// Like `read_doc`, but a corrupt file is replaced instead of blocking writes.
    fn read_doc_for_update(&self) -> Result<KdlDocument> {
        match self.read_doc() {
            Ok(doc) => Ok(doc),
            Err(crate::Error::Kdl(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding unparseable session file");
                Ok(KdlDocument::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the file contents atomically: write a sibling temp file, then rename.
    fn write_doc(&self, doc: &mut KdlDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        doc.autoformat();
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(doc.to_string().as_bytes())?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(SESSION_FILE_MODE))?;
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn node_string(doc: &KdlDocument, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
}

impl KeyValueStore for FileKeyValueStore {
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let doc = self.read_doc()?;
        Ok(keys.iter().map(|key| node_string(&doc, key)).collect())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut doc = self.read_doc_for_update()?;
        for (key, value) in entries {
            doc.nodes_mut().retain(|node| node.name().value() != *key);
            let mut node = KdlNode::new(*key);
            node.push(KdlEntry::new(KdlValue::String(value.clone())));
            doc.nodes_mut().push(node);
        }
        self.write_doc(&mut doc)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut doc = match self.read_doc() {
            Ok(doc) => doc,
            Err(crate::Error::Kdl(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "removing unparseable session file");
                return self.purge();
            }
            Err(e) => return Err(e),
        };
        let before = doc.nodes().len();
        doc.nodes_mut()
            .retain(|node| !keys.contains(&node.name().value()));
        if doc.nodes().len() == before {
            return Ok(());
        }
        if doc.nodes().is_empty() {
            return self.purge();
        }
        self.write_doc(&mut doc)
    }

    fn purge(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Session state kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let values = self.values();
        Ok(keys.iter().map(|key| values.get(*key).cloned()).collect())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut values = self.values();
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut values = self.values();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }

    fn purge(&self) -> Result<()> {
        self.values().clear();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store() -> (TempDir, FileKeyValueStore) {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let (_dir, store) = file_store();
        assert_eq!(store.get("auth-token").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_set_many_then_get_many() {
        let (_dir, store) = file_store();
        store
            .set_many(&[
                ("auth-token", "t1".to_string()),
                ("current-user", r#"{"id":5,"username":"bob"}"#.to_string()),
            ])
            .unwrap();

        let values = store.get_many(&["auth-token", "current-user"]).unwrap();
        assert_eq!(values[0].as_deref(), Some("t1"));
        assert_eq!(values[1].as_deref(), Some(r#"{"id":5,"username":"bob"}"#));
    }

    #[test]
    fn test_file_store_overwrites_existing_key() {
        let (_dir, store) = file_store();
        store.set_many(&[("auth-token", "old".to_string())]).unwrap();
        store.set_many(&[("auth-token", "new".to_string())]).unwrap();

        assert_eq!(store.get("auth-token").unwrap().as_deref(), Some("new"));
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.matches("auth-token").count(), 1);
    }

    #[test]
    fn test_file_store_remove_many() {
        let (_dir, store) = file_store();
        store
            .set_many(&[
                ("auth-token", "t1".to_string()),
                ("current-user", "{}".to_string()),
                ("other", "kept".to_string()),
            ])
            .unwrap();
        store.remove_many(&["auth-token", "current-user"]).unwrap();

        assert_eq!(store.get("auth-token").unwrap(), None);
        assert_eq!(store.get("current-user").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_store_removing_last_keys_deletes_file() {
        let (_dir, store) = file_store();
        store
            .set_many(&[
                ("auth-token", "t1".to_string()),
                ("current-user", "{}".to_string()),
            ])
            .unwrap();
        store.remove_many(&["auth-token", "current-user"]).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_remove_deletes_corrupt_file() {
        let (_dir, store) = file_store();
        fs::write(store.path(), "auth-token \"unterminated").unwrap();
        store.remove_many(&["auth-token", "current-user"]).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_remove_without_file_is_noop() {
        let (_dir, store) = file_store();
        store.remove_many(&["auth-token"]).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_corrupt_file_is_replaced_on_write() {
        let (_dir, store) = file_store();
        fs::write(store.path(), "auth-token \"unterminated").unwrap();
        assert!(store.get("auth-token").is_err());

        store.set_many(&[("auth-token", "t2".to_string())]).unwrap();
        assert_eq!(store.get("auth-token").unwrap().as_deref(), Some("t2"));
    }

    #[test]
    fn test_file_store_purge() {
        let (_dir, store) = file_store();
        store.set_many(&[("auth-token", "t1".to_string())]).unwrap();
        store.purge().unwrap();
        assert!(!store.path().exists());
        // Purging twice is fine
        store.purge().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_writes_0600() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = file_store();
        store.set_many(&[("auth-token", "secret".to_string())]).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, SESSION_FILE_MODE);
    }

    #[test]
    fn test_file_store_escapes_json_values() {
        let (_dir, store) = file_store();
        let json = r#"{"id":5,"username":"bo\"b"}"#.to_string();
        store.set_many(&[("current-user", json.clone())]).unwrap();
        assert_eq!(store.get("current-user").unwrap(), Some(json));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        store.set_many(&[("a", "1".to_string()), ("b", "2".to_string())]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove_many(&["a"]).unwrap();
        assert_eq!(store.get_many(&["a", "b"]).unwrap(), vec![None, Some("2".to_string())]);
        store.purge().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.location(), "memory");
    }
}
