//! On-device key/value storage
//!
//! The local note store and the session holder both persist plain strings
//! under string keys. [`FileKeyValueStore`] keeps one file per key inside a
//! data directory; [`MemoryKeyValueStore`] keeps everything in a map and is
//! what tests and throwaway sessions use.

use crate::error::{ErrorContext, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for string key/value storage backends
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key succeeds
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn contains(&self, key: &str) -> Result<bool> {
        self.get(key).await.map(|value| value.is_some())
    }
}

/// In-memory key/value storage
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// File system key/value storage, one file per key
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `base_path`; the directory is created lazily
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the value files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_key(key)))
    }

    async fn ensure_directory_exists(&self) -> Result<()> {
        if !self.base_path.exists() {
            tokio::fs::create_dir_all(&self.base_path)
                .await
                .with_context(|| {
                    format!("Failed to create data directory {}", self.base_path.display())
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_directory_exists().await?;

        let path = self.key_path(key);
        // Write-then-rename so a crash never leaves a half-written value
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// Encode a key as a file name: `[A-Za-z0-9@._+-]` pass through, every other
/// byte becomes `%XX`. The mapping is injective, so distinct keys never share
/// a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'@' | b'.' | b'_' | b'+' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    // "." and ".." are not usable file names
    if encoded.chars().all(|c| c == '.') {
        encoded = encoded.replace('.', "%2E");
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileKeyValueStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("data"));
        (store, temp_dir)
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("notes_ada@example.com"), "notes_ada@example.com");
        assert_eq!(encode_key("a/b"), "a%2Fb");
        assert_eq!(encode_key("a%2Fb"), "a%252Fb");
        assert_eq!(encode_key("a b"), "a%20b");
        assert_eq!(encode_key(".."), "%2E%2E");
        assert_eq!(encode_key("é"), "%C3%A9");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len().await, 1);

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(!store.contains("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryKeyValueStore::new();
        let clone = store.clone();
        store.set("shared", "yes").await.unwrap();
        assert_eq!(clone.get("shared").await.unwrap().as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_file_store_missing_key() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.get("nothing").await.unwrap(), None);
        assert!(!store.base_path().exists());
    }

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let (store, _temp_dir) = create_test_store();

        store.set("notes_a@b.c", "[]").await.unwrap();
        assert!(store.key_path("notes_a@b.c").exists());
        assert_eq!(store.get("notes_a@b.c").await.unwrap().as_deref(), Some("[]"));

        store.set("notes_a@b.c", "[1]").await.unwrap();
        assert_eq!(store.get("notes_a@b.c").await.unwrap().as_deref(), Some("[1]"));

        store.remove("notes_a@b.c").await.unwrap();
        assert_eq!(store.get("notes_a@b.c").await.unwrap(), None);
        store.remove("notes_a@b.c").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_keys_do_not_collide() {
        let (store, _temp_dir) = create_test_store();

        store.set("a/b", "slash").await.unwrap();
        store.set("a%2Fb", "literal").await.unwrap();

        assert_eq!(store.get("a/b").await.unwrap().as_deref(), Some("slash"));
        assert_eq!(store.get("a%2Fb").await.unwrap().as_deref(), Some("literal"));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let (store, temp_dir) = create_test_store();
        store.set("notebook_user", "{}").await.unwrap();

        let reopened = FileKeyValueStore::new(temp_dir.path().join("data"));
        assert_eq!(reopened.get("notebook_user").await.unwrap().as_deref(), Some("{}"));
    }
}
