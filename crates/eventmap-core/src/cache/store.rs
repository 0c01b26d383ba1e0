use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::{CacheError, Result};

/// Persistent key-value storage holding serialized values.
///
/// Writes to the same key are last-write-wins; no conflict detection.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Returns `None` if the key was never written (or was removed).
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Remove every listed key. Keys that are absent are skipped.
    async fn multi_remove(&self, keys: &[&str]) -> Result<()>;
}

/// Sequence for temporary file names, unique per write within the process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Validate a key before it is used to address storage
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidKey(key.to_string()))
    }
}

/// File-backed store: one `<key>.json` file per key.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.cache_dir.join(format!("{}.json", key)))
    }

    /// Total size in bytes of all cached entries
    pub async fn size_on_disk(&self) -> Result<u64> {
        let mut total = 0;
        let mut entries = tokio::fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                total += entry.metadata().await?.len();
            }
        }
        Ok(total)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let path = self.cache_path(key)?;
        // Each write gets its own sibling file; the rename makes it visible whole
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .cache_dir
            .join(format!(".{}.{}.{}.tmp", key, std::process::id(), seq));
        let written = match tokio::fs::write(&tmp, value).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(key = key, "Cache entry written");
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.cache_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        let paths = keys
            .iter()
            .map(|key| self.cache_path(key))
            .collect::<Result<Vec<_>>>()?;
        for (key, path) in keys.iter().zip(paths) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(key = *key, "Cache entry removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// In-process store. Contents are lost when dropped.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            validate_key(key)?;
        }
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("userInfo").is_ok());
        assert!(validate_key("access_token-2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cache")).unwrap();

        assert_eq!(store.get_item("userInfo").await.unwrap(), None);

        store
            .set_item("userInfo", r#"{"id":"1"}"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get_item("userInfo").await.unwrap().as_deref(),
            Some(r#"{"id":"1"}"#)
        );
        assert!(dir.path().join("cache").join("userInfo.json").exists());

        store.multi_remove(&["userInfo", "neverWritten"]).await.unwrap();
        assert_eq!(store.get_item("userInfo").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            store.set_item("accessToken", "\"t\"".to_string()).await.unwrap();
        }
        let reopened = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.get_item("accessToken").await.unwrap().as_deref(),
            Some("\"t\"")
        );
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let err = store.set_item("../escape", "1".to_string()).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_file_store_size_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.size_on_disk().await.unwrap(), 0);

        store.set_item("a", "1234".to_string()).await.unwrap();
        store.set_item("b", "12".to_string()).await.unwrap();
        assert_eq!(store.size_on_disk().await.unwrap(), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_writes_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());

        for round in 0..20 {
            let written: Vec<String> = (0..8)
                .map(|i| serde_json::json!({ "round": round, "pad": "x".repeat(i * 37) }).to_string())
                .collect();

            let tasks: Vec<_> = written
                .iter()
                .cloned()
                .map(|value| {
                    let store = std::sync::Arc::clone(&store);
                    tokio::spawn(async move { store.set_item("k", value).await })
                })
                .collect();
            for result in futures::future::join_all(tasks).await {
                result.unwrap().unwrap();
            }

            let stored = store.get_item("k").await.unwrap().unwrap();
            assert!(serde_json::from_str::<serde_json::Value>(&stored).is_ok());
            assert!(written.contains(&stored));
        }

        // No temporary files are left behind
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| e.as_ref().unwrap().path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_multi_remove_invalid_key_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file_store = FileStore::new(dir.path().to_path_buf()).unwrap();
        file_store.set_item("userInfo", "1".to_string()).await.unwrap();
        let err = file_store.multi_remove(&["userInfo", "../bad"]).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
        assert!(file_store.get_item("userInfo").await.unwrap().is_some());

        let memory = MemoryStore::new();
        memory.set_item("userInfo", "1".to_string()).await.unwrap();
        assert!(memory.multi_remove(&["userInfo", ""]).await.is_err());
        assert_eq!(memory.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set_item("k", "1".to_string()).await.unwrap();
        store.set_item("k", "2".to_string()).await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.len().await, 1);

        store.multi_remove(&["k"]).await.unwrap();
        assert!(store.is_empty().await);
    }
}
