//! Persistence backends for actor-managed collections.
//!
//! A [`ResourceActor`](crate::framework::ResourceActor) owns its collection in
//! memory and hands the whole thing to an [`EntityStorage`] after every
//! mutation. This is the "local storage" of the storefront: best effort, one
//! writer, no transactions.
//!
//! - [`JsonFileStorage`] keeps the collection as a single JSON array on disk.
//! - [`MemoryStorage`] keeps it in process, which is what the tests use.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Failures at the storage seam.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored data could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage is unavailable")]
    Unavailable,
}

/// Loads and saves a whole collection of `T`.
#[async_trait]
pub trait EntityStorage<T>: Send + Sync + 'static
where
    T: Send + Sync,
{
    /// Reads every stored item, in the order they were saved.
    async fn load(&self) -> Result<Vec<T>, StorageError>;

    /// Replaces the stored collection with `items`.
    async fn save(&self, items: &[&T]) -> Result<(), StorageError>;
}

/// Stores the collection as one JSON document.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// target, so a reader never sees half a document.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl<T> EntityStorage<T> for JsonFileStorage
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn load(&self) -> Result<Vec<T>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, items: &[&T]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(items)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), count = items.len(), "Saved");
        Ok(())
    }
}

/// In-process storage.
///
/// Clones share the same contents, so a test can keep one handle and give
/// another to an actor. [`MemoryStorage::set_available`] simulates the backing
/// store going away.
#[derive(Debug)]
pub struct MemoryStorage<T> {
    items: Arc<Mutex<Vec<T>>>,
    available: Arc<AtomicBool>,
}

impl<T> Clone for MemoryStorage<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            available: Arc::clone(&self.available),
        }
    }
}

impl<T> Default for MemoryStorage<T> {
    fn default() -> Self {
        Self::with_items(Vec::new())
    }
}

impl<T> MemoryStorage<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// While unavailable, both loads and saves fail.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl<T: Clone> MemoryStorage<T> {
    /// What was last saved.
    pub fn snapshot(&self) -> Vec<T> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T> EntityStorage<T> for MemoryStorage<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, StorageError> {
        self.check_available()?;
        let items = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(items.clone())
    }

    async fn save(&self, items: &[&T]) -> Result<(), StorageError> {
        self.check_available()?;
        let mut stored = self.items.lock().map_err(|_| StorageError::Unavailable)?;
        *stored = items.iter().map(|item| (*item).clone()).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("items.json"));

        let items = vec!["a".to_string(), "b".to_string()];
        let refs: Vec<&String> = items.iter().collect();
        storage.save(&refs).await.unwrap();

        let loaded: Vec<String> = storage.load().await.unwrap();
        assert_eq!(loaded, items);
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_json_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));

        let loaded: Vec<String> = storage.load().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_json_file_corrupt_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let storage = JsonFileStorage::new(path);
        let result: Result<Vec<String>, _> = storage.load().await;
        assert!(matches!(result, Err(StorageError::Serde(_))));
    }

    #[tokio::test]
    async fn test_memory_storage_shares_state_and_fails_on_demand() {
        let storage = MemoryStorage::<u32>::new();
        let handle = storage.clone();

        storage.save(&[&1, &2]).await.unwrap();
        assert_eq!(handle.snapshot(), vec![1, 2]);

        handle.set_available(false);
        assert!(matches!(storage.save(&[&3]).await, Err(StorageError::Unavailable)));
        assert!(matches!(storage.load().await, Err(StorageError::Unavailable)));
        assert_eq!(handle.snapshot(), vec![1, 2]);
    }
}
