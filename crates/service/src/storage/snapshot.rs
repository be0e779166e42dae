use std::{marker::PhantomData, path::PathBuf};
use tokio::fs;

use crate::errors::ServiceError;

/// JSON file-backed snapshot of an entire collection.
///
/// Holds no lock and no in-memory state besides the target path: the owning
/// store keeps the authoritative collection and hands the full slice to
/// [`save`](Self::save) after each mutation. Intended for small datasets
/// where a database is overkill.
#[derive(Clone)]
pub struct JsonSnapshot<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonSnapshot<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Point the snapshot at a path. The parent directory is created
    /// best-effort; the file itself is first written on the first `save`.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.ok();
        }
        Self { path, _marker: PhantomData }
    }

    /// Load the persisted collection.
    ///
    /// An absent or unreadable file yields an empty collection, as does
    /// malformed content. Load never fails the caller.
    pub async fn load(&self) -> Vec<T> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Serialize the whole collection and overwrite the file in one write
    /// call. No fsync, no temp-file rename.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(items).map_err(|e| ServiceError::Persistence(e.to_string()))?;
        fs::write(&self.path, data)
            .await
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        Ok(())
    }
}
