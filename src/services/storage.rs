use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

pub const PRODUCT_PHOTO_DIR: &str = "defaultProductPhotos";
pub const ITEM_PHOTO_DIR: &str = "productItemPhotos";

/// Filesystem storage for uploaded photos. Paths handed out to the rest of
/// the system are always relative to the upload root, so the root can move
/// between environments.
#[derive(Clone)]
pub struct StorageService {
    root: Arc<PathBuf>,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    /// Persist uploaded bytes under `subdir` with a generated name, keeping
    /// the original extension. Returns the relative path to store in the DB.
    #[instrument(skip(self, bytes))]
    pub async fn save(
        &self,
        subdir: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let relative = format!("{}/{}", subdir, filename);

        let dir = self.root.join(subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::StorageError(format!("create {}: {}", dir.display(), e)))?;

        let full = self.root.join(&relative);
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| ServiceError::StorageError(format!("write {}: {}", full.display(), e)))?;

        Ok(relative)
    }

    /// Remove a previously stored file. Cleanup is best-effort; a missing
    /// file only logs a warning since the DB record is already going away.
    #[instrument(skip(self))]
    pub async fn delete(&self, relative: &str) {
        let full = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&full).await {
            warn!("Failed to delete stored file {}: {}", full.display(), e);
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path());

        let rel = storage
            .save(PRODUCT_PHOTO_DIR, "photo.png", b"not really a png")
            .await
            .unwrap();
        assert!(rel.starts_with(PRODUCT_PHOTO_DIR));
        assert!(rel.ends_with(".png"));
        assert!(dir.path().join(&rel).exists());

        storage.delete(&rel).await;
        assert!(!dir.path().join(&rel).exists());
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageService::new(dir.path());
        storage.delete("productItemPhotos/gone.png").await;
    }
}
