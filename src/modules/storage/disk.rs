//! Local-disk file storage
//!
//! Uploaded files are stored flat under the configured upload directory.
//! The stored filename is generated (`{uuid}.{ext}`); the original upload
//! name is never used on disk.

use std::path::PathBuf;

use tokio::fs::{self, File};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Create the storage, ensuring the upload directory exists.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory {}: {}",
                config.upload_dir.display(),
                e
            ))
        })?;

        info!("Upload directory ready: {}", config.upload_dir.display());

        Ok(Self {
            root: config.upload_dir.clone(),
        })
    }

    /// Write file bytes and return the generated filename.
    ///
    /// No rollback ties this write to the media record insert; a write that
    /// succeeds while the insert fails leaves an unreferenced file behind.
    pub async fn store(&self, data: &[u8], extension: &str) -> Result<String> {
        let filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.root.join(&filename);

        fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;

        debug!("Stored upload: {} ({} bytes)", filename, data.len());

        Ok(filename)
    }

    /// Open a stored file for streaming. Filenames that try to escape the
    /// upload directory are treated as not found.
    pub async fn open(&self, filename: &str) -> Result<File> {
        if !is_safe_filename(filename) {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        let path = self.root.join(filename);
        match File::open(&path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(AppError::Internal(format!("Failed to open file: {}", e))),
        }
    }
}

fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_storage() -> DiskStorage {
        let dir = std::env::temp_dir().join(format!("galeri-test-{}", Uuid::new_v4().simple()));
        DiskStorage::new(&StorageConfig { upload_dir: dir })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn store_generates_unique_name_with_extension() {
        let storage = temp_storage().await;

        let a = storage.store(b"first", "png").await.unwrap();
        let b = storage.store(b"second", "png").await.unwrap();

        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn open_round_trips_stored_bytes() {
        use tokio::io::AsyncReadExt;

        let storage = temp_storage().await;
        let name = storage.store(b"payload", "gif").await.unwrap();

        let mut file = storage.open(&name).await.unwrap();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"payload");
    }

    #[tokio::test]
    async fn open_missing_or_unsafe_is_not_found() {
        let storage = temp_storage().await;

        assert!(matches!(
            storage.open("nope.png").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            storage.open("../etc/passwd").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            storage.open("a/b.png").await,
            Err(AppError::NotFound(_))
        ));
    }
}
