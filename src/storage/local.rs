use async_trait::async_trait;
use axum::body::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::{BlobError, BlobStore, UPLOADS_PREFIX};

/// Blob store writing one file per blob into a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open (and create if needed) the upload directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A key must be a single plain file name.
fn checked_key(key: &str) -> Result<&str, BlobError> {
    let plain = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\', '\0']);

    if plain {
        Ok(key)
    } else {
        Err(BlobError::InvalidName(key.to_string()))
    }
}

/// Map a reference such as `/uploads/abc.png` back to its file name.
fn key_from_reference(reference: &str) -> Result<&str, BlobError> {
    let tail = reference.rsplit('/').next().unwrap_or(reference);
    checked_key(tail)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(&self, key: &str, bytes: Bytes) -> Result<String, BlobError> {
        let key = checked_key(key)?;
        let path = self.root.join(key);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => BlobError::AlreadyExists(key.to_string()),
                _ => BlobError::Io(e),
            })?;

        if let Err(e) = write_all(&mut file, &bytes).await {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }

        tracing::debug!(key, size = bytes.len(), "Blob saved");
        Ok(format!("{UPLOADS_PREFIX}{key}"))
    }

    async fn delete(&self, reference: &str) -> Result<(), BlobError> {
        let key = key_from_reference(reference)?;

        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                tracing::debug!(key, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key, "Blob already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}
