use async_trait::async_trait;
use axum::body::Bytes;

/// URL path under which stored blobs are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("invalid blob name: {0:?}")]
    InvalidName(String),

    #[error("blob {0} already exists")]
    AlreadyExists(String),

    #[error("blob I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for image blobs referenced from diary entries.
///
/// Keys are chosen by the caller; the store only persists bytes under them
/// and hands back the URL path the blob is reachable at.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` under `key`, returning the blob's reference.
    async fn save(&self, key: &str, bytes: Bytes) -> Result<String, BlobError>;

    /// Remove the blob behind `reference`. Missing blobs are not an error.
    async fn delete(&self, reference: &str) -> Result<(), BlobError>;
}
