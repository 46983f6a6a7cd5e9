pub mod blob_store;
pub mod local;

pub use blob_store::{BlobError, BlobStore, UPLOADS_PREFIX};
pub use local::LocalBlobStore;

#[cfg(test)]
pub use blob_store::MockBlobStore;
