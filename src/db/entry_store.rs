use async_trait::async_trait;

use crate::models::{DiaryEntry, NewEntry};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("entry {0} not found")]
    NotFound(String),

    #[error("entry store query failed: {0}")]
    Query(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence of diary entries. Holds no business rules: ownership is
/// enforced by the diary service on top of this contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist a new entry, generating its id and timestamps.
    async fn insert(&self, entry: NewEntry) -> Result<DiaryEntry, PersistenceError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<DiaryEntry>, PersistenceError>;

    /// All entries owned by `user_id`, newest first.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<DiaryEntry>, PersistenceError>;

    /// Remove an entry; `PersistenceError::NotFound` if no row matched.
    async fn delete_by_id(&self, id: &str) -> Result<(), PersistenceError>;
}
