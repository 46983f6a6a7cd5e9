use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{EntryStore, PersistenceError};
use crate::models::{DiaryEntry, NewEntry};

/// In-process entry store for running without a database.
///
/// Entries are kept in insertion order, so among entries sharing a
/// `createdAt` the most recently inserted one lists first.
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: Mutex<Vec<DiaryEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<DiaryEntry>>, PersistenceError> {
        self.entries
            .lock()
            .map_err(|_| PersistenceError::Query("memory store lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert(&self, entry: NewEntry) -> Result<DiaryEntry, PersistenceError> {
        let now = Utc::now();
        let created = DiaryEntry {
            id: Uuid::new_v4().to_string(),
            user_id: entry.user_id,
            title: entry.title,
            content: entry.content,
            image_url: entry.image_url,
            created_at: now,
            updated_at: now,
        };

        self.lock()?.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DiaryEntry>, PersistenceError> {
        Ok(self.lock()?.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<DiaryEntry>, PersistenceError> {
        let mut entries: Vec<DiaryEntry> = self
            .lock()?
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();

        // Stable sort keeps reverse-insertion order for equal timestamps.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), PersistenceError> {
        let mut entries = self.lock()?;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;

        entries.remove(index);
        Ok(())
    }
}
