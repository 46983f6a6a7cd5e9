//! Ownership rules and create/delete sequencing for diary entries.
//!
//! Every operation takes the verified principal. Entries are only ever
//! returned to, listed for, or deleted by their owner. On create the image
//! is stored before the row is inserted; on delete the image removal is
//! best effort and the row removal is authoritative.

use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{EntryStore, PersistenceError},
    models::{CreateEntryInput, DiaryEntry, ImageUpload, NewEntry},
    storage::BlobStore,
    AppError, AppResult,
};

const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Clone)]
pub struct DiaryService {
    entries: Arc<dyn EntryStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DiaryService {
    pub fn new(entries: Arc<dyn EntryStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { entries, blobs }
    }

    pub async fn create_entry(
        &self,
        user_id: &str,
        input: CreateEntryInput,
    ) -> AppResult<DiaryEntry> {
        let content = input
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Validation("Content is required".to_string()))?;
        let title = input.title.filter(|t| !t.is_empty());

        // Reject a bad upload before anything is written.
        let image = input
            .image
            .map(|image| prepare_image(user_id, image))
            .transpose()?;

        let image_url = match image {
            Some((key, bytes)) => Some(self.blobs.save(&key, bytes).await?),
            None => None,
        };

        let new_entry = NewEntry {
            user_id: user_id.to_string(),
            title,
            content,
            image_url,
        };
        let orphan = new_entry.image_url.clone();

        let entry = match self.entries.insert(new_entry).await {
            Ok(entry) => entry,
            Err(e) => {
                if let Some(image_url) = orphan {
                    tracing::warn!(user_id, image_url = %image_url, "Entry insert failed after image was stored, blob orphaned");
                }
                return Err(e.into());
            }
        };

        counter!("diary_entries_created_total").increment(1);
        tracing::info!(
            user_id,
            entry_id = %entry.id,
            has_image = entry.image_url.is_some(),
            "Diary entry created"
        );

        Ok(entry)
    }

    pub async fn list_entries(&self, user_id: &str) -> AppResult<Vec<DiaryEntry>> {
        let entries = self.entries.find_by_user(user_id).await?;
        tracing::debug!(user_id, count = entries.len(), "Listed diary entries");
        Ok(entries)
    }

    pub async fn get_entry(&self, user_id: &str, entry_id: &str) -> AppResult<DiaryEntry> {
        self.find_owned(user_id, entry_id, "view").await
    }

    pub async fn delete_entry(&self, user_id: &str, entry_id: &str) -> AppResult<()> {
        let entry = self.find_owned(user_id, entry_id, "delete").await?;

        if let Some(image_url) = &entry.image_url {
            if let Err(e) = self.blobs.delete(image_url).await {
                counter!("diary_blob_delete_failures_total").increment(1);
                tracing::warn!(error = %e, entry_id, image_url = %image_url, "Failed to delete entry image");
            }
        }

        match self.entries.delete_by_id(&entry.id).await {
            Ok(()) => {}
            Err(PersistenceError::NotFound(_)) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }

        counter!("diary_entries_deleted_total").increment(1);
        tracing::info!(user_id, entry_id, "Diary entry deleted");

        Ok(())
    }

    /// Existence is checked before ownership so that callers can tell a
    /// missing entry from someone else's.
    async fn find_owned(&self, user_id: &str, entry_id: &str, action: &str) -> AppResult<DiaryEntry> {
        let entry = self
            .entries
            .find_by_id(entry_id)
            .await?
            .ok_or_else(not_found)?;

        if !entry.is_owned_by(user_id) {
            tracing::warn!(user_id, entry_id, action, "Access to foreign diary entry denied");
            return Err(AppError::Forbidden(format!(
                "Access denied: You can only {} your own diary entries",
                action
            )));
        }

        Ok(entry)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Diary entry not found".to_string())
}

fn prepare_image(user_id: &str, image: ImageUpload) -> AppResult<(String, axum::body::Bytes)> {
    let extension = allowed_extension(&image.file_name)?;
    Ok((storage_key(user_id, &extension), image.bytes))
}

/// Lowercased extension of `file_name` if it is an accepted image type.
fn allowed_extension(file_name: &str) -> AppResult<String> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "File type not allowed: expected one of {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

    Ok(extension)
}

/// `<user>_<uuid>.<ext>`, unique per upload and safe as a file name.
fn storage_key(user_id: &str, extension: &str) -> String {
    let owner: String = user_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let owner = if owner.is_empty() { "user".to_string() } else { owner };

    format!("{}_{}.{}", owner, Uuid::new_v4(), extension)
}
