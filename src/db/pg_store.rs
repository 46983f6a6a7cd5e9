use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EntryStore, PersistenceError};
use crate::models::{DiaryEntry, NewEntry};

// Same order as `MemoryEntryStore`: newest first, later inserts first on ties.
const LIST_BY_USER_SQL: &str =
    r#"SELECT * FROM "DiaryEntry" WHERE "userId" = $1 ORDER BY "createdAt" DESC, "seq" DESC"#;

/// Entry store backed by PostgreSQL. Owns the connection pool; every
/// operation checks a connection out for the duration of one query.
#[derive(Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn insert(&self, entry: NewEntry) -> Result<DiaryEntry, PersistenceError> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, DiaryEntry>(
            r#"
            INSERT INTO "DiaryEntry" ("id", "userId", "title", "content", "imageUrl", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(&entry.image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DiaryEntry>, PersistenceError> {
        let entry = sqlx::query_as::<_, DiaryEntry>(r#"SELECT * FROM "DiaryEntry" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<DiaryEntry>, PersistenceError> {
        let entries = sqlx::query_as::<_, DiaryEntry>(LIST_BY_USER_SQL)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), PersistenceError> {
        let result = sqlx::query(r#"DELETE FROM "DiaryEntry" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
