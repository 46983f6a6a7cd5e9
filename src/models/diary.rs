use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single diary record, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    #[sqlx(rename = "userId")]
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    #[sqlx(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[sqlx(rename = "createdAt")]
    #[serde(serialize_with = "serialize_utc_millis")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    #[serde(serialize_with = "serialize_utc_millis")]
    pub updated_at: DateTime<Utc>,
}

impl DiaryEntry {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Fields the service hands to an entry store; the store fills in
/// the id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
}

fn serialize_utc_millis<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    dt.to_rfc3339_opts(SecondsFormat::Millis, true).serialize(serializer)
}
