use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Image attached to a create request, as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Input for creating a diary entry
#[derive(Debug, Clone, Default)]
pub struct CreateEntryInput {
    pub content: Option<String>,
    pub title: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Multipart form accepted by `POST /api/diary/entries`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateEntryForm {
    pub content: String,
    pub title: Option<String>,
    /// png, jpg, jpeg, gif or webp
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Response for diary mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiaryMutationResponse {
    pub message: String,
}
