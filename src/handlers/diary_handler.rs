use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    error::ErrorBody,
    extractors::AuthenticatedUser,
    models::{CreateEntryForm, CreateEntryInput, DiaryEntry, DiaryMutationResponse, ImageUpload},
    AppError, AppResult, AppState,
};

/// POST /api/diary/entries - Create a diary entry with an optional image
#[utoipa::path(
    post,
    path = "/api/diary/entries",
    request_body(content = CreateEntryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Diary entry created", body = DiaryEntry),
        (status = 400, description = "Missing content or disallowed image type", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 503, description = "Authentication not configured", body = ErrorBody),
        (status = 500, description = "Storage or database failure", body = ErrorBody)
    ),
    tag = "diary",
    security(("bearer_auth" = []))
)]
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<DiaryEntry>)> {
    let multipart = multipart
        .map_err(|e| AppError::Validation(format!("Expected a multipart form: {}", e)))?;
    let input = read_create_form(multipart).await?;

    let entry = state.diary.create_entry(&auth.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/diary/entries - All entries of the caller, newest first
#[utoipa::path(
    get,
    path = "/api/diary/entries",
    responses(
        (status = 200, description = "Caller's diary entries, newest first", body = Vec<DiaryEntry>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    ),
    tag = "diary",
    security(("bearer_auth" = []))
)]
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let entries = state.diary.list_entries(&auth.user_id).await?;
    Ok(Json(entries))
}

/// GET /api/diary/entries/{id}
#[utoipa::path(
    get,
    path = "/api/diary/entries/{id}",
    params(
        ("id" = String, Path, description = "Diary entry ID")
    ),
    responses(
        (status = 200, description = "The diary entry", body = DiaryEntry),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Entry belongs to another user", body = ErrorBody),
        (status = 404, description = "Diary entry not found", body = ErrorBody)
    ),
    tag = "diary",
    security(("bearer_auth" = []))
)]
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(entry_id): Path<String>,
) -> AppResult<Json<DiaryEntry>> {
    let entry = state.diary.get_entry(&auth.user_id, &entry_id).await?;
    Ok(Json(entry))
}

/// DELETE /api/diary/entries/{id} - Delete an entry and its image
#[utoipa::path(
    delete,
    path = "/api/diary/entries/{id}",
    params(
        ("id" = String, Path, description = "Diary entry ID")
    ),
    responses(
        (status = 200, description = "Diary entry deleted", body = DiaryMutationResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Entry belongs to another user", body = ErrorBody),
        (status = 404, description = "Diary entry not found", body = ErrorBody)
    ),
    tag = "diary",
    security(("bearer_auth" = []))
)]
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(entry_id): Path<String>,
) -> AppResult<Json<DiaryMutationResponse>> {
    state.diary.delete_entry(&auth.user_id, &entry_id).await?;

    Ok(Json(DiaryMutationResponse {
        message: "Diary entry deleted successfully".to_string(),
    }))
}

async fn read_create_form(mut multipart: Multipart) -> AppResult<CreateEntryInput> {
    let mut input = CreateEntryInput::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "content" => input.content = Some(field.text().await.map_err(invalid_form)?),
            "title" => input.title = Some(field.text().await.map_err(invalid_form)?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_form)?;

                // Browsers send an empty part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                input.image = Some(ImageUpload { file_name, bytes });
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(input)
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}
