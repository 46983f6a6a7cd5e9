use axum::Json;
use serde_json::{json, Value};

use crate::AppError;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check OK")
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner")
    ),
    tag = "health"
)]
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Personal Diary API",
        "status": "running"
    }))
}

pub async fn not_found_fallback() -> AppError {
    AppError::NotFound("Not found".to_string())
}
