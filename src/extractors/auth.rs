use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::future::Future;
use std::sync::Arc;

use crate::{AppError, AppState};

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(parts: &Parts) -> Option<String> {
    let auth_str = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// The verified principal of a request. Handlers taking this argument only
/// run once the bearer token has been checked by the identity verifier.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = extract_bearer_token(parts);
        let verifier = state.identity.clone();

        async move {
            let verifier = verifier.ok_or(AppError::AuthNotConfigured)?;

            let token = token.ok_or_else(|| {
                AppError::Unauthorized("Missing or invalid authorization header".to_string())
            })?;

            let user_id = verifier.verify(&token).await.map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::Unauthorized(e.to_string())
            })?;

            Ok(AuthenticatedUser { user_id })
        }
    }
}
