use async_trait::async_trait;

use super::{jwks::JwksCache, jwt::validate_jwt};

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("{0}")]
    Rejected(String),
}

/// Turns a bearer token into a stable user id.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, VerifyError>;
}

/// Verifies Firebase ID tokens for one project.
pub struct FirebaseVerifier {
    jwks_cache: JwksCache,
    project_id: String,
    issuer: String,
}

impl FirebaseVerifier {
    pub fn new(project_id: &str, jwks_url: &str) -> Self {
        Self {
            jwks_cache: JwksCache::new(jwks_url),
            project_id: project_id.to_string(),
            issuer: format!("https://securetoken.google.com/{}", project_id),
        }
    }

    #[cfg(test)]
    fn with_cache(project_id: &str, jwks_cache: JwksCache) -> Self {
        Self {
            jwks_cache,
            project_id: project_id.to_string(),
            issuer: format!("https://securetoken.google.com/{}", project_id),
        }
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        let claims = validate_jwt(token, &self.jwks_cache, &self.issuer, &self.project_id)
            .await
            .map_err(VerifyError::Rejected)?;

        Ok(claims.sub)
    }
}
