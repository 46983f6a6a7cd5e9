use jsonwebtoken::{
    jwk::{Jwk, JwkSet},
    DecodingKey,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Google's public keys for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

pub struct JwksCache {
    cache: Cache<String, Arc<JwkSet>>,
    jwks_url: String,
}

impl JwksCache {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(3600)) // 1 hour TTL
            .build();

        Self {
            cache,
            jwks_url: jwks_url.into(),
        }
    }

    pub async fn get_jwks(&self) -> Result<Arc<JwkSet>, String> {
        if let Some(jwks) = self.cache.get(&self.jwks_url).await {
            return Ok(jwks);
        }

        self.fetch_jwks().await
    }

    async fn fetch_jwks(&self) -> Result<Arc<JwkSet>, String> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = reqwest::get(&self.jwks_url)
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("JWKS endpoint returned {}", response.status()));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS: {}", e))?;

        let jwks_arc = Arc::new(jwks);
        self.cache.insert(self.jwks_url.clone(), jwks_arc.clone()).await;

        Ok(jwks_arc)
    }

    /// Looks up `kid`, refetching the key set once when it is unknown.
    /// Google rotates the signing keys well inside the cache TTL.
    pub async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, String> {
        let cached = self.get_jwks().await?;
        let jwks = if find_key(&cached, kid).is_some() {
            cached
        } else {
            tracing::debug!(kid = %kid, "Unknown kid, refreshing JWKS");
            self.cache.invalidate(&self.jwks_url).await;
            self.fetch_jwks().await?
        };

        let jwk = find_key(&jwks, kid).ok_or_else(|| format!("No key found with kid: {}", kid))?;

        DecodingKey::from_jwk(jwk).map_err(|e| format!("Failed to create decoding key: {}", e))
    }

    #[cfg(test)]
    pub async fn with_keys(jwks_url: impl Into<String>, jwks: JwkSet) -> Self {
        let cache = Self::new(jwks_url);
        cache.cache.insert(cache.jwks_url.clone(), Arc::new(jwks)).await;
        cache
    }
}

fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys.iter().find(|k| k.common.key_id.as_deref() == Some(kid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_keys::{jwk_set, TEST_KID};
    use axum::{routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn serve_jwks(jwks: JwkSet) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/jwks.json",
            get(move || {
                let jwks = jwks.clone();
                async move { Json(jwks) }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/jwks.json")
    }

    #[tokio::test]
    async fn test_seeded_key_is_used_without_fetching() {
        let cache = JwksCache::with_keys("http://127.0.0.1:9/jwks.json", jwk_set(TEST_KID)).await;

        assert!(cache.get_decoding_key(TEST_KID).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_kid_refreshes_rotated_keys() {
        let url = serve_jwks(jwk_set("rotated-key")).await;
        let cache = JwksCache::with_keys(url, jwk_set("retired-key")).await;

        assert!(cache.get_decoding_key("rotated-key").await.is_ok());
        let refreshed = cache.get_jwks().await.unwrap();
        assert_eq!(refreshed.keys[0].common.key_id.as_deref(), Some("rotated-key"));
    }

    #[tokio::test]
    async fn test_kid_missing_after_refresh_is_rejected() {
        let url = serve_jwks(jwk_set(TEST_KID)).await;
        let cache = JwksCache::with_keys(url, jwk_set(TEST_KID)).await;

        let err = cache.get_decoding_key("someone-elses-key").await.err().unwrap();

        assert!(err.contains("No key found with kid"));
    }
}
