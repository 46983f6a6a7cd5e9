//! Helpers for driving the full router in tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{
    auth::VerifyError,
    db::MemoryEntryStore,
    services::DiaryService,
    startup::build_router,
    storage::LocalBlobStore,
    AppConfig, AppState, IdentityVerifier, MetricsState,
};

pub const BOUNDARY: &str = "diary-test-boundary";

/// Accepts a fixed set of tokens, each mapped to a user id.
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(token, user)| (token.to_string(), user.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::Rejected("unknown test token".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub upload_dir: tempfile::TempDir,
}

/// Router over a memory store with tokens `alice-token` and `bob-token`.
pub async fn test_app() -> TestApp {
    let verifier = StaticVerifier::new(&[("alice-token", "alice"), ("bob-token", "bob")]);
    test_app_with(Some(Arc::new(verifier))).await
}

pub async fn test_app_with(identity: Option<Arc<dyn IdentityVerifier>>) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let upload_path = upload_dir.path().display().to_string();

    let config = AppConfig::from_lookup(|key| match key {
        "ENTRY_STORE" => Some("memory".to_string()),
        "UPLOAD_DIR" => Some(upload_path.clone()),
        "MAX_UPLOAD_BYTES" => Some("4096".to_string()),
        _ => None,
    })
    .unwrap();

    let blobs = LocalBlobStore::open(&config.upload_dir).await.unwrap();
    let metrics = MetricsState {
        handle: PrometheusBuilder::new().build_recorder().handle(),
    };

    let state = Arc::new(AppState {
        diary: DiaryService::new(Arc::new(MemoryEntryStore::new()), Arc::new(blobs)),
        identity,
        config,
        metrics: Arc::new(metrics),
    });

    TestApp {
        router: build_router(state),
        upload_dir,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse { status, headers, body }
}

/// One multipart part: name, optional file name, payload.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn create_request(token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/diary/entries")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
