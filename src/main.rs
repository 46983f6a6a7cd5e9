mod auth;
mod config;
mod db;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod services;
mod startup;
mod storage;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use auth::IdentityVerifier;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

use config::EntryStoreKind;
use db::{EntryStore, MemoryEntryStore, PgEntryStore};
use services::DiaryService;
use storage::LocalBlobStore;

#[derive(Clone)]
pub struct AppState {
    pub diary: DiaryService,
    /// `None` when no identity provider is configured.
    pub identity: Option<Arc<dyn IdentityVerifier>>,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,diary_axum=debug,tower_http=debug".into());

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    let entries: Arc<dyn EntryStore> = match &config.entry_store {
        EntryStoreKind::Postgres { database_url } => {
            let pool = db::create_pool(database_url).await.map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                e
            })?;
            db::pool::run_migrations(&pool).await.map_err(|e| {
                tracing::error!("Failed to apply migrations: {}", e);
                e
            })?;
            tracing::info!("Database pool created successfully");
            Arc::new(PgEntryStore::new(pool))
        }
        EntryStoreKind::Memory => {
            tracing::warn!("Using in-memory entry store; entries are lost on restart");
            Arc::new(MemoryEntryStore::new())
        }
    };

    let blobs = LocalBlobStore::open(&config.upload_dir).await.map_err(|e| {
        tracing::error!(dir = %config.upload_dir.display(), "Failed to open upload directory: {}", e);
        e
    })?;
    tracing::info!(dir = %blobs.root().display(), "Upload directory ready");

    let identity: Option<Arc<dyn IdentityVerifier>> = match &config.firebase_project_id {
        Some(project_id) => {
            tracing::info!(project_id = %project_id, "Firebase token verification enabled");
            Some(Arc::new(auth::FirebaseVerifier::new(
                project_id,
                &config.firebase_jwks_url,
            )))
        }
        None => {
            tracing::warn!("FIREBASE_PROJECT_ID not set; diary routes will answer 503");
            None
        }
    };

    let metrics_state = Arc::new(handlers::setup_metrics_recorder()?);
    tracing::info!("Metrics recorder initialized");

    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState {
        diary: DiaryService::new(entries, Arc::new(blobs)),
        identity,
        config,
        metrics: metrics_state,
    });

    let app = startup::build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
