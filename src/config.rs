use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::FIREBASE_JWKS_URL;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub enum EntryStoreKind {
    Postgres { database_url: String },
    Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub entry_store: EntryStoreKind,
    /// `None` leaves authentication unconfigured; guarded routes answer 503.
    pub firebase_project_id: Option<String>,
    pub firebase_jwks_url: String,
    pub upload_dir: PathBuf,
    pub cors_origins: CorsOrigins,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let entry_store = match lookup("ENTRY_STORE").as_deref().unwrap_or("postgres") {
            "postgres" => {
                let database_url = lookup("DATABASE_URL")
                    .ok_or_else(|| "DATABASE_URL must be set".to_string())?;
                EntryStoreKind::Postgres { database_url }
            }
            "memory" => EntryStoreKind::Memory,
            other => {
                return Err(format!(
                    "ENTRY_STORE must be 'postgres' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let firebase_project_id = lookup("FIREBASE_PROJECT_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let firebase_jwks_url =
            lookup("FIREBASE_JWKS_URL").unwrap_or_else(|| FIREBASE_JWKS_URL.to_string());

        let upload_dir = PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string()));

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let bind_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| format!("Invalid HOST/PORT '{}:{}': {}", host, port, e))?;

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| format!("Invalid MAX_UPLOAD_BYTES '{}': {}", raw, e))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            entry_store,
            firebase_project_id,
            firebase_jwks_url,
            upload_dir,
            cors_origins,
            bind_addr,
            max_upload_bytes,
        })
    }
}

fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}
