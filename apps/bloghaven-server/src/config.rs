//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use bloghaven_infra::{DatabaseConfig, JwtConfig};

/// Default cap on one multipart submission.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Directory holding `images/` and `post_image/`.
    pub upload_root: PathBuf,
    pub max_upload_bytes: usize,
    /// Mark the session cookie `Secure` (HTTPS only).
    pub cookie_secure: bool,
    pub session: JwtConfig,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            upload_root: env::var("UPLOAD_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            session: JwtConfig::from_env(),
        }
    }

    /// Configuration for tests and local experiments: no database, uploads
    /// under `upload_root`.
    pub fn in_memory(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            upload_root: upload_root.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cookie_secure: false,
            session: JwtConfig::default(),
        }
    }
}
