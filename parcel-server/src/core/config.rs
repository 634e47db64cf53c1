//! Server configuration
//!
//! All settings are environment-variable driven with sensible defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DATABASE_PATH | parcel.db | SQLite database file |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
//! | LOG_LEVEL | info | tracing level filter |
//! | LOG_DIR | (unset) | daily rolling log files when set |
//! | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | see auth | token validation |

use crate::auth::JwtConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub db_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT validation configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Per-request timeout (milliseconds), enforced at the HTTP layer
    pub request_timeout_ms: u64,
    /// Log level filter
    pub log_level: String,
    /// Log file directory; stdout-only when unset
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "parcel.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override database path and port, keeping everything else from env.
    ///
    /// Mostly used by tests.
    pub fn with_overrides(db_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
