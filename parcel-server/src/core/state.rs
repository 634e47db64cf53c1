//! Server state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared server state - one instance cloned into every handler
///
/// `Clone` is cheap: the pool is internally reference-counted and the JWT
/// service sits behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT validation service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, run migrations and wire up services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.db_path).await?;
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            jwt_service,
        })
    }
}
