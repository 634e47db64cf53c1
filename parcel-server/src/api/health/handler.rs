//! Health API Handlers

use axum::Json;

use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Serialize)]
pub struct HealthInfo {
    pub healthy: bool,
    pub version: &'static str,
}

/// GET /api/health - liveness probe, no auth
pub async fn health() -> AppResult<Json<AppResponse<HealthInfo>>> {
    Ok(ok(HealthInfo {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
    }))
}
