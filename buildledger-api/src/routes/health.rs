/// Health check endpoint
///
/// Reports the active storage backend and whether it currently answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": { "mode": "file", "healthy": true }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use buildledger_shared::store::StoreHealth;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Active backend and its health
    pub storage: StoreHealth,
}

/// Health check handler
///
/// Always answers 200; a failing backend shows up as `"degraded"`.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let storage = state.store.health().await;

    Ok(Json(HealthResponse {
        status: if storage.healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage,
    }))
}
