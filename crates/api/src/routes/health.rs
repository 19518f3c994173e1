//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness report.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process can serve requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Build version.
    pub version: &'static str,
}

/// Reports process liveness.
///
/// Carries no dependency checks; the reconciler and provider surface
/// their own state through logs and the reconciliation endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "vireo",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the liveness route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
