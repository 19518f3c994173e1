//! Reconciliation trigger routes.

use axum::{Json, Router, extract::State, routing::post};
use tracing::info;
use vireo_core::reconcile::CycleSummary;

use crate::AppState;

/// POST `/reconciliation/run` - Run one reconciliation cycle now.
///
/// The background reconciler keeps running on its own schedule; this
/// endpoint exists for demos and operational nudges.
async fn run_reconciliation(State(state): State<AppState>) -> Json<CycleSummary> {
    info!("manual reconciliation requested");
    Json(state.reconciler.run_cycle().await)
}

/// Creates reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reconciliation/run", post(run_reconciliation))
}
