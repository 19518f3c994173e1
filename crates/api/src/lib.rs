//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for payments, wallets, and reconciliation
//! - Client origin extraction
//! - Response types

pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vireo_core::payment::PaymentCoordinator;
use vireo_core::reconcile::Reconciler;
use vireo_core::transaction::TransactionStore;
use vireo_core::wallet::WalletService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Payment coordinator driving authorization.
    pub coordinator: Arc<PaymentCoordinator>,
    /// Custodial wallet ledger.
    pub wallet: Arc<dyn WalletService>,
    /// Transaction record store.
    pub store: Arc<dyn TransactionStore>,
    /// Reconciler, for manually triggered cycles.
    pub reconciler: Arc<Reconciler>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
