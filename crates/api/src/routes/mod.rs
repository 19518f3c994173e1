//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod payments;
pub mod reconciliation;
pub mod wallets;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(payments::routes())
        .merge(wallets::routes())
        .merge(reconciliation::routes())
}
