//! Wallet balance and funding routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use vireo_core::wallet::{AccountBalance, WalletError};
use vireo_shared::types::{UserId, to_money_scale};

use crate::AppState;

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{user_id}/balance", get(get_balance))
        .route("/wallets/{user_id}/fund", post(fund_account))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for funding an account.
#[derive(Debug, Deserialize)]
pub struct FundAccountRequest {
    /// Amount as a decimal string, e.g. `"1000.00"`.
    pub amount: String,
}

/// Response for an account balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Account holder.
    pub user_id: String,
    /// Total funds on the account.
    pub total: String,
    /// Funds reserved for in-flight payments.
    pub locked: String,
    /// Funds available for new payments.
    pub available: String,
}

impl BalanceResponse {
    /// Amounts are presented at money scale, so a zero balance reads
    /// `"0.00"` rather than `"0"`.
    fn new(user_id: &UserId, balance: AccountBalance) -> Self {
        Self {
            user_id: user_id.as_str().to_string(),
            total: to_money_scale(balance.total).to_string(),
            locked: to_money_scale(balance.locked).to_string(),
            available: to_money_scale(balance.available).to_string(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/wallets/{user_id}/balance` - Fetch an account balance.
///
/// Unknown accounts answer with all-zero balances.
async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<BalanceResponse> {
    let user_id = UserId::new(user_id);
    let balance = state.wallet.balance(&user_id);
    Json(BalanceResponse::new(&user_id, balance))
}

/// POST `/wallets/{user_id}/fund` - Credit an account.
async fn fund_account(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<FundAccountRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_AMOUNT",
                "message": "Invalid amount format"
            })),
        )
            .into_response();
    };

    let user_id = UserId::new(user_id);
    match state.wallet.credit(&user_id, amount) {
        Ok(balance) => {
            info!(user_id = %user_id, amount = %amount, "account funded");
            (StatusCode::OK, Json(BalanceResponse::new(&user_id, balance))).into_response()
        }
        Err(err @ WalletError::InvalidAmount(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": err.error_code(),
                "message": err.to_string()
            })),
        )
            .into_response(),
        Err(err) => {
            error!(user_id = %user_id, error = %err, "failed to credit account");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "INTERNAL_ERROR",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
