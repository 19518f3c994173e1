//! Payment submission and lookup routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use vireo_core::payment::{PaymentError, PaymentRequest};
use vireo_core::transaction::{Transaction, TransactionFilter, TransactionStatus};
use vireo_shared::types::{TransactionId, UserId};

use crate::AppState;
use crate::extractors::ClientOrigin;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(submit_payment))
        .route("/payments", get(list_payments))
        .route("/payments/{transaction_id}", get(get_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Account to debit.
    pub user_id: String,
    /// Amount as a decimal string, e.g. `"500.00"`.
    pub amount: String,
    /// Overrides the detected client origin.
    pub origin_ip: Option<String>,
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by account.
    pub user_id: Option<String>,
}

/// Response for a payment transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: i64,
    /// Account the payment debits.
    pub user_id: String,
    /// Payment amount.
    pub amount: String,
    /// Currency code.
    pub currency: String,
    /// Lifecycle status.
    pub status: String,
    /// Country the origin resolved to.
    pub country: String,
    /// Network origin of the submission.
    pub origin: String,
    /// Settlement provider reference, once authorized.
    pub provider_ref: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id.into_inner(),
            user_id: transaction.user_id.into_inner(),
            amount: transaction.amount.to_string(),
            currency: transaction.currency,
            status: transaction.status.as_str().to_string(),
            country: transaction.country.to_string(),
            origin: transaction.origin,
            provider_ref: transaction
                .provider_ref
                .map(|reference| reference.as_str().to_string()),
            created_at: transaction.created_at.to_rfc3339(),
            updated_at: transaction.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/payments` - Submit a payment for authorization.
async fn submit_payment(
    State(state): State<AppState>,
    ClientOrigin(peer_origin): ClientOrigin,
    Json(payload): Json<CreatePaymentRequest>,
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

    let request = PaymentRequest {
        user_id: UserId::new(payload.user_id),
        amount,
        origin: payload.origin_ip.unwrap_or(peer_origin),
    };

    match state.coordinator.process_payment(request).await {
        Ok(transaction) => {
            info!(transaction_id = %transaction.id, "payment submitted");
            (
                StatusCode::CREATED,
                Json(TransactionResponse::from(transaction)),
            )
                .into_response()
        }
        Err(err) => payment_error_response(err),
    }
}

/// GET `/payments/{transaction_id}` - Fetch one payment.
async fn get_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> impl IntoResponse {
    match state.store.find_by_id(transaction_id).await {
        Ok(Some(transaction)) => {
            (StatusCode::OK, Json(TransactionResponse::from(transaction))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "NOT_FOUND",
                "message": "Transaction not found"
            })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to load transaction");
            internal_error_response()
        }
    }
}

/// GET `/payments` - List payments with optional filters.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some(raw) => match TransactionStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "INVALID_STATUS",
                        "message": format!("Unknown transaction status: {raw}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let filter = TransactionFilter {
        status,
        user_id: query.user_id.map(UserId::new),
    };

    match state.store.list(&filter).await {
        Ok(transactions) => {
            let items: Vec<TransactionResponse> = transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect();
            (StatusCode::OK, Json(json!({ "transactions": items }))).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to list transactions");
            internal_error_response()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Maps a payment outcome error onto the wire.
///
/// Declined and unavailable outcomes carry the failed transaction so
/// callers can see what was recorded. Internal failures are logged in
/// full and answered with a generic body.
fn payment_error_response(err: PaymentError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = err.error_code();
    let message = err.to_string();

    match err {
        PaymentError::AuthorizationDeclined { transaction, .. }
        | PaymentError::ProviderUnavailable { transaction } => (
            status,
            Json(json!({
                "error": code,
                "message": message,
                "transaction": TransactionResponse::from(*transaction),
            })),
        )
            .into_response(),
        PaymentError::Wallet(_) | PaymentError::Store(_) => {
            error!(error = %message, "payment processing failed");
            internal_error_response()
        }
        _ => (
            status,
            Json(json!({
                "error": code,
                "message": message
            })),
        )
            .into_response(),
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "INTERNAL_ERROR",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
