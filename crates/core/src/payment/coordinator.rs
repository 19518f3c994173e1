//! Payment coordinator: compliance, fund lock, authorization,
//! compensation.
//!
//! Ordering is the contract here. Funds are locked before the
//! transaction record exists, so a record always has backing; the
//! provider is only called after both; and any authorization failure
//! marks the transaction `Failed` before the reservation is released,
//! so the release can never happen twice.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{error, info, warn};
use vireo_shared::types::{UserId, to_money_scale, validate_amount};

use crate::compliance::ComplianceGate;
use crate::payment::error::PaymentError;
use crate::provider::{ProviderError, SettlementProvider};
use crate::transaction::{
    CreateTransactionInput, Transaction, TransactionStatus, TransactionStore,
};
use crate::wallet::WalletService;

/// A payment submission.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Account to debit.
    pub user_id: UserId,
    /// Amount to pay.
    pub amount: Decimal,
    /// Network address the request originated from.
    pub origin: String,
}

/// Orchestrates payment authorization end to end.
pub struct PaymentCoordinator {
    gate: ComplianceGate,
    wallet: Arc<dyn WalletService>,
    store: Arc<dyn TransactionStore>,
    provider: Arc<dyn SettlementProvider>,
    authorize_timeout: Duration,
}

impl PaymentCoordinator {
    /// Wires the coordinator to its collaborators.
    ///
    /// `authorize_timeout` bounds the provider authorization call; a
    /// provider that exceeds it is treated as unavailable.
    #[must_use]
    pub fn new(
        gate: ComplianceGate,
        wallet: Arc<dyn WalletService>,
        store: Arc<dyn TransactionStore>,
        provider: Arc<dyn SettlementProvider>,
        authorize_timeout: Duration,
    ) -> Self {
        Self {
            gate,
            wallet,
            store,
            provider,
            authorize_timeout,
        }
    }

    /// Processes a payment submission.
    ///
    /// On success the returned transaction is `Pending` with the
    /// provider reference recorded and the amount still locked.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`, `GeoBlocked`, `InsufficientFunds` - nothing
    ///   was created and no funds moved
    /// - `AuthorizationDeclined`, `ProviderUnavailable` - the failed
    ///   transaction is carried in the error and the reservation has
    ///   been released
    /// - `Wallet`, `Store` - internal failures, logged in full
    pub async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<Transaction, PaymentError> {
        validate_amount(request.amount)?;
        let amount = to_money_scale(request.amount);

        let decision = self.gate.evaluate(&request.user_id, &request.origin);
        if !decision.allowed {
            return Err(PaymentError::GeoBlocked {
                country: decision.country,
            });
        }

        self.wallet.lock_funds(&request.user_id, amount)?;

        let input = CreateTransactionInput {
            user_id: request.user_id.clone(),
            amount,
            country: decision.country,
            origin: request.origin,
        };
        let transaction = match self.store.save(input).await {
            Ok(transaction) => transaction,
            Err(err) => {
                // A reservation must not outlive a failed create.
                if let Err(release_err) = self.wallet.release_funds(&request.user_id, amount) {
                    error!(
                        user_id = %request.user_id,
                        error = %release_err,
                        "failed to release reservation after store error"
                    );
                    return Err(release_err.into());
                }
                return Err(err.into());
            }
        };

        info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            amount = %transaction.amount,
            country = %transaction.country,
            "payment accepted for authorization"
        );

        let authorization = timeout(
            self.authorize_timeout,
            self.provider
                .authorize(&transaction.user_id, transaction.amount, &transaction.country),
        )
        .await;

        match authorization {
            Ok(Ok(reference)) => {
                let authorized = self
                    .store
                    .transition(transaction.id, TransactionStatus::Pending, Some(reference))
                    .await?;
                info!(transaction_id = %authorized.id, "payment authorized");
                Ok(authorized)
            }
            Ok(Err(ProviderError::Declined(reason))) => {
                let failed = self.fail_and_release(&transaction).await?;
                warn!(
                    transaction_id = %failed.id,
                    reason = %reason,
                    "authorization declined"
                );
                Err(PaymentError::AuthorizationDeclined {
                    transaction: Box::new(failed),
                    reason,
                })
            }
            Ok(Err(err)) => {
                let failed = self.fail_and_release(&transaction).await?;
                warn!(
                    transaction_id = %failed.id,
                    error = %err,
                    "provider unavailable during authorization"
                );
                Err(PaymentError::ProviderUnavailable {
                    transaction: Box::new(failed),
                })
            }
            Err(_) => {
                let failed = self.fail_and_release(&transaction).await?;
                warn!(
                    transaction_id = %failed.id,
                    timeout = ?self.authorize_timeout,
                    "authorization timed out"
                );
                Err(PaymentError::ProviderUnavailable {
                    transaction: Box::new(failed),
                })
            }
        }
    }

    /// Marks the transaction failed, then returns its reservation.
    ///
    /// The release only runs when this caller committed the `Failed`
    /// transition, so a reservation is returned exactly once no
    /// matter who else is looking at the transaction.
    async fn fail_and_release(
        &self,
        transaction: &Transaction,
    ) -> Result<Transaction, PaymentError> {
        let failed = match self
            .store
            .transition(transaction.id, TransactionStatus::Failed, None)
            .await
        {
            Ok(failed) => failed,
            Err(err) => {
                error!(
                    transaction_id = %transaction.id,
                    error = %err,
                    "could not mark transaction failed; reservation left in place"
                );
                return Err(err.into());
            }
        };

        if let Err(err) = self.wallet.release_funds(&failed.user_id, failed.amount) {
            error!(
                transaction_id = %failed.id,
                user_id = %failed.user_id,
                error = %err,
                "failed to release reservation for failed transaction"
            );
            return Err(err.into());
        }

        Ok(failed)
    }
}
