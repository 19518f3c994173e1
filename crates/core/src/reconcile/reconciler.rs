//! Background reconciler polling the provider for settlement results.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, error, info, warn};

use crate::provider::{SettlementCheck, SettlementProvider};
use crate::reconcile::error::ReconcileError;
use crate::transaction::{Transaction, TransactionError, TransactionStatus, TransactionStore};
use crate::wallet::WalletService;

/// Outcome tallies for one reconciliation cycle.
///
/// `checked` counts every pending transaction examined; the remaining
/// buckets count what happened to each. They need not sum to
/// `checked`: a transaction someone else already drove to a terminal
/// state is examined but lands in no bucket.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CycleSummary {
    /// Pending transactions examined.
    pub checked: usize,
    /// Transactions that reached `Settled`.
    pub settled: usize,
    /// Transactions that reached `Failed` with funds released.
    pub failed: usize,
    /// Transactions the provider has not finished with.
    pub still_pending: usize,
    /// Transactions that could not be checked; retried next cycle.
    pub errors: usize,
}

/// What one settlement check did to a transaction.
enum CheckOutcome {
    Settled,
    Failed,
    StillPending,
    AlreadyTerminal,
}

/// Drives pending transactions to terminal states.
///
/// Each cycle loads every `Pending` transaction, asks the provider
/// for its settlement status, and applies the result through the
/// transaction state machine. Terminal states are reached exactly
/// once: losing a transition race means another actor already
/// finished the job, and the reconciler backs off without touching
/// funds.
pub struct Reconciler {
    store: Arc<dyn TransactionStore>,
    wallet: Arc<dyn WalletService>,
    provider: Arc<dyn SettlementProvider>,
    check_timeout: Duration,
}

impl Reconciler {
    /// Wires the reconciler to its collaborators.
    ///
    /// `check_timeout` bounds each individual settlement check.
    #[must_use]
    pub fn new(
        store: Arc<dyn TransactionStore>,
        wallet: Arc<dyn WalletService>,
        provider: Arc<dyn SettlementProvider>,
        check_timeout: Duration,
    ) -> Self {
        Self {
            store,
            wallet,
            provider,
            check_timeout,
        }
    }

    /// Runs reconciliation cycles every `period` until `shutdown`
    /// observes `true` or its sender goes away.
    pub async fn run(self: Arc<Self>, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period = ?period, "reconciler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("reconciler stopped");
    }

    /// Runs a single reconciliation cycle over all pending
    /// transactions.
    ///
    /// Failures are contained per transaction: one bad check is
    /// tallied under `errors` and the cycle moves on.
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        let pending = match self.store.find_by_status(TransactionStatus::Pending).await {
            Ok(pending) => pending,
            Err(err) => {
                error!(error = %err, "could not load pending transactions for reconciliation");
                summary.errors += 1;
                return summary;
            }
        };

        for transaction in &pending {
            summary.checked += 1;
            match self.reconcile_one(transaction).await {
                Ok(CheckOutcome::Settled) => summary.settled += 1,
                Ok(CheckOutcome::Failed) => summary.failed += 1,
                Ok(CheckOutcome::StillPending) => summary.still_pending += 1,
                Ok(CheckOutcome::AlreadyTerminal) => {}
                Err(err) => {
                    warn!(
                        transaction_id = %transaction.id,
                        error = %err,
                        "reconciliation failed; will retry next cycle"
                    );
                    summary.errors += 1;
                }
            }
        }

        info!(
            checked = summary.checked,
            settled = summary.settled,
            failed = summary.failed,
            still_pending = summary.still_pending,
            errors = summary.errors,
            "reconciliation cycle complete"
        );
        summary
    }

    async fn reconcile_one(
        &self,
        transaction: &Transaction,
    ) -> Result<CheckOutcome, ReconcileError> {
        let Some(reference) = transaction.provider_ref.as_ref() else {
            return Err(ReconcileError::MissingReference(transaction.id));
        };

        let check = timeout(self.check_timeout, self.provider.check_settlement(reference))
            .await
            .map_err(|_| ReconcileError::CheckTimeout)??;

        match check {
            SettlementCheck::Settled => {
                match self
                    .store
                    .transition(transaction.id, TransactionStatus::Settled, None)
                    .await
                {
                    Ok(settled) => {
                        info!(
                            transaction_id = %settled.id,
                            provider_ref = %reference,
                            "transaction settled"
                        );
                        Ok(CheckOutcome::Settled)
                    }
                    Err(TransactionError::InvalidTransition { .. }) => {
                        debug!(transaction_id = %transaction.id, "transaction already terminal");
                        Ok(CheckOutcome::AlreadyTerminal)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            SettlementCheck::Denied => {
                match self
                    .store
                    .transition(transaction.id, TransactionStatus::Failed, None)
                    .await
                {
                    Ok(failed) => {
                        // Only the transition winner returns the
                        // reservation.
                        self.wallet.release_funds(&failed.user_id, failed.amount)?;
                        warn!(
                            transaction_id = %failed.id,
                            provider_ref = %reference,
                            "settlement denied; reservation released"
                        );
                        Ok(CheckOutcome::Failed)
                    }
                    Err(TransactionError::InvalidTransition { .. }) => {
                        debug!(transaction_id = %transaction.id, "transaction already terminal");
                        Ok(CheckOutcome::AlreadyTerminal)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            SettlementCheck::StillPending => Ok(CheckOutcome::StillPending),
        }
    }
}
