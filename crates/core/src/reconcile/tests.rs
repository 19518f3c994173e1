//! Reconciler scenarios over real wallet and store components with
//! scripted settlement-check doubles.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::watch;
use vireo_shared::types::UserId;

use crate::compliance::CountryCode;
use crate::provider::{
    ProviderError, ProviderReference, SettlementCheck, SettlementProvider,
};
use crate::reconcile::Reconciler;
use crate::transaction::{
    CreateTransactionInput, InMemoryTransactionStore, Transaction, TransactionStatus,
    TransactionStore,
};
use crate::wallet::{CustodialWallet, WalletService};

/// How the scripted provider answers a settlement check.
#[derive(Debug, Clone, Copy)]
enum CheckScript {
    Settle,
    Deny,
    StillPending,
    Fail,
    Hang,
}

struct ScriptedCheckProvider {
    default_script: CheckScript,
    overrides: DashMap<ProviderReference, CheckScript>,
    check_calls: AtomicUsize,
}

impl ScriptedCheckProvider {
    fn new(default_script: CheckScript) -> Self {
        Self {
            default_script,
            overrides: DashMap::new(),
            check_calls: AtomicUsize::new(0),
        }
    }

    fn script_for(&self, reference: &ProviderReference, script: CheckScript) {
        self.overrides.insert(reference.clone(), script);
    }

    fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettlementProvider for ScriptedCheckProvider {
    async fn authorize(
        &self,
        _user_id: &UserId,
        _amount: Decimal,
        _country: &CountryCode,
    ) -> Result<ProviderReference, ProviderError> {
        Ok(ProviderReference::new("HK_unused"))
    }

    async fn check_settlement(
        &self,
        reference: &ProviderReference,
    ) -> Result<SettlementCheck, ProviderError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .overrides
            .get(reference)
            .map_or(self.default_script, |entry| *entry);
        match script {
            CheckScript::Settle => Ok(SettlementCheck::Settled),
            CheckScript::Deny => Ok(SettlementCheck::Denied),
            CheckScript::StillPending => Ok(SettlementCheck::StillPending),
            CheckScript::Fail => {
                Err(ProviderError::Unavailable("status endpoint down".to_string()))
            }
            CheckScript::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future never resolves")
            }
        }
    }
}

struct Harness {
    reconciler: Arc<Reconciler>,
    wallet: Arc<CustodialWallet>,
    store: Arc<InMemoryTransactionStore>,
    provider: Arc<ScriptedCheckProvider>,
}

fn harness(default_script: CheckScript) -> Harness {
    let wallet = Arc::new(CustodialWallet::new());
    let store = Arc::new(InMemoryTransactionStore::new());
    let provider = Arc::new(ScriptedCheckProvider::new(default_script));
    let reconciler = Arc::new(Reconciler::new(
        store.clone(),
        wallet.clone(),
        provider.clone(),
        Duration::from_millis(50),
    ));
    Harness {
        reconciler,
        wallet,
        store,
        provider,
    }
}

impl Harness {
    /// Funds `user` with exactly `amount`, locks it, and records a
    /// pending transaction carrying a provider reference.
    async fn pending_transaction(&self, user: &str, amount: Decimal) -> Transaction {
        let user_id = UserId::new(user);
        self.wallet.credit(&user_id, amount).unwrap();
        self.wallet.lock_funds(&user_id, amount).unwrap();

        let saved = self
            .store
            .save(CreateTransactionInput {
                user_id,
                amount,
                country: CountryCode::new("VN"),
                origin: "203.113.1.1".to_string(),
            })
            .await
            .unwrap();
        self.store
            .transition(
                saved.id,
                TransactionStatus::Pending,
                Some(ProviderReference::new(format!("HK_{:08}", saved.id))),
            )
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_settled_transaction_keeps_funds_locked() {
    let h = harness(CheckScript::Settle);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.settled, 1);
    assert_eq!(summary.errors, 0);

    let settled = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(settled.status, TransactionStatus::Settled);

    // Settlement spends the reservation; nothing comes back.
    let balance = h.wallet.balance(&UserId::new("alice"));
    assert_eq!(balance.locked, dec!(500.00));
    assert_eq!(balance.available, Decimal::ZERO);
}

#[tokio::test]
async fn test_denied_transaction_releases_funds() {
    let h = harness(CheckScript::Deny);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.failed, 1);

    let failed = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);

    let balance = h.wallet.balance(&UserId::new("alice"));
    assert_eq!(balance.locked, Decimal::ZERO);
    assert_eq!(balance.available, dec!(500.00));
}

#[tokio::test]
async fn test_still_pending_transaction_is_left_alone() {
    let h = harness(CheckScript::StillPending);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let summary = h.reconciler.run_cycle().await;
    assert_eq!(summary.still_pending, 1);

    let unchanged = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TransactionStatus::Pending);
    assert_eq!(h.wallet.balance(&UserId::new("alice")).locked, dec!(500.00));

    // The next cycle examines it again.
    let summary = h.reconciler.run_cycle().await;
    assert_eq!(summary.checked, 1);
}

#[tokio::test]
async fn test_provider_error_leaves_transaction_for_next_cycle() {
    let h = harness(CheckScript::Fail);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.settled, 0);
    assert_eq!(summary.failed, 0);

    let unchanged = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TransactionStatus::Pending);
    assert_eq!(h.wallet.balance(&UserId::new("alice")).locked, dec!(500.00));
}

#[tokio::test]
async fn test_hanging_check_times_out_as_error() {
    let h = harness(CheckScript::Hang);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.errors, 1);
    let unchanged = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn test_one_failure_does_not_block_the_rest_of_the_cycle() {
    let h = harness(CheckScript::Settle);
    let broken = h.pending_transaction("alice", dec!(100.00)).await;
    let healthy = h.pending_transaction("bob", dec!(200.00)).await;
    h.provider
        .script_for(broken.provider_ref.as_ref().unwrap(), CheckScript::Fail);

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.checked, 2);
    assert_eq!(summary.settled, 1);
    assert_eq!(summary.errors, 1);

    let settled = h.store.find_by_id(healthy.id).await.unwrap().unwrap();
    assert_eq!(settled.status, TransactionStatus::Settled);
    let retrying = h.store.find_by_id(broken.id).await.unwrap().unwrap();
    assert_eq!(retrying.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn test_terminal_transactions_leave_the_queue() {
    let h = harness(CheckScript::Settle);
    h.pending_transaction("alice", dec!(500.00)).await;

    let first = h.reconciler.run_cycle().await;
    assert_eq!(first.settled, 1);

    let second = h.reconciler.run_cycle().await;
    assert_eq!(second.checked, 0);
    assert_eq!(h.provider.check_calls(), 1);
}

#[tokio::test]
async fn test_pending_without_reference_counts_as_error() {
    let h = harness(CheckScript::Settle);
    let saved = h
        .store
        .save(CreateTransactionInput {
            user_id: UserId::new("alice"),
            amount: dec!(500.00),
            country: CountryCode::new("VN"),
            origin: "203.113.1.1".to_string(),
        })
        .await
        .unwrap();
    h.store
        .transition(saved.id, TransactionStatus::Pending, None)
        .await
        .unwrap();

    let summary = h.reconciler.run_cycle().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(h.provider.check_calls(), 0);
}

#[tokio::test]
async fn test_run_loop_reconciles_until_shutdown() {
    let h = harness(CheckScript::Settle);
    let pending = h.pending_transaction("alice", dec!(500.00)).await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(
        h.reconciler
            .clone()
            .run(Duration::from_millis(10), shutdown_rx),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reconciler did not stop")
        .unwrap();

    let settled = h.store.find_by_id(pending.id).await.unwrap().unwrap();
    assert_eq!(settled.status, TransactionStatus::Settled);
}
