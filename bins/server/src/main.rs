//! Vireo API Server
//!
//! Main entry point for the Vireo payment authorization service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vireo_api::{AppState, create_router};
use vireo_core::compliance::{ComplianceGate, PrefixGeoClassifier};
use vireo_core::payment::PaymentCoordinator;
use vireo_core::provider::SandboxProvider;
use vireo_core::reconcile::Reconciler;
use vireo_core::transaction::InMemoryTransactionStore;
use vireo_core::wallet::{CustodialWallet, WalletService};
use vireo_shared::{AppConfig, types::UserId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vireo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Assemble the payment stack
    let gate = ComplianceGate::new(
        Arc::new(PrefixGeoClassifier::new()),
        config.compliance.allowed_countries.clone(),
    );
    let wallet = Arc::new(CustodialWallet::new());
    let store = Arc::new(InMemoryTransactionStore::new());
    let provider = Arc::new(SandboxProvider::new(
        config.provider.max_amount,
        Duration::from_millis(config.provider.latency_ms),
        Duration::from_secs(config.provider.settle_after_secs),
    ));
    let coordinator = Arc::new(PaymentCoordinator::new(
        gate,
        wallet.clone(),
        store.clone(),
        provider.clone(),
        Duration::from_millis(config.provider.authorize_timeout_ms),
    ));
    let reconciler = Arc::new(Reconciler::new(
        store.clone(),
        wallet.clone(),
        provider,
        Duration::from_millis(config.reconciler.check_timeout_ms),
    ));

    // Seed demo accounts
    if config.demo.seed_accounts {
        for (user, amount) in [
            ("vietnam_user_1", Decimal::new(1_000_00, 2)),
            ("vietnam_user_2", Decimal::new(500_00, 2)),
            ("france_user_1", Decimal::new(750_00, 2)),
        ] {
            wallet.credit(&UserId::new(user), amount)?;
            info!(user_id = user, amount = %amount, "seeded demo account");
        }
    }

    // Start the background reconciler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconciler_task = tokio::spawn(reconciler.clone().run(
        Duration::from_secs(config.reconciler.interval_secs),
        shutdown_rx,
    ));

    // Create application state
    let state = AppState {
        coordinator,
        wallet,
        store,
        reconciler,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    // Stop the reconciler before exiting
    info!("shutting down");
    let _ = shutdown_tx.send(true);
    reconciler_task.await?;

    Ok(())
}
