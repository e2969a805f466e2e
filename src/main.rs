// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use creator_ledger_node::{
    api::{ApiConfig, ApiServer, AppState},
    config::{PayoutConfig, TierSchedule},
    AccountRegistry, AdminControl, EventBus, FlagRegistry, FraudMonitor, LedgerStore,
    PayoutManager, StaticIdentityProvider, TierEngine, ViewIngestor,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("{}", creator_ledger_node::version::get_version_string());

    let payout_config = PayoutConfig::from_env();
    let tier_schedule = TierSchedule::from_env();
    let api_config = ApiConfig::from_env();

    info!(
        "Minimum withdrawal: {} cents, fee: {}%",
        payout_config.minimum_withdrawal,
        payout_config.fee_percent * 100.0
    );

    let (events, mut event_rx) = EventBus::new(256);

    let accounts = Arc::new(AccountRegistry::new());
    let ledger = Arc::new(LedgerStore::new());
    let flags = FlagRegistry::new(accounts.clone());
    let wallets = Arc::new(creator_ledger_node::InMemoryWalletDirectory::new());

    let tiers = Arc::new(TierEngine::new(
        tier_schedule,
        accounts.clone(),
        flags.clone(),
        events.clone(),
    ));
    let payouts = Arc::new(PayoutManager::new(
        payout_config.clone(),
        ledger.clone(),
        accounts.clone(),
        flags.clone(),
        wallets.clone(),
        events.clone(),
    ));
    let fraud = Arc::new(FraudMonitor::new(
        flags,
        accounts.clone(),
        payouts.clone(),
        events.clone(),
    ));
    let admin = Arc::new(AdminControl::new(ledger.clone(), accounts.clone()));
    let ingestor = Arc::new(ViewIngestor::new(
        ledger.clone(),
        accounts.clone(),
        tiers.clone(),
    ));

    // Notification boundary: the core emits, this stand-in dispatcher logs.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            info!(
                "notification {}: {}",
                event.kind(),
                serde_json::to_string(&event).unwrap_or_default()
            );
        }
    });

    let state = AppState {
        accounts,
        ledger,
        tiers,
        fraud,
        payouts,
        admin,
        ingestor,
        identity: Arc::new(StaticIdentityProvider),
        identity_timeout: api_config.identity_timeout,
        minimum_withdrawal: payout_config.minimum_withdrawal,
    };

    ApiServer::new(api_config, state).serve().await
}
