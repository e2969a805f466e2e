// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::handlers;
use crate::accounts::AccountRegistry;
use crate::admin::AdminControl;
use crate::fraud::FraudMonitor;
use crate::identity::IdentityProvider;
use crate::ingestion::ViewIngestor;
use crate::ledger::{Cents, LedgerStore};
use crate::payouts::PayoutManager;
use crate::tiers::TierEngine;
use anyhow::Result;
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    pub identity_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            identity_timeout: Duration::from_secs(5),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: std::env::var("API_LISTEN_ADDR")
                .unwrap_or(defaults.listen_addr),
            identity_timeout: std::env::var("IDENTITY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.identity_timeout),
        }
    }
}

/// Shared handler state: the component managers plus the couple of
/// injected constants handlers read directly.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountRegistry>,
    pub ledger: Arc<LedgerStore>,
    pub tiers: Arc<TierEngine>,
    pub fraud: Arc<FraudMonitor>,
    pub payouts: Arc<PayoutManager>,
    pub admin: Arc<AdminControl>,
    pub ingestor: Arc<ViewIngestor>,
    pub identity: Arc<dyn IdentityProvider>,
    pub identity_timeout: Duration,
    pub minimum_withdrawal: Cents,
}

pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health_handler))
            // admin surface
            .route(
                "/creators",
                get(handlers::list_creators).post(handlers::register_creator),
            )
            .route("/creators/:creator_id/balance", post(handlers::adjust_balance))
            .route("/creators/:creator_id/views", post(handlers::ingest_views))
            .route("/creators/mass-bonus", post(handlers::mass_bonus))
            .route("/payouts", get(handlers::list_payouts))
            .route("/payouts/:request_id", post(handlers::decide_payout))
            .route("/tiers", get(handlers::list_tiers))
            .route("/tiers/:creator_id", post(handlers::decide_tier))
            .route(
                "/fraud-flags",
                get(handlers::list_flags).post(handlers::raise_flag),
            )
            .route("/fraud-flags/:flag_id", patch(handlers::update_flag))
            // creator surface
            .route("/withdrawal", post(handlers::submit_withdrawal))
            .route("/withdrawal-pin", post(handlers::set_withdrawal_pin))
            .route("/balance", get(handlers::get_balance))
            .route("/tier-status", get(handlers::get_tier_status))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serves until ctrl-c.
    pub async fn serve(&self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!("API server listening on {}", self.config.listen_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}
