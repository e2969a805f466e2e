// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::accounts::{AccountRegistry, AccountStatus, CreatorId};
use crate::ledger::{Cents, EntrySource, LedgerEntry, LedgerError, LedgerStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Creator not found: {0}")]
    UnknownCreator(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// One row of the staff creator listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorOverview {
    pub user_id: CreatorId,
    pub status: AccountStatus,
    pub strikes: u32,
    pub total_uploads: u64,
    pub total_views: u64,
    pub balance_cents: Cents,
    pub total_earned_cents: Cents,
    pub total_paid_out_cents: Cents,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a batch bonus. Individual failures are collected, never
/// fatal for the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MassBonusReport {
    pub credited: Vec<CreatorId>,
    pub failed: Vec<(CreatorId, String)>,
}

/// Staff balance operations. Stateless orchestration over the ledger and
/// account registry; payout, tier, and flag decisions go straight to their
/// owning components.
pub struct AdminControl {
    ledger: Arc<LedgerStore>,
    accounts: Arc<AccountRegistry>,
}

impl AdminControl {
    pub fn new(ledger: Arc<LedgerStore>, accounts: Arc<AccountRegistry>) -> Self {
        Self { ledger, accounts }
    }

    /// Credits a creator with an admin bonus entry.
    pub async fn fund(
        &self,
        creator_id: &str,
        amount: Cents,
        reason: &str,
    ) -> Result<LedgerEntry, AdminError> {
        if amount <= 0 {
            return Err(AdminError::InvalidAmount);
        }
        self.accounts
            .require(creator_id)
            .await
            .map_err(|_| AdminError::UnknownCreator(creator_id.to_string()))?;

        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        let entry = self
            .ledger
            .record_entry(
                creator_id,
                EntrySource::AdminBonus,
                amount,
                Some(reason.to_string()),
            )
            .await?;
        info!(
            "Funded creator {} with {} cents: {}",
            creator_id, amount, reason
        );

        Ok(entry)
    }

    /// Records a deduction. The resulting balance may go negative; that is
    /// the claw-back mechanism, not an error.
    pub async fn debit(
        &self,
        creator_id: &str,
        amount: Cents,
        reason: &str,
    ) -> Result<LedgerEntry, AdminError> {
        if amount <= 0 {
            return Err(AdminError::InvalidAmount);
        }
        self.accounts
            .require(creator_id)
            .await
            .map_err(|_| AdminError::UnknownCreator(creator_id.to_string()))?;

        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        let entry = self
            .ledger
            .record_entry(
                creator_id,
                EntrySource::AdminDeduction,
                -amount,
                Some(reason.to_string()),
            )
            .await?;
        info!(
            "Debited creator {} by {} cents: {}",
            creator_id, amount, reason
        );

        Ok(entry)
    }

    /// Applies `fund` to every active creator as independent units of work.
    pub async fn mass_bonus(&self, amount: Cents, reason: &str) -> MassBonusReport {
        let mut report = MassBonusReport::default();

        for creator_id in self.accounts.active_creators().await {
            match self.fund(&creator_id, amount, reason).await {
                Ok(_) => report.credited.push(creator_id),
                Err(e) => {
                    warn!("Mass bonus skipped creator {}: {}", creator_id, e);
                    report.failed.push((creator_id, e.to_string()));
                }
            }
        }

        info!(
            "Mass bonus of {} cents: {} credited, {} failed",
            amount,
            report.credited.len(),
            report.failed.len()
        );

        report
    }

    /// Balances and status for every creator, active or suspended.
    pub async fn creator_overview(&self) -> Vec<CreatorOverview> {
        let mut rows = Vec::new();
        for account in self.accounts.all().await {
            rows.push(CreatorOverview {
                balance_cents: self.ledger.balance(&account.user_id).await,
                total_earned_cents: self.ledger.total_earned(&account.user_id).await,
                total_paid_out_cents: self.ledger.total_paid_out(&account.user_id).await,
                user_id: account.user_id,
                status: account.status,
                strikes: account.strikes,
                total_uploads: account.total_uploads,
                total_views: account.total_views,
                created_at: account.created_at,
            });
        }
        rows
    }
}
