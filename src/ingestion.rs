use crate::accounts::{AccountError, AccountRegistry};
use crate::ledger::{EntrySource, LedgerEntry, LedgerError, LedgerStore, MilliCents};
use crate::tiers::TierEngine;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AccrualError {
    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Boundary for the content-ingestion pipeline: turns view-count deltas
/// into view counter bumps and view-earning ledger entries.
pub struct ViewIngestor {
    ledger: Arc<LedgerStore>,
    accounts: Arc<AccountRegistry>,
    tiers: Arc<TierEngine>,
}

impl ViewIngestor {
    pub fn new(
        ledger: Arc<LedgerStore>,
        accounts: Arc<AccountRegistry>,
        tiers: Arc<TierEngine>,
    ) -> Self {
        Self {
            ledger,
            accounts,
            tiers,
        }
    }

    /// Accrues a view delta at the creator's current tier rate. Returns
    /// None for zero deltas and for deltas too small to reach a whole cent
    /// (earnings round down per delta).
    pub async fn accrue(
        &self,
        creator_id: &str,
        views: u64,
    ) -> Result<Option<LedgerEntry>, AccrualError> {
        let rate = self.tiers.current_rate(creator_id).await;
        self.accrue_at_rate(creator_id, views, rate).await
    }

    /// Raw form for callers that carry their own rate.
    pub async fn accrue_at_rate(
        &self,
        creator_id: &str,
        views: u64,
        rate: MilliCents,
    ) -> Result<Option<LedgerEntry>, AccrualError> {
        if views == 0 {
            return Ok(None);
        }

        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        let total = self.accounts.add_views(creator_id, views).await?;
        let amount = (views as i64).saturating_mul(rate) / 1_000;
        if amount == 0 {
            debug!(
                "View delta of {} for creator {} below one cent, counter bumped to {}",
                views, creator_id, total
            );
            return Ok(None);
        }

        let entry = self
            .ledger
            .record_entry(creator_id, EntrySource::ViewEarning, amount, None)
            .await?;

        Ok(Some(entry))
    }
}
