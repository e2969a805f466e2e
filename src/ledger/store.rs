use super::types::{Cents, EntrySource, LedgerEntry, LedgerError};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Append-mostly store of earnings-affecting events. Balances are always
/// recomputed from the unpaid entry sum; there is no cached balance that
/// could drift from the entries.
pub struct LedgerStore {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Appends an entry. Zero amounts are rejected; negative amounts are
    /// accepted without checking the resulting balance sign.
    pub async fn record_entry(
        &self,
        creator_id: &str,
        source: EntrySource,
        amount: Cents,
        note: Option<String>,
    ) -> Result<LedgerEntry, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let entry = LedgerEntry {
            id: Uuid::new_v4(),
            creator_id: creator_id.to_string(),
            source,
            amount,
            paid: false,
            note,
            recorded_at: Utc::now(),
        };

        self.entries.write().await.push(entry.clone());
        debug!(
            "Recorded {:?} entry of {} cents for creator {}",
            source, amount, creator_id
        );

        Ok(entry)
    }

    /// Sum of unpaid entries. May be negative after admin deductions.
    pub async fn balance(&self, creator_id: &str) -> Cents {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.creator_id == creator_id && !e.paid)
            .map(|e| e.amount)
            .sum()
    }

    /// Flips `paid` on exactly the given entries, all-or-nothing: the full
    /// set is validated before any flag is flipped, inside one write guard,
    /// so a partial settlement is not reachable.
    pub async fn mark_paid(&self, entry_ids: &[Uuid]) -> Result<(), LedgerError> {
        let mut entries = self.entries.write().await;

        let mut positions = Vec::with_capacity(entry_ids.len());
        for id in entry_ids {
            let pos = entries
                .iter()
                .position(|e| e.id == *id)
                .ok_or(LedgerError::EntryNotFound(*id))?;
            if entries[pos].paid {
                return Err(LedgerError::AlreadyPaid(*id));
            }
            positions.push(pos);
        }

        for pos in positions {
            entries[pos].paid = true;
        }

        Ok(())
    }

    /// Lifetime earnings: sum of positive amounts regardless of paid state.
    pub async fn total_earned(&self, creator_id: &str) -> Cents {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.creator_id == creator_id && e.amount > 0)
            .map(|e| e.amount)
            .sum()
    }

    /// Sum of settled amounts.
    pub async fn total_paid_out(&self, creator_id: &str) -> Cents {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.creator_id == creator_id && e.paid)
            .map(|e| e.amount)
            .sum()
    }

    /// All entries for a creator, in insertion (recording) order.
    pub async fn entries_for(&self, creator_id: &str) -> Vec<LedgerEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.creator_id == creator_id)
            .cloned()
            .collect()
    }

    /// Unpaid entries in insertion order, oldest first. This is the set a
    /// payout snapshot captures at submission.
    pub async fn unpaid_entries(&self, creator_id: &str) -> Vec<LedgerEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.creator_id == creator_id && !e.paid)
            .cloned()
            .collect()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
