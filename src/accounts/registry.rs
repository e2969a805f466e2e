use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Opaque, externally issued identity. The registry trusts it as the key.
pub type CreatorId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
}

/// One per creator-enabled user. Accounts are never deleted, only suspended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorAccount {
    pub user_id: CreatorId,
    pub status: AccountStatus,
    pub strikes: u32,
    pub total_uploads: u64,
    pub total_views: u64,
    #[serde(skip_serializing)]
    pub pin_digest: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Creator not found: {0}")]
    NotFound(CreatorId),

    #[error("Creator already registered: {0}")]
    AlreadyRegistered(CreatorId),
}

/// Creator account state plus the per-creator lock registry. Every
/// check-then-act span over a creator's ledger, payout, or status holds
/// that creator's lock, which gives those operations row-lock semantics.
pub struct AccountRegistry {
    accounts: Arc<RwLock<HashMap<CreatorId, CreatorAccount>>>,
    locks: Arc<Mutex<HashMap<CreatorId, Arc<Mutex<()>>>>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Lock handle for one creator, created on first use. Callers hold the
    /// guard for the whole check-then-act span and never take a second
    /// creator's lock while holding one.
    pub async fn creator_lock(&self, creator_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(creator_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Creates the account when a creator application is approved.
    pub async fn register(&self, user_id: &str) -> Result<CreatorAccount, AccountError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(user_id) {
            return Err(AccountError::AlreadyRegistered(user_id.to_string()));
        }

        let account = CreatorAccount {
            user_id: user_id.to_string(),
            status: AccountStatus::Active,
            strikes: 0,
            total_uploads: 0,
            total_views: 0,
            pin_digest: None,
            created_at: Utc::now(),
        };
        accounts.insert(user_id.to_string(), account.clone());
        info!("Registered creator account {}", user_id);

        Ok(account)
    }

    pub async fn get(&self, creator_id: &str) -> Option<CreatorAccount> {
        self.accounts.read().await.get(creator_id).cloned()
    }

    pub async fn require(&self, creator_id: &str) -> Result<CreatorAccount, AccountError> {
        self.get(creator_id)
            .await
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))
    }

    pub async fn set_status(
        &self,
        creator_id: &str,
        status: AccountStatus,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(creator_id)
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))?;
        account.status = status;
        Ok(())
    }

    /// Returns the new strike count.
    pub async fn add_strike(&self, creator_id: &str) -> Result<u32, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(creator_id)
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))?;
        account.strikes += 1;
        Ok(account.strikes)
    }

    pub async fn record_upload(&self, creator_id: &str) -> Result<u64, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(creator_id)
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))?;
        account.total_uploads += 1;
        Ok(account.total_uploads)
    }

    /// Bumps the cumulative view counter, returning the new total.
    pub async fn add_views(&self, creator_id: &str, views: u64) -> Result<u64, AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(creator_id)
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))?;
        account.total_views += views;
        Ok(account.total_views)
    }

    /// Stores the withdrawal PIN as a sha256 digest, never plaintext.
    pub async fn set_withdrawal_pin(&self, creator_id: &str, pin: &str) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(creator_id)
            .ok_or_else(|| AccountError::NotFound(creator_id.to_string()))?;
        account.pin_digest = Some(digest_pin(pin));
        Ok(())
    }

    /// False when no PIN has been configured.
    pub async fn verify_pin(&self, creator_id: &str, pin: &str) -> bool {
        match self.accounts.read().await.get(creator_id) {
            Some(account) => account.pin_digest.as_deref() == Some(digest_pin(pin).as_str()),
            None => false,
        }
    }

    pub async fn active_creators(&self) -> Vec<CreatorId> {
        let mut ids: Vec<CreatorId> = self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.status == AccountStatus::Active)
            .map(|a| a.user_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub async fn all(&self) -> Vec<CreatorAccount> {
        let mut accounts: Vec<CreatorAccount> =
            self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        accounts
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn digest_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}
