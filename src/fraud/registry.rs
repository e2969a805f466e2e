use super::types::{FlagStatus, FraudError, FraudFlag};
use crate::accounts::{AccountRegistry, AccountStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared flag state. Cloneable so the payout workflow can consult blocking
/// status without holding a handle to the monitor itself.
#[derive(Clone)]
pub struct FlagRegistry {
    accounts: Arc<AccountRegistry>,
    flags: Arc<RwLock<HashMap<Uuid, FraudFlag>>>,
}

impl FlagRegistry {
    pub fn new(accounts: Arc<AccountRegistry>) -> Self {
        Self {
            accounts,
            flags: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, flag: FraudFlag) {
        self.flags.write().await.insert(flag.id, flag);
    }

    pub async fn get(&self, flag_id: Uuid) -> Option<FraudFlag> {
        self.flags.read().await.get(&flag_id).cloned()
    }

    /// Check-and-set transition inside one write guard. Only open flags
    /// (pending or investigating) may move, so concurrent resolutions of the
    /// same flag cannot both apply.
    pub async fn transition(
        &self,
        flag_id: Uuid,
        new_status: FlagStatus,
        action_taken: Option<String>,
    ) -> Result<FraudFlag, FraudError> {
        let mut flags = self.flags.write().await;
        let flag = flags
            .get_mut(&flag_id)
            .ok_or(FraudError::FlagNotFound(flag_id))?;

        if !flag.status.is_open() {
            return Err(FraudError::InvalidTransition(flag.status));
        }

        flag.status = new_status;
        if action_taken.is_some() {
            flag.action_taken = action_taken;
        }
        if !new_status.is_open() {
            flag.resolved_at = Some(Utc::now());
        }

        Ok(flag.clone())
    }

    /// True when the creator has any pending high/critical flag, or the
    /// account itself is suspended. Consulted before payout approval and
    /// tier changes.
    pub async fn has_blocking_flag(&self, creator_id: &str) -> bool {
        if let Some(account) = self.accounts.get(creator_id).await {
            if account.status == AccountStatus::Suspended {
                return true;
            }
        }

        self.flags
            .read()
            .await
            .values()
            .any(|f| {
                f.creator_id == creator_id
                    && f.status == FlagStatus::Pending
                    && f.severity.is_blocking()
            })
    }

    pub async fn flags_for(&self, creator_id: &str) -> Vec<FraudFlag> {
        let mut flags: Vec<FraudFlag> = self
            .flags
            .read()
            .await
            .values()
            .filter(|f| f.creator_id == creator_id)
            .cloned()
            .collect();
        flags.sort_by_key(|f| f.raised_at);
        flags
    }

    pub async fn all(&self, status: Option<FlagStatus>) -> Vec<FraudFlag> {
        let mut flags: Vec<FraudFlag> = self
            .flags
            .read()
            .await
            .values()
            .filter(|f| status.map_or(true, |s| f.status == s))
            .cloned()
            .collect();
        flags.sort_by_key(|f| f.raised_at);
        flags
    }
}
