use super::registry::FlagRegistry;
use super::types::{FlagOutcome, FlagSeverity, FlagStatus, FraudError, FraudFlag};
use crate::accounts::AccountRegistry;
use crate::events::{EventBus, NotificationEvent};
use crate::payouts::PayoutManager;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Raises and resolves fraud flags. A confirmed resolution hands the
/// side-effect bundle (suspend + strike + force-reject) to the payout
/// manager, the sole writer of fraud-triggered account transitions.
pub struct FraudMonitor {
    registry: FlagRegistry,
    accounts: Arc<AccountRegistry>,
    enforcement: Arc<PayoutManager>,
    events: EventBus,
}

impl FraudMonitor {
    pub fn new(
        registry: FlagRegistry,
        accounts: Arc<AccountRegistry>,
        enforcement: Arc<PayoutManager>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            accounts,
            enforcement,
            events,
        }
    }

    /// Creates a pending flag. Multiple pending flags per creator are
    /// allowed; each is investigated independently.
    pub async fn raise(
        &self,
        creator_id: &str,
        flag_type: &str,
        severity: FlagSeverity,
        description: &str,
    ) -> Result<FraudFlag, FraudError> {
        self.accounts
            .require(creator_id)
            .await
            .map_err(|_| FraudError::UnknownCreator(creator_id.to_string()))?;

        let flag = FraudFlag {
            id: Uuid::new_v4(),
            creator_id: creator_id.to_string(),
            flag_type: flag_type.to_string(),
            severity,
            description: description.to_string(),
            status: FlagStatus::Pending,
            action_taken: None,
            raised_at: Utc::now(),
            resolved_at: None,
        };
        self.registry.insert(flag.clone()).await;

        warn!(
            "Fraud flag {} ({}, {:?}) raised for creator {}",
            flag.id, flag_type, severity, creator_id
        );

        Ok(flag)
    }

    pub async fn begin_investigation(&self, flag_id: Uuid) -> Result<FraudFlag, FraudError> {
        let flag = self
            .registry
            .transition(flag_id, FlagStatus::Investigating, None)
            .await?;
        info!("Fraud flag {} under investigation", flag_id);
        Ok(flag)
    }

    /// pending|investigating -> resolved|confirmed. Confirmation first wins
    /// the flag's check-and-set, then applies the suspension bundle before
    /// returning, so callers observe either no effect or the full bundle.
    pub async fn resolve(
        &self,
        flag_id: Uuid,
        outcome: FlagOutcome,
        action_taken: Option<String>,
    ) -> Result<FraudFlag, FraudError> {
        let target = match outcome {
            FlagOutcome::Resolved => FlagStatus::Resolved,
            FlagOutcome::Confirmed => FlagStatus::Confirmed,
        };

        let flag = self.registry.transition(flag_id, target, action_taken).await?;

        if outcome == FlagOutcome::Confirmed {
            let suspension = self
                .enforcement
                .suspend_creator(&flag.creator_id, "account suspended pending investigation")
                .await
                .map_err(|e| FraudError::Enforcement(e.to_string()))?;

            self.events.emit(NotificationEvent::FlagConfirmed {
                flag_id,
                creator_id: flag.creator_id.clone(),
                strikes: suspension.strikes,
            });
        } else {
            info!("Fraud flag {} resolved without confirmation", flag_id);
        }

        Ok(flag)
    }

    /// True when any pending high/critical flag exists for the creator, or
    /// the account is suspended.
    pub async fn has_blocking_flag(&self, creator_id: &str) -> bool {
        self.registry.has_blocking_flag(creator_id).await
    }

    pub async fn flag(&self, flag_id: Uuid) -> Option<FraudFlag> {
        self.registry.get(flag_id).await
    }

    pub async fn flags_for(&self, creator_id: &str) -> Vec<FraudFlag> {
        self.registry.flags_for(creator_id).await
    }

    pub async fn flags(&self, status: Option<FlagStatus>) -> Vec<FraudFlag> {
        self.registry.all(status).await
    }
}
