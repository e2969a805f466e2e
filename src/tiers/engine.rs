use super::types::{Tier, TierDecision, TierError, TierReview, TierState};
use crate::accounts::AccountRegistry;
use crate::config::TierSchedule;
use crate::events::{EventBus, NotificationEvent};
use crate::fraud::FlagRegistry;
use crate::ledger::MilliCents;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Computes tier eligibility from cumulative views and persists changes
/// only on explicit admin approval, so a rate increase can be fraud
/// reviewed first. Tiers never downgrade automatically.
pub struct TierEngine {
    schedule: TierSchedule,
    accounts: Arc<AccountRegistry>,
    flags: FlagRegistry,
    states: Arc<RwLock<HashMap<String, TierState>>>,
    decisions: Arc<RwLock<Vec<TierDecision>>>,
    events: EventBus,
}

impl TierEngine {
    pub fn new(
        schedule: TierSchedule,
        accounts: Arc<AccountRegistry>,
        flags: FlagRegistry,
        events: EventBus,
    ) -> Self {
        Self {
            schedule,
            accounts,
            flags,
            states: Arc::new(RwLock::new(HashMap::new())),
            decisions: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    fn initial_state(&self) -> TierState {
        TierState {
            level: Tier::Bronze,
            per_view_rate: self.schedule.rate_for(Tier::Bronze),
            views_at_recompute: 0,
            updated_at: Utc::now(),
        }
    }

    /// Stored tier for a creator, bronze until anything is approved.
    pub async fn state_for(&self, creator_id: &str) -> TierState {
        self.states
            .read()
            .await
            .get(creator_id)
            .cloned()
            .unwrap_or_else(|| self.initial_state())
    }

    /// Current per-view rate used by view accrual.
    pub async fn current_rate(&self, creator_id: &str) -> MilliCents {
        self.state_for(creator_id).await.per_view_rate
    }

    pub fn rate_for_tier(&self, tier: Tier) -> MilliCents {
        self.schedule.rate_for(tier)
    }

    /// Reads cumulative views and returns the eligible tier without
    /// persisting anything. Eligibility is clamped to the stored tier so a
    /// view-count regression never implies a downgrade.
    pub async fn recompute(&self, creator_id: &str) -> Result<TierReview, TierError> {
        let account = self
            .accounts
            .require(creator_id)
            .await
            .map_err(|_| TierError::UnknownCreator(creator_id.to_string()))?;

        let current = self.state_for(creator_id).await.level;
        let eligible = self.schedule.eligible_for(account.total_views).max(current);

        Ok(TierReview {
            creator_id: creator_id.to_string(),
            current,
            eligible,
            total_views: account.total_views,
        })
    }

    /// Persists an upgrade. The new tier must be strictly above the stored
    /// tier and exactly the tier implied by the current view count.
    pub async fn approve(&self, creator_id: &str, new_tier: Tier) -> Result<TierState, TierError> {
        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        let review = self.recompute(creator_id).await?;
        if new_tier <= review.current || new_tier != review.eligible {
            return Err(TierError::InvalidTransition {
                current: review.current,
                requested: new_tier,
                eligible: review.eligible,
            });
        }

        if self.flags.has_blocking_flag(creator_id).await {
            return Err(TierError::Blocked);
        }

        let state = TierState {
            level: new_tier,
            per_view_rate: self.schedule.rate_for(new_tier),
            views_at_recompute: review.total_views,
            updated_at: Utc::now(),
        };
        self.states
            .write()
            .await
            .insert(creator_id.to_string(), state.clone());

        self.decisions.write().await.push(TierDecision {
            creator_id: creator_id.to_string(),
            approved: Some(new_tier),
            decided_at: Utc::now(),
        });

        info!("Creator {} upgraded to {}", creator_id, new_tier);
        self.events.emit(NotificationEvent::TierApproved {
            creator_id: creator_id.to_string(),
            tier: new_tier,
        });

        Ok(state)
    }

    /// Persistence no-op; records that the upgrade was reviewed and turned
    /// down.
    pub async fn deny(&self, creator_id: &str) -> Result<(), TierError> {
        self.accounts
            .require(creator_id)
            .await
            .map_err(|_| TierError::UnknownCreator(creator_id.to_string()))?;

        self.decisions.write().await.push(TierDecision {
            creator_id: creator_id.to_string(),
            approved: None,
            decided_at: Utc::now(),
        });
        info!("Tier upgrade denied for creator {}", creator_id);

        Ok(())
    }

    /// Creators whose eligible tier is above their stored tier; drives the
    /// admin review queue.
    pub async fn pending_eligible(&self) -> Vec<TierReview> {
        let mut pending = Vec::new();
        for account in self.accounts.all().await {
            if let Ok(review) = self.recompute(&account.user_id).await {
                if review.eligible > review.current {
                    pending.push(review);
                }
            }
        }
        pending
    }

    pub async fn decisions(&self) -> Vec<TierDecision> {
        self.decisions.read().await.clone()
    }
}
