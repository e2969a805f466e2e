use crate::ledger::MilliCents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Performance band determining the per-view earning rate. Ordered so tier
/// progression can be compared directly.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Bronze => write!(f, "bronze"),
            Tier::Silver => write!(f, "silver"),
            Tier::Gold => write!(f, "gold"),
            Tier::Platinum => write!(f, "platinum"),
        }
    }
}

/// Persisted tier for one creator. The rate is always the pure mapping of
/// the level, never edited per creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierState {
    pub level: Tier,
    pub per_view_rate: MilliCents,
    pub views_at_recompute: u64,
    pub updated_at: DateTime<Utc>,
}

/// Result of an eligibility recompute; nothing is persisted until an admin
/// approves the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierReview {
    pub creator_id: String,
    pub current: Tier,
    pub eligible: Tier,
    pub total_views: u64,
}

/// Audit record of an admin tier decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierDecision {
    pub creator_id: String,
    pub approved: Option<Tier>,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TierError {
    #[error("Creator not found: {0}")]
    UnknownCreator(String),

    #[error(
        "Invalid tier transition for creator: current {current}, requested {requested}, eligible {eligible}"
    )]
    InvalidTransition {
        current: Tier,
        requested: Tier,
        eligible: Tier,
    },

    #[error("Tier change blocked by an open fraud flag")]
    Blocked,
}
