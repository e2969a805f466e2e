use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FlagSeverity {
    /// High and critical pending flags block payouts and tier changes.
    pub fn is_blocking(&self) -> bool {
        matches!(self, FlagSeverity::High | FlagSeverity::Critical)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Pending,
    Investigating,
    Resolved,
    Confirmed,
}

impl FlagStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, FlagStatus::Pending | FlagStatus::Investigating)
    }
}

/// Resolution outcome. Confirmed is the only one with side effects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlagOutcome {
    Resolved,
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudFlag {
    pub id: Uuid,
    pub creator_id: String,
    pub flag_type: String,
    pub severity: FlagSeverity,
    pub description: String,
    pub status: FlagStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    pub raised_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum FraudError {
    #[error("Fraud flag not found: {0}")]
    FlagNotFound(Uuid),

    #[error("Flag is already {0:?} and cannot transition")]
    InvalidTransition(FlagStatus),

    #[error("Creator not found: {0}")]
    UnknownCreator(String),

    #[error("Suspension enforcement failed: {0}")]
    Enforcement(String),
}
