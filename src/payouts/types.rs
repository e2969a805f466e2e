use crate::ledger::Cents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl PayoutStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PayoutStatus::Completed | PayoutStatus::Rejected)
    }
}

/// Destination captured at submission time so later wallet edits never
/// retroactively alter a pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub crypto_type: String,
    pub address: String,
}

/// One withdrawal attempt. The amount is the full balance at submission;
/// `entry_ids` is the unpaid entry set whose sum is exactly that amount,
/// and settlement marks exactly those entries paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub id: Uuid,
    pub creator_id: String,
    pub amount: Cents,
    /// Informational figure shown to the creator; the ledger settles the
    /// full amount and the external rail takes any fee.
    pub amount_after_fee: Cents,
    pub fee_percent: f64,
    pub destination: WalletSnapshot,
    pub status: PayoutStatus,
    pub entry_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PayoutError {
    #[error("Balance {balance} is below the {minimum} cent withdrawal minimum")]
    BelowMinimum { balance: Cents, minimum: Cents },

    #[error("A withdrawal request is already open for this creator")]
    DuplicateRequest,

    #[error("No wallet configured for this creator")]
    WalletNotConfigured,

    #[error("Withdrawal PIN did not match")]
    AuthenticationFailed,

    #[error("Blocked by an open fraud flag or account suspension")]
    BlockedByFraud,

    #[error("Payout request not found: {0}")]
    RequestNotFound(Uuid),

    #[error("Cannot {action} a request in {from:?} state")]
    InvalidTransition {
        from: PayoutStatus,
        action: &'static str,
    },

    #[error("A non-empty settlement reference is required")]
    MissingSettlementReference,

    #[error("A non-empty rejection reason is required")]
    MissingRejectionReason,

    #[error("Wallet directory unavailable, retry: {0}")]
    DirectoryUnavailable(String),

    #[error("Creator not found: {0}")]
    UnknownCreator(String),

    #[error("Settlement integrity violation: {0}")]
    SettlementIntegrity(String),
}
