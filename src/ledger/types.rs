use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary amounts are USD cents, signed. Deductions are negative.
pub type Cents = i64;

/// Per-view rates are thousandths of a cent so that sub-cent rates stay
/// integer arithmetic end to end.
pub type MilliCents = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    ViewEarning,
    AdminBonus,
    AdminDeduction,
    PromoBonus,
}

/// One append-only accounting record. Immutable after creation except the
/// `paid` flag, which flips false -> true exactly once at settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub creator_id: String,
    pub source: EntrySource,
    pub amount: Cents,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Entry amount must be non-zero")]
    InvalidAmount,

    #[error("Entry already paid: {0}")]
    AlreadyPaid(Uuid),

    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
}
