use crate::ledger::Cents;
use crate::tiers::Tier;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Events handed to the external notification dispatcher. The core only
/// guarantees emission, never delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    PayoutApproved {
        request_id: Uuid,
        creator_id: String,
        amount: Cents,
    },
    PayoutCompleted {
        request_id: Uuid,
        creator_id: String,
        amount: Cents,
        settlement_reference: String,
    },
    PayoutRejected {
        request_id: Uuid,
        creator_id: String,
        reason: String,
    },
    FlagConfirmed {
        flag_id: Uuid,
        creator_id: String,
        strikes: u32,
    },
    TierApproved {
        creator_id: String,
        tier: Tier,
    },
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::PayoutApproved { .. } => "payout.approved",
            NotificationEvent::PayoutCompleted { .. } => "payout.completed",
            NotificationEvent::PayoutRejected { .. } => "payout.rejected",
            NotificationEvent::FlagConfirmed { .. } => "flag.confirmed",
            NotificationEvent::TierApproved { .. } => "tier.approved",
        }
    }
}

/// Fire-and-forget emitter over a bounded channel. A full or disconnected
/// channel drops the event with a warning; the dispatcher owns delivery.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<NotificationEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: NotificationEvent) {
        let kind = event.kind();
        if self.tx.try_send(event).is_err() {
            warn!("Dropped {} notification, dispatcher not draining", kind);
        }
    }
}
