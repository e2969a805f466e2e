// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::types::{PayoutError, PayoutRequest, PayoutStatus, WalletSnapshot};
use crate::accounts::{AccountRegistry, AccountStatus};
use crate::config::PayoutConfig;
use crate::events::{EventBus, NotificationEvent};
use crate::fraud::FlagRegistry;
use crate::ledger::LedgerStore;
use crate::wallets::WalletDirectory;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Result of the fraud-confirmation bundle.
#[derive(Debug, Clone)]
pub struct SuspensionOutcome {
    pub creator_id: String,
    pub strikes: u32,
    pub rejected_request: Option<Uuid>,
}

/// The withdrawal state machine: pending -> approved -> completed, with
/// rejection allowed from pending or approved. Submission is creator
/// initiated; every other transition is admin initiated.
///
/// All mutating operations hold the creator's lock for their whole
/// check-then-act span, so two concurrent submissions for one creator
/// cannot both pass the duplicate check, and settlement never races a
/// fraud confirmation.
pub struct PayoutManager {
    config: PayoutConfig,
    ledger: Arc<LedgerStore>,
    accounts: Arc<AccountRegistry>,
    flags: FlagRegistry,
    wallets: Arc<dyn WalletDirectory>,
    requests: Arc<RwLock<HashMap<Uuid, PayoutRequest>>>,
    events: EventBus,
}

impl PayoutManager {
    pub fn new(
        config: PayoutConfig,
        ledger: Arc<LedgerStore>,
        accounts: Arc<AccountRegistry>,
        flags: FlagRegistry,
        wallets: Arc<dyn WalletDirectory>,
        events: EventBus,
    ) -> Self {
        Self {
            config,
            ledger,
            accounts,
            flags,
            wallets,
            requests: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Creator-side submission. Snapshots the full current balance, the
    /// unpaid entry set behind it, and the wallet destination. Later
    /// accruals keep growing the balance but are not part of this request.
    pub async fn submit(&self, creator_id: &str, pin: &str) -> Result<PayoutRequest, PayoutError> {
        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        self.accounts
            .require(creator_id)
            .await
            .map_err(|_| PayoutError::UnknownCreator(creator_id.to_string()))?;

        if !self.accounts.verify_pin(creator_id, pin).await {
            return Err(PayoutError::AuthenticationFailed);
        }

        if self.open_request_for(creator_id).await.is_some() {
            return Err(PayoutError::DuplicateRequest);
        }

        let wallet = match timeout(
            self.config.external_call_timeout,
            self.wallets.wallet_for(creator_id),
        )
        .await
        {
            Err(_) => {
                return Err(PayoutError::DirectoryUnavailable(
                    "lookup timed out".to_string(),
                ))
            }
            Ok(Err(e)) => return Err(PayoutError::DirectoryUnavailable(e.to_string())),
            Ok(Ok(None)) => return Err(PayoutError::WalletNotConfigured),
            Ok(Ok(Some(record))) => record,
        };

        let balance = self.ledger.balance(creator_id).await;
        if balance < self.config.minimum_withdrawal {
            return Err(PayoutError::BelowMinimum {
                balance,
                minimum: self.config.minimum_withdrawal,
            });
        }

        let entry_ids: Vec<Uuid> = self
            .ledger
            .unpaid_entries(creator_id)
            .await
            .iter()
            .map(|e| e.id)
            .collect();

        let request = PayoutRequest {
            id: Uuid::new_v4(),
            creator_id: creator_id.to_string(),
            amount: balance,
            amount_after_fee: self.config.amount_after_fee(balance),
            fee_percent: self.config.fee_percent,
            destination: WalletSnapshot {
                crypto_type: wallet.crypto_type,
                address: wallet.wallet_address,
            },
            status: PayoutStatus::Pending,
            entry_ids,
            settlement_reference: None,
            rejection_reason: None,
            admin_note: None,
            submitted_at: Utc::now(),
            approved_at: None,
            completed_at: None,
            rejected_at: None,
        };

        self.requests
            .write()
            .await
            .insert(request.id, request.clone());

        info!(
            "Creator {} submitted payout request {} for {} cents",
            creator_id, request.id, balance
        );

        Ok(request)
    }

    /// pending -> approved. Blocking flags are re-checked here, not just at
    /// submission.
    pub async fn approve(
        &self,
        request_id: Uuid,
        admin_note: Option<String>,
    ) -> Result<PayoutRequest, PayoutError> {
        let creator_id = self.creator_of(request_id).await?;
        let lock = self.accounts.creator_lock(&creator_id).await;
        let _guard = lock.lock().await;

        if self.flags.has_blocking_flag(&creator_id).await {
            return Err(PayoutError::BlockedByFraud);
        }

        let snapshot = {
            let mut requests = self.requests.write().await;
            let request = requests
                .get_mut(&request_id)
                .ok_or(PayoutError::RequestNotFound(request_id))?;

            if request.status != PayoutStatus::Pending {
                return Err(PayoutError::InvalidTransition {
                    from: request.status,
                    action: "approve",
                });
            }

            request.status = PayoutStatus::Approved;
            request.approved_at = Some(Utc::now());
            request.admin_note = admin_note;
            request.clone()
        };

        info!(
            "Payout request {} approved for creator {}",
            request_id, creator_id
        );
        self.events.emit(NotificationEvent::PayoutApproved {
            request_id,
            creator_id,
            amount: snapshot.amount,
        });

        Ok(snapshot)
    }

    /// approved -> completed. The settlement reference attests that funds
    /// left the system externally; only then is the snapshot entry set
    /// marked paid, in one all-or-nothing ledger call.
    pub async fn complete(
        &self,
        request_id: Uuid,
        settlement_reference: &str,
    ) -> Result<PayoutRequest, PayoutError> {
        let reference = settlement_reference.trim();
        if reference.is_empty() {
            return Err(PayoutError::MissingSettlementReference);
        }

        let creator_id = self.creator_of(request_id).await?;
        let lock = self.accounts.creator_lock(&creator_id).await;
        let _guard = lock.lock().await;

        let entry_ids = {
            let requests = self.requests.read().await;
            let request = requests
                .get(&request_id)
                .ok_or(PayoutError::RequestNotFound(request_id))?;

            if request.status != PayoutStatus::Approved {
                return Err(PayoutError::InvalidTransition {
                    from: request.status,
                    action: "complete",
                });
            }
            request.entry_ids.clone()
        };

        // The snapshot set can only fail settlement if the ledger was
        // mutated outside the workflow. Treat that as fatal, leave the
        // request untouched.
        if let Err(e) = self.ledger.mark_paid(&entry_ids).await {
            error!(
                "Settlement of payout {} hit inconsistent ledger state: {}",
                request_id, e
            );
            return Err(PayoutError::SettlementIntegrity(e.to_string()));
        }

        let snapshot = {
            let mut requests = self.requests.write().await;
            let request = requests
                .get_mut(&request_id)
                .ok_or(PayoutError::RequestNotFound(request_id))?;
            request.status = PayoutStatus::Completed;
            request.settlement_reference = Some(reference.to_string());
            request.completed_at = Some(Utc::now());
            request.clone()
        };

        info!(
            "Payout request {} completed for creator {} ({} cents, ref {})",
            request_id, creator_id, snapshot.amount, reference
        );
        self.events.emit(NotificationEvent::PayoutCompleted {
            request_id,
            creator_id,
            amount: snapshot.amount,
            settlement_reference: reference.to_string(),
        });

        Ok(snapshot)
    }

    /// pending|approved -> rejected. Pure status change, the ledger is
    /// never touched.
    pub async fn reject(
        &self,
        request_id: Uuid,
        reason: &str,
    ) -> Result<PayoutRequest, PayoutError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PayoutError::MissingRejectionReason);
        }

        let creator_id = self.creator_of(request_id).await?;
        let lock = self.accounts.creator_lock(&creator_id).await;
        let _guard = lock.lock().await;

        let snapshot = self.reject_locked(request_id, reason).await?;

        info!(
            "Payout request {} rejected for creator {}: {}",
            request_id, creator_id, reason
        );

        Ok(snapshot)
    }

    /// The fraud-confirmation bundle: suspend the account, add a strike,
    /// and force-reject any open payout request, all under one creator
    /// lock so no partial application is observable.
    pub async fn suspend_creator(
        &self,
        creator_id: &str,
        reason: &str,
    ) -> Result<SuspensionOutcome, PayoutError> {
        let lock = self.accounts.creator_lock(creator_id).await;
        let _guard = lock.lock().await;

        self.accounts
            .set_status(creator_id, AccountStatus::Suspended)
            .await
            .map_err(|_| PayoutError::UnknownCreator(creator_id.to_string()))?;
        let strikes = self
            .accounts
            .add_strike(creator_id)
            .await
            .map_err(|_| PayoutError::UnknownCreator(creator_id.to_string()))?;

        let rejected_request = match self.open_request_for(creator_id).await {
            Some(request_id) => {
                self.reject_locked(request_id, reason).await?;
                Some(request_id)
            }
            None => None,
        };

        warn!(
            "Creator {} suspended (strike {}), open payout: {:?}",
            creator_id, strikes, rejected_request
        );

        Ok(SuspensionOutcome {
            creator_id: creator_id.to_string(),
            strikes,
            rejected_request,
        })
    }

    pub async fn request(&self, request_id: Uuid) -> Option<PayoutRequest> {
        self.requests.read().await.get(&request_id).cloned()
    }

    pub async fn requests(&self, status: Option<PayoutStatus>) -> Vec<PayoutRequest> {
        let mut requests: Vec<PayoutRequest> = self
            .requests
            .read()
            .await
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.submitted_at);
        requests
    }

    pub async fn requests_for(&self, creator_id: &str) -> Vec<PayoutRequest> {
        let mut requests: Vec<PayoutRequest> = self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.creator_id == creator_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.submitted_at);
        requests
    }

    async fn creator_of(&self, request_id: Uuid) -> Result<String, PayoutError> {
        self.requests
            .read()
            .await
            .get(&request_id)
            .map(|r| r.creator_id.clone())
            .ok_or(PayoutError::RequestNotFound(request_id))
    }

    async fn open_request_for(&self, creator_id: &str) -> Option<Uuid> {
        self.requests
            .read()
            .await
            .values()
            .find(|r| r.creator_id == creator_id && !r.status.is_terminal())
            .map(|r| r.id)
    }

    /// Caller holds the creator lock and has validated the reason.
    async fn reject_locked(
        &self,
        request_id: Uuid,
        reason: &str,
    ) -> Result<PayoutRequest, PayoutError> {
        let snapshot = {
            let mut requests = self.requests.write().await;
            let request = requests
                .get_mut(&request_id)
                .ok_or(PayoutError::RequestNotFound(request_id))?;

            if request.status.is_terminal() {
                return Err(PayoutError::InvalidTransition {
                    from: request.status,
                    action: "reject",
                });
            }

            request.status = PayoutStatus::Rejected;
            request.rejection_reason = Some(reason.to_string());
            request.rejected_at = Some(Utc::now());
            request.clone()
        };

        self.events.emit(NotificationEvent::PayoutRejected {
            request_id,
            creator_id: snapshot.creator_id.clone(),
            reason: reason.to_string(),
        });

        Ok(snapshot)
    }
}
