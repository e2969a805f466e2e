// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::errors::ApiError;
use super::server::AppState;
use crate::accounts::{CreatorAccount, CreatorId};
use crate::admin::{CreatorOverview, MassBonusReport};
use crate::fraud::{FlagOutcome, FlagSeverity, FlagStatus, FraudFlag};
use crate::ledger::{Cents, LedgerEntry};
use crate::payouts::{PayoutRequest, PayoutStatus};
use crate::tiers::{Tier, TierReview, TierState};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
    })
}

// --- admin: creators ---

pub async fn list_creators(
    State(state): State<AppState>,
) -> Result<Json<Vec<CreatorOverview>>, ApiError> {
    Ok(Json(state.admin.creator_overview().await))
}

#[derive(Debug, Deserialize)]
pub struct RegisterCreatorRequest {
    pub user_id: String,
}

pub async fn register_creator(
    State(state): State<AppState>,
    Json(body): Json<RegisterCreatorRequest>,
) -> Result<Json<CreatorAccount>, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::ValidationError {
            field: "user_id".to_string(),
            message: "user_id must not be empty".to_string(),
        });
    }
    let account = state.accounts.register(body.user_id.trim()).await?;
    Ok(Json(account))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceAction {
    Fund,
    Debit,
}

#[derive(Debug, Deserialize)]
pub struct BalanceAdjustRequest {
    pub action: BalanceAction,
    pub amount_cents: Cents,
    pub reason: String,
}

pub async fn adjust_balance(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(body): Json<BalanceAdjustRequest>,
) -> Result<Json<LedgerEntry>, ApiError> {
    let entry = match body.action {
        BalanceAction::Fund => {
            state
                .admin
                .fund(&creator_id, body.amount_cents, &body.reason)
                .await?
        }
        BalanceAction::Debit => {
            state
                .admin
                .debit(&creator_id, body.amount_cents, &body.reason)
                .await?
        }
    };
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct MassBonusRequest {
    pub amount_cents: Cents,
    pub reason: String,
}

pub async fn mass_bonus(
    State(state): State<AppState>,
    Json(body): Json<MassBonusRequest>,
) -> Result<Json<MassBonusReport>, ApiError> {
    if body.amount_cents <= 0 {
        return Err(ApiError::ValidationError {
            field: "amount_cents".to_string(),
            message: "Amount must be positive".to_string(),
        });
    }
    Ok(Json(
        state.admin.mass_bonus(body.amount_cents, &body.reason).await,
    ))
}

#[derive(Debug, Deserialize)]
pub struct IngestViewsRequest {
    pub views: u64,
}

#[derive(Debug, Serialize)]
pub struct IngestViewsResponse {
    pub creator_id: String,
    pub views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<LedgerEntry>,
}

pub async fn ingest_views(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(body): Json<IngestViewsRequest>,
) -> Result<Json<IngestViewsResponse>, ApiError> {
    let entry = state.ingestor.accrue(&creator_id, body.views).await?;
    Ok(Json(IngestViewsResponse {
        creator_id,
        views: body.views,
        entry,
    }))
}

// --- admin: payouts ---

#[derive(Debug, Deserialize)]
pub struct PayoutListQuery {
    pub status: Option<PayoutStatus>,
}

pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<PayoutListQuery>,
) -> Result<Json<Vec<PayoutRequest>>, ApiError> {
    Ok(Json(state.payouts.requests(query.status).await))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutAction {
    Approve,
    Complete,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct PayoutActionRequest {
    pub action: PayoutAction,
    pub note: Option<String>,
    pub settlement_reference: Option<String>,
    pub reason: Option<String>,
}

pub async fn decide_payout(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<PayoutActionRequest>,
) -> Result<Json<PayoutRequest>, ApiError> {
    let request = match body.action {
        PayoutAction::Approve => state.payouts.approve(request_id, body.note).await?,
        PayoutAction::Complete => {
            let reference = body.settlement_reference.unwrap_or_default();
            state.payouts.complete(request_id, &reference).await?
        }
        PayoutAction::Reject => {
            let reason = body.reason.unwrap_or_default();
            state.payouts.reject(request_id, &reason).await?
        }
    };
    Ok(Json(request))
}

// --- admin: tiers ---

pub async fn list_tiers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TierReview>>, ApiError> {
    Ok(Json(state.tiers.pending_eligible().await))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierAction {
    Approve,
    Deny,
}

#[derive(Debug, Deserialize)]
pub struct TierActionRequest {
    pub action: TierAction,
    pub tier: Option<Tier>,
}

#[derive(Debug, Serialize)]
pub struct TierDecisionResponse {
    pub creator_id: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TierState>,
}

pub async fn decide_tier(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(body): Json<TierActionRequest>,
) -> Result<Json<TierDecisionResponse>, ApiError> {
    match body.action {
        TierAction::Approve => {
            let tier = match body.tier {
                Some(tier) => tier,
                None => state.tiers.recompute(&creator_id).await?.eligible,
            };
            let new_state = state.tiers.approve(&creator_id, tier).await?;
            Ok(Json(TierDecisionResponse {
                creator_id,
                approved: true,
                state: Some(new_state),
            }))
        }
        TierAction::Deny => {
            state.tiers.deny(&creator_id).await?;
            Ok(Json(TierDecisionResponse {
                creator_id,
                approved: false,
                state: None,
            }))
        }
    }
}

// --- admin: fraud flags ---

#[derive(Debug, Deserialize)]
pub struct FlagListQuery {
    pub status: Option<FlagStatus>,
}

pub async fn list_flags(
    State(state): State<AppState>,
    Query(query): Query<FlagListQuery>,
) -> Result<Json<Vec<FraudFlag>>, ApiError> {
    Ok(Json(state.fraud.flags(query.status).await))
}

#[derive(Debug, Deserialize)]
pub struct RaiseFlagRequest {
    pub creator_id: String,
    pub flag_type: String,
    pub severity: FlagSeverity,
    pub description: String,
}

pub async fn raise_flag(
    State(state): State<AppState>,
    Json(body): Json<RaiseFlagRequest>,
) -> Result<Json<FraudFlag>, ApiError> {
    let flag = state
        .fraud
        .raise(
            &body.creator_id,
            &body.flag_type,
            body.severity,
            &body.description,
        )
        .await?;
    Ok(Json(flag))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagPatchStatus {
    Investigating,
    Resolved,
    Confirmed,
}

#[derive(Debug, Deserialize)]
pub struct FlagUpdateRequest {
    pub status: FlagPatchStatus,
    pub action_taken: Option<String>,
}

pub async fn update_flag(
    State(state): State<AppState>,
    Path(flag_id): Path<Uuid>,
    Json(body): Json<FlagUpdateRequest>,
) -> Result<Json<FraudFlag>, ApiError> {
    let flag = match body.status {
        FlagPatchStatus::Investigating => state.fraud.begin_investigation(flag_id).await?,
        FlagPatchStatus::Resolved => {
            state
                .fraud
                .resolve(flag_id, FlagOutcome::Resolved, body.action_taken)
                .await?
        }
        FlagPatchStatus::Confirmed => {
            state
                .fraud
                .resolve(flag_id, FlagOutcome::Confirmed, body.action_taken)
                .await?
        }
    };
    Ok(Json(flag))
}

// --- creator surface ---

async fn require_creator(state: &AppState, headers: &HeaderMap) -> Result<CreatorId, ApiError> {
    let token = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing x-user-id header".to_string()))?;

    let resolved = timeout(state.identity_timeout, state.identity.resolve(token))
        .await
        .map_err(|_| ApiError::Timeout("Identity lookup timed out".to_string()))?
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    resolved.ok_or_else(|| ApiError::Unauthorized("Unknown identity".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalSubmitRequest {
    pub pin: String,
}

pub async fn submit_withdrawal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<WithdrawalSubmitRequest>,
) -> Result<Json<PayoutRequest>, ApiError> {
    let creator_id = require_creator(&state, &headers).await?;
    let request = state.payouts.submit(&creator_id, &body.pin).await?;
    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    pub pin: String,
}

pub async fn set_withdrawal_pin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetPinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let creator_id = require_creator(&state, &headers).await?;
    if body.pin.len() < 4 {
        return Err(ApiError::ValidationError {
            field: "pin".to_string(),
            message: "PIN must be at least 4 characters".to_string(),
        });
    }
    state
        .accounts
        .set_withdrawal_pin(&creator_id, &body.pin)
        .await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub creator_id: String,
    pub balance_cents: Cents,
    pub total_earned_cents: Cents,
    pub total_paid_out_cents: Cents,
    pub minimum_withdrawal_cents: Cents,
}

pub async fn get_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BalanceResponse>, ApiError> {
    let creator_id = require_creator(&state, &headers).await?;
    state.accounts.require(&creator_id).await?;

    Ok(Json(BalanceResponse {
        balance_cents: state.ledger.balance(&creator_id).await,
        total_earned_cents: state.ledger.total_earned(&creator_id).await,
        total_paid_out_cents: state.ledger.total_paid_out(&creator_id).await,
        minimum_withdrawal_cents: state.minimum_withdrawal,
        creator_id,
    }))
}

#[derive(Debug, Serialize)]
pub struct TierStatusResponse {
    pub creator_id: String,
    pub current: TierState,
    pub eligible: Tier,
    pub total_views: u64,
}

pub async fn get_tier_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TierStatusResponse>, ApiError> {
    let creator_id = require_creator(&state, &headers).await?;
    let review = state.tiers.recompute(&creator_id).await?;
    let current = state.tiers.state_for(&creator_id).await;

    Ok(Json(TierStatusResponse {
        creator_id,
        current,
        eligible: review.eligible,
        total_views: review.total_views,
    }))
}
