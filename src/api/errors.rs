// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::accounts::AccountError;
use crate::admin::AdminError;
use crate::fraud::FraudError;
use crate::ingestion::AccrualError;
use crate::ledger::LedgerError;
use crate::offers::OfferError;
use crate::payouts::PayoutError;
use crate::tiers::TierError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// HTTP-facing error taxonomy. Validation and conflict errors are surfaced
/// verbatim; policy blocks carry a machine-readable reason code so a UI can
/// explain why rather than treating the refusal as a bug.
#[derive(Debug, Clone)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    Unauthorized(String),
    PolicyBlocked { reason: String, message: String },
    Conflict(String),
    Timeout(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Unauthorized(msg) => ("unauthorized", msg.clone(), None),
            ApiError::PolicyBlocked { reason, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "reason".to_string(),
                    serde_json::Value::String(reason.clone()),
                );
                ("policy_blocked", message.clone(), Some(details))
            }
            ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
            ApiError::Timeout(msg) => ("timeout", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::PolicyBlocked { .. } => 403,
            ApiError::Conflict(_) => 409,
            ApiError::Timeout(_) => 504,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::PolicyBlocked { reason, message } => {
                write!(f, "Blocked ({}): {}", reason, message)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response(None))).into_response()
    }
}

impl From<PayoutError> for ApiError {
    fn from(err: PayoutError) -> Self {
        match &err {
            PayoutError::AuthenticationFailed => ApiError::Unauthorized(err.to_string()),
            PayoutError::BelowMinimum { .. } => ApiError::PolicyBlocked {
                reason: "below_minimum".to_string(),
                message: err.to_string(),
            },
            PayoutError::BlockedByFraud => ApiError::PolicyBlocked {
                reason: "blocked_by_fraud".to_string(),
                message: err.to_string(),
            },
            PayoutError::DuplicateRequest | PayoutError::InvalidTransition { .. } => {
                ApiError::Conflict(err.to_string())
            }
            PayoutError::WalletNotConfigured => ApiError::InvalidRequest(err.to_string()),
            PayoutError::MissingSettlementReference => ApiError::ValidationError {
                field: "settlement_reference".to_string(),
                message: err.to_string(),
            },
            PayoutError::MissingRejectionReason => ApiError::ValidationError {
                field: "reason".to_string(),
                message: err.to_string(),
            },
            PayoutError::DirectoryUnavailable(_) => ApiError::Timeout(err.to_string()),
            PayoutError::RequestNotFound(_) | PayoutError::UnknownCreator(_) => {
                ApiError::NotFound(err.to_string())
            }
            PayoutError::SettlementIntegrity(_) => {
                error!("{}", err);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::InvalidAmount => ApiError::InvalidRequest(err.to_string()),
            LedgerError::AlreadyPaid(_) => ApiError::Conflict(err.to_string()),
            LedgerError::EntryNotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<TierError> for ApiError {
    fn from(err: TierError) -> Self {
        match &err {
            TierError::UnknownCreator(_) => ApiError::NotFound(err.to_string()),
            TierError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            TierError::Blocked => ApiError::PolicyBlocked {
                reason: "blocked_by_fraud".to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<FraudError> for ApiError {
    fn from(err: FraudError) -> Self {
        match &err {
            FraudError::FlagNotFound(_) | FraudError::UnknownCreator(_) => {
                ApiError::NotFound(err.to_string())
            }
            FraudError::InvalidTransition(_) => ApiError::Conflict(err.to_string()),
            FraudError::Enforcement(_) => {
                error!("{}", err);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match &err {
            AccountError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AccountError::AlreadyRegistered(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidAmount => ApiError::ValidationError {
                field: "amount_cents".to_string(),
                message: "Amount must be positive".to_string(),
            },
            AdminError::UnknownCreator(id) => ApiError::NotFound(format!("Creator {}", id)),
            AdminError::Ledger(e) => e.into(),
        }
    }
}

impl From<AccrualError> for ApiError {
    fn from(err: AccrualError) -> Self {
        match err {
            AccrualError::Account(e) => e.into(),
            AccrualError::Ledger(e) => e.into(),
        }
    }
}

impl From<OfferError> for ApiError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::UnknownOffer(_) => ApiError::NotFound(err.to_string()),
            OfferError::OfferInactive(_) => ApiError::Conflict(err.to_string()),
            OfferError::NothingToRedeem => ApiError::InvalidRequest(err.to_string()),
            OfferError::Account(e) => e.into(),
            OfferError::Ledger(e) => e.into(),
        }
    }
}
