//! Credit transfer handler

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};
use crate::money::{StrictAmount, format_amount};
use crate::transfer::{TransferOutcome, TransferRequest};

/// API request for a credit transfer
#[derive(Debug, Deserialize)]
pub struct TransferApiRequest {
    /// Source profile id
    pub from: Uuid,
    /// Destination profile id
    pub to: Uuid,
    /// Amount as a string (format validated by StrictAmount)
    pub amount: StrictAmount,
    /// Optional client idempotency token
    #[serde(default)]
    pub cid: Option<String>,
}

/// API response for a completed transfer
#[derive(Debug, Serialize)]
pub struct TransferApiResponse {
    /// Unique transfer ID (ULID format)
    pub transfer_id: String,
    pub status: String,
    pub from: Uuid,
    pub to: Uuid,
    pub amount: String,
    /// Source balance after the debit
    pub source_balance: String,
    /// Destination balance after the credit
    pub dest_balance: String,
    /// Completion timestamp (milliseconds)
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

impl TransferApiResponse {
    fn from_outcome(outcome: TransferOutcome, cid: Option<String>) -> Self {
        Self {
            transfer_id: outcome.transfer_id.to_string(),
            status: "COMPLETED".to_string(),
            from: outcome.source,
            to: outcome.dest,
            amount: format_amount(outcome.amount),
            source_balance: format_amount(outcome.source_balance),
            dest_balance: format_amount(outcome.dest_balance),
            timestamp: outcome.completed_at,
            cid,
        }
    }
}

/// POST /api/v1/profile/transfer
///
/// Moves on-board credit between two profiles as one atomic unit. Every
/// failure kind maps to a distinct status/code pair (see the transfer error
/// taxonomy), so clients can tell retryable outcomes from final ones.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> ApiResult<TransferApiResponse> {
    tracing::info!("Transfer request: {} -> {}", req.from, req.to);

    let core_req = TransferRequest {
        source: req.from,
        dest: req.to,
        amount: req.amount.inner(),
        token: req.cid.clone(),
    };

    match state.coordinator.transfer(core_req).await {
        Ok(outcome) => ok(TransferApiResponse::from_outcome(outcome, req.cid)),
        Err(e) => {
            tracing::warn!("Transfer rejected: {e}");
            ApiError::from(e).into_err()
        }
    }
}
