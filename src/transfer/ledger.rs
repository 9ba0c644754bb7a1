//! Idempotency Ledger
//!
//! Side collection mapping client-supplied tokens to transfer outcomes.
//! The entry lifecycle is reserve → record (or release on failure):
//!
//! - `reserve` claims the token with a create-only insert, which is the
//!   atomic-upsert guard against two identical in-flight requests.
//! - `record` overwrites the reservation with the completed outcome, so a
//!   later retry replays the original result without touching balances.
//! - `release` drops a reservation whose transfer failed, allowing a
//!   legitimate client retry with the same token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::TransferError;
use super::types::{TransferId, TransferOutcome};
use crate::store::{DocumentStore, StoreError, collections, get_typed, insert_typed};

/// Persisted ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LedgerEntry {
    /// Token claimed, transfer in flight
    Pending {
        transfer_id: TransferId,
        created_at: i64,
    },
    /// Transfer completed; outcome replayed to retried requests
    Completed {
        outcome: TransferOutcome,
        recorded_at: i64,
    },
}

/// Result of a reservation attempt
#[derive(Debug)]
pub enum Reservation {
    /// Token claimed by this request; proceed with the transfer
    Acquired,
    /// Token already completed; return the recorded outcome verbatim
    Replay(Box<TransferOutcome>),
    /// Token claimed by a concurrent identical request still in flight
    InFlight,
}

/// Idempotency ledger over the document store.
#[derive(Clone)]
pub struct IdempotencyLedger {
    store: Arc<dyn DocumentStore>,
}

impl IdempotencyLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Claim `token` for `transfer_id`.
    ///
    /// The create-only insert makes this race-safe: of two identical
    /// concurrent requests, exactly one acquires the reservation.
    pub async fn reserve(
        &self,
        token: &str,
        transfer_id: TransferId,
    ) -> Result<Reservation, TransferError> {
        let entry = LedgerEntry::Pending {
            transfer_id,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        match insert_typed(
            self.store.as_ref(),
            collections::TRANSFER_LEDGER,
            token,
            &entry,
        )
        .await
        {
            Ok(_) => Ok(Reservation::Acquired),
            Err(StoreError::AlreadyExists { .. }) => self.lookup(token).await,
            Err(StoreError::Unavailable(msg)) => Err(TransferError::StoreUnavailable(msg)),
            Err(e) => Err(TransferError::Internal(e.to_string())),
        }
    }

    /// Overwrite the reservation with the completed outcome.
    pub async fn record(&self, token: &str, outcome: &TransferOutcome) -> Result<(), TransferError> {
        let (_, cas) = get_typed::<LedgerEntry>(
            self.store.as_ref(),
            collections::TRANSFER_LEDGER,
            token,
        )
        .await
        .map_err(|e| TransferError::Internal(format!("ledger reservation lost: {e}")))?;

        let entry = LedgerEntry::Completed {
            outcome: outcome.clone(),
            recorded_at: chrono::Utc::now().timestamp_millis(),
        };
        let raw = serde_json::to_value(&entry)
            .map_err(|e| TransferError::Internal(format!("serialize ledger entry: {e}")))?;

        self.store
            .replace(collections::TRANSFER_LEDGER, token, raw, cas)
            .await
            .map_err(|e| TransferError::Internal(format!("record ledger entry: {e}")))?;
        Ok(())
    }

    /// Drop the reservation for a failed transfer.
    pub async fn release(&self, token: &str) -> Result<(), TransferError> {
        match self
            .store
            .remove(collections::TRANSFER_LEDGER, token)
            .await
        {
            Ok(()) | Err(StoreError::NotFound { .. }) => Ok(()),
            Err(e) => Err(TransferError::Internal(e.to_string())),
        }
    }

    async fn lookup(&self, token: &str) -> Result<Reservation, TransferError> {
        match get_typed::<LedgerEntry>(self.store.as_ref(), collections::TRANSFER_LEDGER, token)
            .await
        {
            Ok((LedgerEntry::Completed { outcome, .. }, _)) => {
                Ok(Reservation::Replay(Box::new(outcome)))
            }
            Ok((LedgerEntry::Pending { .. }, _)) => Ok(Reservation::InFlight),
            // Reservation released between our insert attempt and the read;
            // treat as in flight and let the caller retry.
            Err(StoreError::NotFound { .. }) => Ok(Reservation::InFlight),
            Err(StoreError::Unavailable(msg)) => Err(TransferError::StoreUnavailable(msg)),
            Err(e) => Err(TransferError::Internal(e.to_string())),
        }
    }
}
