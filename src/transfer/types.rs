//! Transfer Core Types

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transfer ID - ULID-based unique identifier
///
/// ULIDs are monotonic, sortable and need no coordination between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(ulid::Ulid);

impl TransferId {
    /// Generate a new unique TransferId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransferId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Ephemeral transfer intent. Constructed per call, never persisted.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Profile being debited
    pub source: Uuid,
    /// Profile being credited
    pub dest: Uuid,
    /// Positive fixed-point amount, at most 2 decimal places
    pub amount: Decimal,
    /// Client-provided idempotency token (optional)
    pub token: Option<String>,
}

impl TransferRequest {
    /// Create a new transfer request
    pub fn new(source: Uuid, dest: Uuid, amount: Decimal) -> Self {
        Self {
            source,
            dest,
            amount,
            token: None,
        }
    }

    /// Create a request with a client idempotency token
    pub fn with_token(source: Uuid, dest: Uuid, amount: Decimal, token: impl Into<String>) -> Self {
        Self {
            source,
            dest,
            amount,
            token: Some(token.into()),
        }
    }
}

/// Successful transfer result, returned to the caller and recorded in the
/// idempotency ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub transfer_id: TransferId,
    pub source: Uuid,
    pub dest: Uuid,
    pub amount: Decimal,
    /// Source balance after the debit
    pub source_balance: Decimal,
    /// Destination balance after the credit
    pub dest_balance: Decimal,
    /// Completion timestamp (millis)
    pub completed_at: i64,
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer[{}] {} -> {} amount={} balances=({}, {})",
            self.transfer_id,
            self.source,
            self.dest,
            self.amount,
            self.source_balance,
            self.dest_balance
        )
    }
}
