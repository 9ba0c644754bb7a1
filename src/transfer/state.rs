//! Transfer Attempt State Definitions

use std::fmt;

/// Per-attempt transfer states
///
/// ```text
/// VALIDATING → LOADING → COMPUTING → COMMITTING_SOURCE → COMMITTING_DESTINATION → COMPLETED
///                 ↑                          │                      │
///                 └──────── conflict ────────┴──────────────────────┘
/// ```
///
/// Terminal states: COMPLETED, FAILED. A conflict in either committing state
/// sends the attempt back to LOADING (bounded by the retry policy); any
/// non-retryable error goes to FAILED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPhase {
    /// Input checks - no store access has happened yet
    Validating,

    /// Reading both profile documents and their version tokens
    Loading,

    /// Deriving the post-transfer balances and the funds check
    Computing,

    /// Conditional debit write against the source document
    CommittingSource,

    /// Source debit durable - funds are IN-FLIGHT until the credit lands
    CommittingDestination,

    /// Terminal: both writes visible
    Completed,

    /// Terminal: no net mutation remains
    Failed,
}

impl TransferPhase {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferPhase::Completed | TransferPhase::Failed)
    }

    /// Check if funds are in-flight (source debited, credit not confirmed)
    #[inline]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TransferPhase::CommittingDestination)
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Validating => "VALIDATING",
            TransferPhase::Loading => "LOADING",
            TransferPhase::Computing => "COMPUTING",
            TransferPhase::CommittingSource => "COMMITTING_SOURCE",
            TransferPhase::CommittingDestination => "COMMITTING_DESTINATION",
            TransferPhase::Completed => "COMPLETED",
            TransferPhase::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
