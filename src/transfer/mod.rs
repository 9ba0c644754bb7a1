//! Credit Transfer Coordinator
//!
//! Moves on-board credit between two profile documents as a single
//! all-or-nothing unit of work. The store is only atomic per document, so
//! the coordinator runs an optimistic compare-and-swap protocol across the
//! pair instead of holding locks.
//!
//! # State Machine
//!
//! ```text
//! VALIDATING → LOADING → COMPUTING → COMMITTING_SOURCE → COMMITTING_DESTINATION → COMPLETED
//!                 ↑                          │                      │
//!                 └──────── conflict ────────┴──────────────────────┘
//! ```
//!
//! # Safety Invariants
//!
//! 1. **No locks across suspension points**: conflicts are detected by
//!    version tokens and absorbed by bounded retry with backoff + jitter.
//! 2. **Compensate before surfacing**: a failed credit after a durable debit
//!    rolls the source back before any error reaches the caller.
//! 3. **Reservation before commit**: an idempotency token is claimed with a
//!    create-only insert, so identical concurrent requests cannot both apply.
//! 4. **Cancellation-safe commit**: the commit sequence runs on a detached
//!    task; dropping the caller's future cannot strand an issued debit.

pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod state;
pub mod types;


// Re-exports for convenience
pub use coordinator::{RetryPolicy, TransferCoordinator};
pub use error::TransferError;
pub use ledger::{IdempotencyLedger, LedgerEntry, Reservation};
pub use state::TransferPhase;
pub use types::{TransferId, TransferOutcome, TransferRequest};
