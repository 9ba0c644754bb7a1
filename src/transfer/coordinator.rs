//! Credit Transfer Coordinator
//!
//! Moves on-board credit between two profile documents as an all-or-nothing
//! unit of work, over a store that is only atomic per document. The two
//! conditional writes are sequenced so an external reader sees either the
//! pre-transfer pair of balances or the post-transfer pair, never a
//! half-applied state that survives the operation.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::TransferError;
use super::ledger::{IdempotencyLedger, Reservation};
use super::state::TransferPhase;
use super::types::{TransferId, TransferOutcome, TransferRequest};
use crate::config::TransferConfig;
use crate::models::Profile;
use crate::money;
use crate::store::{DocumentStore, StoreError, collections, get_typed, replace_typed};

/// Bounded-retry policy for write conflicts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempt count per transfer (including the first)
    pub max_attempts: u32,
    /// Base backoff before the second attempt (millis)
    pub backoff_base_ms: u64,
    /// Backoff ceiling (millis)
    pub backoff_cap_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            backoff_base_ms: 5,
            backoff_cap_ms: 250,
        }
    }
}

impl From<&TransferConfig> for RetryPolicy {
    fn from(config: &TransferConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_base_ms: config.backoff_base_ms,
            backoff_cap_ms: config.backoff_cap_ms,
        }
    }
}

impl RetryPolicy {
    /// Full-jitter exponential backoff for the given (1-based) attempt.
    fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let ceiling = self
            .backoff_base_ms
            .saturating_mul(1u64 << shift)
            .min(self.backoff_cap_ms);
        let jittered = rand::thread_rng().gen_range(0..=ceiling);
        Duration::from_millis(jittered)
    }
}

/// Attempt-level failure split: conflicts restart from the load step,
/// everything else is final.
enum AttemptError {
    Conflict { phase: TransferPhase },
    Fatal(TransferError),
}

/// Coordinates atomic balance transfers between profile documents.
pub struct TransferCoordinator {
    store: Arc<dyn DocumentStore>,
    ledger: IdempotencyLedger,
    policy: RetryPolicy,
}

impl TransferCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, policy: RetryPolicy) -> Self {
        let ledger = IdempotencyLedger::new(store.clone());
        Self {
            store,
            ledger,
            policy,
        }
    }

    /// Execute a transfer to completion.
    ///
    /// Validation and the idempotency check run inline; the commit sequence
    /// runs on a detached task, so cancelling the caller after the source
    /// debit has been issued cannot strand a half-applied transfer.
    pub async fn transfer(&self, req: TransferRequest) -> Result<TransferOutcome, TransferError> {
        validate(&req)?;

        let transfer_id = TransferId::new();
        let token = req.token.clone();

        if let Some(ref t) = token {
            match self.ledger.reserve(t, transfer_id).await? {
                Reservation::Acquired => {}
                Reservation::Replay(outcome) => {
                    info!(
                        transfer_id = %outcome.transfer_id,
                        "Idempotent replay for token {t}"
                    );
                    return Ok(*outcome);
                }
                Reservation::InFlight => {
                    return Err(TransferError::DuplicateInFlight(t.clone()));
                }
            }
        }

        debug!(
            transfer_id = %transfer_id,
            "Transfer accepted: {} -> {} amount={}",
            req.source, req.dest, req.amount
        );

        let store = Arc::clone(&self.store);
        let ledger = self.ledger.clone();
        let policy = self.policy.clone();

        let handle = tokio::spawn(async move {
            let result = run_to_completion(store.as_ref(), &policy, transfer_id, &req).await;

            match &result {
                Ok(outcome) => {
                    if let Some(ref t) = token
                        && let Err(e) = ledger.record(t, outcome).await
                    {
                        // Balances already moved. The stranded reservation
                        // keeps the token blocked, so a retry cannot apply
                        // the debit twice.
                        warn!(
                            transfer_id = %outcome.transfer_id,
                            "Failed to record idempotency outcome: {e}"
                        );
                    }
                }
                Err(err) => {
                    debug!(transfer_id = %transfer_id, "Transfer failed: {err}");
                    if let Some(ref t) = token
                        && let Err(e) = ledger.release(t).await
                    {
                        warn!(transfer_id = %transfer_id, "Failed to release token {t}: {e}");
                    }
                }
            }

            result
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => Err(TransferError::Internal(format!("transfer task aborted: {e}"))),
        }
    }
}

/// Input checks. Fails fast - no store access happens before these pass.
fn validate(req: &TransferRequest) -> Result<(), TransferError> {
    money::validate_amount(req.amount).map_err(|e| TransferError::Validation(e.to_string()))?;

    if req.source.is_nil() || req.dest.is_nil() {
        return Err(TransferError::Validation(
            "profile identifier must not be nil".into(),
        ));
    }
    if req.source == req.dest {
        return Err(TransferError::Validation(
            "source and destination profiles must differ".into(),
        ));
    }
    if let Some(token) = &req.token
        && token.trim().is_empty()
    {
        return Err(TransferError::Validation(
            "idempotency token must not be empty".into(),
        ));
    }
    Ok(())
}

/// Run attempts until the transfer commits, fails fatally, or the retry
/// bound is hit.
async fn run_to_completion(
    store: &dyn DocumentStore,
    policy: &RetryPolicy,
    transfer_id: TransferId,
    req: &TransferRequest,
) -> Result<TransferOutcome, TransferError> {
    let mut attempt = 1u32;
    loop {
        match attempt_once(store, policy, transfer_id, req, attempt).await {
            Ok(outcome) => return Ok(outcome),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Conflict { phase }) => {
                if attempt >= policy.max_attempts {
                    warn!(
                        transfer_id = %transfer_id,
                        phase = %phase,
                        attempts = attempt,
                        "Retries exhausted on persistent write conflicts"
                    );
                    return Err(TransferError::ConcurrencyExhausted { attempts: attempt });
                }
                let delay = policy.delay(attempt);
                debug!(
                    transfer_id = %transfer_id,
                    phase = %phase,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Write conflict, retrying from load"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// One pass through the attempt state machine:
/// LOADING → COMPUTING → COMMITTING_SOURCE → COMMITTING_DESTINATION.
async fn attempt_once(
    store: &dyn DocumentStore,
    policy: &RetryPolicy,
    transfer_id: TransferId,
    req: &TransferRequest,
    attempt: u32,
) -> Result<TransferOutcome, AttemptError> {
    // LOADING: both documents plus the version tokens the writes will be
    // conditioned on.
    let (mut source, source_cas) = load_profile(store, req.source).await?;
    let (mut dest, dest_cas) = load_profile(store, req.dest).await?;

    // COMPUTING: the funds check runs against the freshly loaded balance on
    // every attempt, so a concurrent debit cannot be overdrawn past.
    let new_source_balance = source.balance - req.amount;
    if new_source_balance.is_sign_negative() {
        return Err(AttemptError::Fatal(TransferError::InsufficientFunds {
            balance: source.balance,
            requested: req.amount,
        }));
    }
    let new_dest_balance = dest.balance + req.amount;

    // COMMITTING_SOURCE: conditional debit. A conflict here means no
    // mutation happened - restart from load.
    source.balance = new_source_balance;
    let source_key = req.source.to_string();
    if let Err(e) = replace_typed(
        store,
        collections::PROFILE,
        &source_key,
        &source,
        source_cas,
    )
    .await
    {
        return Err(commit_error(e, TransferPhase::CommittingSource, req.source));
    }

    // COMMITTING_DESTINATION: funds are in flight until this lands. On any
    // failure the source debit is compensated before the error surfaces.
    dest.balance = new_dest_balance;
    let dest_key = req.dest.to_string();
    match replace_typed(store, collections::PROFILE, &dest_key, &dest, dest_cas).await {
        Ok(_) => {
            info!(
                transfer_id = %transfer_id,
                attempt,
                "Transfer committed: {} -> {} amount={}",
                req.source, req.dest, req.amount
            );
            Ok(TransferOutcome {
                transfer_id,
                source: req.source,
                dest: req.dest,
                amount: req.amount,
                source_balance: new_source_balance,
                dest_balance: new_dest_balance,
                completed_at: chrono::Utc::now().timestamp_millis(),
            })
        }
        Err(credit_err) => {
            compensate_source(store, policy, transfer_id, req.source, req.amount).await?;
            Err(commit_error(
                credit_err,
                TransferPhase::CommittingDestination,
                req.dest,
            ))
        }
    }
}

async fn load_profile(
    store: &dyn DocumentStore,
    pid: Uuid,
) -> Result<(Profile, crate::store::Cas), AttemptError> {
    match get_typed::<Profile>(store, collections::PROFILE, &pid.to_string()).await {
        Ok(loaded) => Ok(loaded),
        Err(StoreError::NotFound { .. }) => {
            Err(AttemptError::Fatal(TransferError::ProfileNotFound(pid)))
        }
        Err(StoreError::Unavailable(msg)) => {
            Err(AttemptError::Fatal(TransferError::StoreUnavailable(msg)))
        }
        Err(e) => Err(AttemptError::Fatal(TransferError::Internal(e.to_string()))),
    }
}

/// Map a failed conditional write to the attempt-level outcome.
fn commit_error(err: StoreError, phase: TransferPhase, profile: Uuid) -> AttemptError {
    match err {
        StoreError::CasMismatch { .. } => AttemptError::Conflict { phase },
        StoreError::NotFound { .. } => {
            AttemptError::Fatal(TransferError::ProfileNotFound(profile))
        }
        StoreError::Unavailable(msg) => {
            AttemptError::Fatal(TransferError::StoreUnavailable(msg))
        }
        e => AttemptError::Fatal(TransferError::Internal(e.to_string())),
    }
}

/// Credit the debited amount back onto the source.
///
/// Runs its own CAS loop: concurrent writers may move the source while the
/// rollback is in progress, and the re-read keeps the restoration exact.
async fn compensate_source(
    store: &dyn DocumentStore,
    policy: &RetryPolicy,
    transfer_id: TransferId,
    source: Uuid,
    amount: rust_decimal::Decimal,
) -> Result<(), AttemptError> {
    let key = source.to_string();
    for round in 1..=policy.max_attempts {
        match get_typed::<Profile>(store, collections::PROFILE, &key).await {
            Ok((mut profile, cas)) => {
                profile.balance += amount;
                match replace_typed(store, collections::PROFILE, &key, &profile, cas).await {
                    Ok(_) => {
                        debug!(
                            transfer_id = %transfer_id,
                            round,
                            "Source debit rolled back"
                        );
                        return Ok(());
                    }
                    Err(StoreError::CasMismatch { .. }) => {
                        tokio::time::sleep(policy.delay(round)).await;
                        continue;
                    }
                    Err(e) => {
                        error!(
                            transfer_id = %transfer_id,
                            "Compensation write failed, source remains debited: {e}"
                        );
                        return Err(AttemptError::Fatal(TransferError::Internal(format!(
                            "compensation failed: {e}"
                        ))));
                    }
                }
            }
            Err(e) => {
                error!(
                    transfer_id = %transfer_id,
                    "Compensation read failed, source remains debited: {e}"
                );
                return Err(AttemptError::Fatal(TransferError::Internal(format!(
                    "compensation failed: {e}"
                ))));
            }
        }
    }

    error!(
        transfer_id = %transfer_id,
        "Compensation retries exhausted, source remains debited"
    );
    Err(AttemptError::Fatal(TransferError::Internal(
        "compensation retries exhausted".into(),
    )))
}
