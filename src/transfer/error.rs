//! Transfer Error Types

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Transfer error taxonomy
///
/// Transient write conflicts are absorbed inside the coordinator up to the
/// retry bound and never surface here; everything below maps to a distinct,
/// stable code so a client can tell "retry me" from "do not retry".
#[derive(Debug, Error, Clone)]
pub enum TransferError {
    // === Caller mistakes (never retried) ===
    #[error("Invalid transfer request: {0}")]
    Validation(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    // === Business-rule rejection (not retried) ===
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },

    // === Idempotency ===
    #[error("Transfer with token {0} is already in flight")]
    DuplicateInFlight(String),

    // === Transient, surfaced for caller-level retry ===
    #[error("Write conflicts persisted after {attempts} attempts")]
    ConcurrencyExhausted { attempts: u32 },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // === System ===
    #[error("Internal transfer error: {0}")]
    Internal(String),
}

impl TransferError {
    /// Get the stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::Validation(_) => "VALIDATION_ERROR",
            TransferError::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            TransferError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            TransferError::DuplicateInFlight(_) => "DUPLICATE_IN_FLIGHT",
            TransferError::ConcurrencyExhausted { .. } => "CONCURRENCY_EXHAUSTED",
            TransferError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            TransferError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::Validation(_) => 400,
            TransferError::ProfileNotFound(_) => 404,
            TransferError::InsufficientFunds { .. } => 422,
            TransferError::DuplicateInFlight(_) | TransferError::ConcurrencyExhausted { .. } => 409,
            TransferError::StoreUnavailable(_) => 503,
            TransferError::Internal(_) => 500,
        }
    }

    /// Whether a caller-level retry of the same request can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::DuplicateInFlight(_)
                | TransferError::ConcurrencyExhausted { .. }
                | TransferError::StoreUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TransferError::Validation("x".into()).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            TransferError::InsufficientFunds {
                balance: Decimal::new(3000, 2),
                requested: Decimal::new(5000, 2),
            }
            .code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            TransferError::ConcurrencyExhausted { attempts: 8 }.code(),
            "CONCURRENCY_EXHAUSTED"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::Validation("x".into()).http_status(), 400);
        assert_eq!(
            TransferError::ProfileNotFound(Uuid::nil()).http_status(),
            404
        );
        assert_eq!(
            TransferError::InsufficientFunds {
                balance: Decimal::ZERO,
                requested: Decimal::ONE,
            }
            .http_status(),
            422
        );
        assert_eq!(
            TransferError::ConcurrencyExhausted { attempts: 8 }.http_status(),
            409
        );
        assert_eq!(
            TransferError::StoreUnavailable("down".into()).http_status(),
            503
        );
    }

    #[test]
    fn test_retryable_split() {
        assert!(TransferError::StoreUnavailable("down".into()).is_retryable());
        assert!(TransferError::ConcurrencyExhausted { attempts: 8 }.is_retryable());
        assert!(!TransferError::Validation("x".into()).is_retryable());
        assert!(
            !TransferError::InsufficientFunds {
                balance: Decimal::ZERO,
                requested: Decimal::ONE,
            }
            .is_retryable()
        );
    }
}
