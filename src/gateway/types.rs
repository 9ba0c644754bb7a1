//! Gateway response types and error translation
//!
//! - `ApiResponse<T>`: unified response wrapper
//! - `ApiError`: handler error carrying an HTTP status + stable code
//! - `error_codes`: standard error code constants

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::store::StoreError;
use crate::transfer::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    pub code: i32,
    /// Response message
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;
    pub const ALREADY_EXISTS: i32 = 4002;
    pub const WRITE_CONFLICT: i32 = 4003;
    pub const DUPLICATE_IN_FLIGHT: i32 = 4004;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

// ============================================================================
// Handler Error Type
// ============================================================================

/// Handler-level error: HTTP status plus the unified error envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

/// Result alias used by all handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Success helper
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            msg,
        )
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error_codes::ALREADY_EXISTS, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    /// Convenience for the `return ApiError::...().into_err()` pattern
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, self.msg);
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            StoreError::AlreadyExists { .. } => ApiError::conflict(err.to_string()),
            StoreError::CasMismatch { .. } => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::WRITE_CONFLICT,
                err.to_string(),
            ),
            StoreError::Unavailable(_) => ApiError::service_unavailable(err.to_string()),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &err {
            TransferError::Validation(_) => error_codes::INVALID_PARAMETER,
            TransferError::ProfileNotFound(_) => error_codes::NOT_FOUND,
            TransferError::InsufficientFunds { .. } => error_codes::INSUFFICIENT_FUNDS,
            TransferError::DuplicateInFlight(_) => error_codes::DUPLICATE_IN_FLIGHT,
            TransferError::ConcurrencyExhausted { .. } => error_codes::WRITE_CONFLICT,
            TransferError::StoreUnavailable(_) => error_codes::SERVICE_UNAVAILABLE,
            TransferError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        ApiError::new(status, code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(42);
        assert_eq!(resp.code, error_codes::SUCCESS);
        assert_eq!(resp.msg, "ok");
        assert_eq!(resp.data, Some(42));
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::not_found("airline", "airline_10").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, error_codes::NOT_FOUND);

        let err: ApiError = StoreError::already_exists("airline", "airline_10").into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::ALREADY_EXISTS);

        let err: ApiError = StoreError::cas_mismatch("profile", "p").into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::WRITE_CONFLICT);
    }

    #[test]
    fn test_transfer_error_mapping() {
        let err: ApiError = TransferError::InsufficientFunds {
            balance: Decimal::new(3000, 2),
            requested: Decimal::new(5000, 2),
        }
        .into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, error_codes::INSUFFICIENT_FUNDS);

        let err: ApiError = TransferError::ProfileNotFound(Uuid::nil()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = TransferError::ConcurrencyExhausted { attempts: 8 }.into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::WRITE_CONFLICT);
    }
}
