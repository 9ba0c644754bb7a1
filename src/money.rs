//! Money Handling Module
//!
//! All on-board credit values are `rust_decimal::Decimal` with a fixed
//! currency scale of 2. Floats never appear on a money path, and every
//! client-provided amount goes through the strict parsing here.
//!
//! ## Design Principles
//! 1. Explicit Error Handling: no silent truncation or rounding
//! 2. Strict input format at the Serde layer ([`StrictAmount`])
//! 3. One formatting path out ([`format_amount`])

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency scale for on-board credit (2 decimal places).
pub const CREDIT_SCALE: u32 = 2;

/// Money validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Validate a decimal as a transferable amount: strictly positive, at most
/// [`CREDIT_SCALE`] decimal places.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }
    check_scale(amount)
}

fn check_scale(amount: Decimal) -> Result<Decimal, MoneyError> {
    if amount.scale() > CREDIT_SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: amount.scale(),
            max: CREDIT_SCALE,
        });
    }
    Ok(amount)
}

/// Parse a client amount string into a validated non-negative `Decimal`.
///
/// Rejects empty strings, `.5` / `5.` forms, scientific notation, `+`/`-`
/// prefixes, and anything with more than [`CREDIT_SCALE`] decimal places.
/// Zero is accepted here (a balance may start at 0.00); transfer amounts get
/// the stricter [`validate_amount`] check in the coordinator.
pub fn parse_amount(s: &str) -> Result<Decimal, MoneyError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if s.starts_with('-') || s.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }
    if s.starts_with('.') {
        return Err(MoneyError::InvalidFormat(
            "missing leading zero (use 0.5 instead of .5)".into(),
        ));
    }
    if s.ends_with('.') {
        return Err(MoneyError::InvalidFormat(
            "missing fractional part (use 5.0 instead of 5.)".into(),
        ));
    }
    if s.contains('e') || s.contains('E') {
        return Err(MoneyError::InvalidFormat(
            "scientific notation not allowed".into(),
        ));
    }

    let amount = Decimal::from_str(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;

    check_scale(amount)
}

/// Format a balance for API output at the fixed currency scale.
///
/// `450` and `450.0` both render as `"450.00"`.
pub fn format_amount(amount: Decimal) -> String {
    let mut out = amount;
    out.rescale(CREDIT_SCALE);
    out.to_string()
}

// ============================================================================
// StrictAmount: Format-Validated Amount at the Serde Layer
// ============================================================================

/// Strict format amount - validates during deserialization.
///
/// Only JSON strings are accepted; JSON numbers bypass format control, so
/// they are rejected. The inner value is non-negative and already validated
/// against [`CREDIT_SCALE`].
#[derive(Debug, Clone, Copy)]
pub struct StrictAmount(Decimal);

impl StrictAmount {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictAmount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StrictAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        let amount = parse_amount(&s).map_err(D::Error::custom)?;
        Ok(StrictAmount(amount))
    }
}

impl Serialize for StrictAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&format_amount(self.0))
    }
}
