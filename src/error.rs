//! Error types for coinfolio
//!
//! This module defines domain-specific error types that provide clear,
//! actionable error messages to users.

use thiserror::Error;

/// Validation errors for user input in the CLI and the TUI dialogs.
///
/// These errors are shown directly to users and should be clear and actionable.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount is required")]
    AmountRequired,

    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),
}

/// Errors raised by portfolio mutations.
#[derive(Debug, Error, PartialEq)]
pub enum PortfolioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown asset: '{0}'")]
    UnknownAsset(String),

    #[error("'{0}' is not in your portfolio")]
    NotHeld(String),
}

/// Errors raised by the local portfolio store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Failed to serialize portfolio: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Parse a user supplied holding amount.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::AmountRequired);
    }
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(amount)
}

/// Reject amounts that cannot be held: non-finite, zero or negative.
pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(amount)
}
