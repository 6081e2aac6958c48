//! Error types for the ledger facade.

use hashledger_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Block construction or decoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Chain verification error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON import/export error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
