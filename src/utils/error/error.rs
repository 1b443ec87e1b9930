//! Error handling for the batch payment orchestrator
//!
//! This module defines all error types used throughout the crate.

use crate::core::batch::{BatchId, BatchStatus};
use crate::core::pipeline::FailureReason;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum PaymentError {
    // ==================== Input errors ====================
    /// Tabular input had no data rows after the header
    #[error("Input contains no data rows")]
    EmptyInput,

    /// A data row could not be turned into a recipient
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// No valid recipients remained
    #[error("Batch contains no valid recipients")]
    EmptyBatch,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("Token mismatch: batch uses {expected}, recipient uses {found}")]
    TokenMismatch { expected: String, found: String },

    #[error("Duplicate recipient address: {0}")]
    DuplicateRecipient(String),

    #[error("Batch total overflows the amount range")]
    AmountOverflow,

    #[error("Recipient index {index} out of range (batch has {len} recipients)")]
    RecipientIndexOutOfRange { index: usize, len: usize },

    // ==================== Precondition errors ====================
    #[error("Insufficient funds: batch needs {required} {token}, treasury holds {available}")]
    InsufficientFunds {
        token: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("Cannot {operation} while transaction is {status}")]
    InvalidTransition {
        status: BatchStatus,
        operation: &'static str,
    },

    #[error("Transaction {0} is already executing")]
    AlreadyExecuting(BatchId),

    #[error("Transaction {0} already reached a terminal state")]
    AlreadyTerminal(BatchId),

    #[error("Transaction not found: {0}")]
    NotFound(BatchId),

    #[error("Invalid treasury account: {0}")]
    InvalidTreasury(String),

    // ==================== Execution errors ====================
    /// A pipeline stage failed; the transaction is now `Failed`
    #[error("Execution failed at {0}")]
    Execution(FailureReason),

    // ==================== Infrastructure errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A spawned execution task ended without producing an outcome
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse grouping of errors, used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Recovered locally, the batch stays editable
    Input,
    /// Operation rejected, no state change occurred
    Precondition,
    /// Terminal, the transaction moved to `Failed`
    Execution,
    /// Configuration, IO and decoding problems
    Infrastructure,
}

impl PaymentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PaymentError::EmptyInput
            | PaymentError::MalformedRow { .. }
            | PaymentError::EmptyBatch
            | PaymentError::InvalidAddress(_)
            | PaymentError::InvalidAmount(_)
            | PaymentError::UnsupportedToken(_)
            | PaymentError::TokenMismatch { .. }
            | PaymentError::DuplicateRecipient(_)
            | PaymentError::AmountOverflow
            | PaymentError::RecipientIndexOutOfRange { .. } => ErrorCategory::Input,
            PaymentError::InsufficientFunds { .. }
            | PaymentError::InvalidTransition { .. }
            | PaymentError::AlreadyExecuting(_)
            | PaymentError::AlreadyTerminal(_)
            | PaymentError::NotFound(_)
            | PaymentError::InvalidTreasury(_) => ErrorCategory::Precondition,
            PaymentError::Execution(_) => ErrorCategory::Execution,
            PaymentError::Config(_)
            | PaymentError::Io(_)
            | PaymentError::Yaml(_)
            | PaymentError::Serialization(_)
            | PaymentError::Csv(_)
            | PaymentError::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    /// Stable machine-readable code for presentation layers
    pub fn error_code(&self) -> &'static str {
        match self {
            PaymentError::EmptyInput => "EMPTY_INPUT",
            PaymentError::MalformedRow { .. } => "MALFORMED_ROW",
            PaymentError::EmptyBatch => "EMPTY_BATCH",
            PaymentError::InvalidAddress(_) => "INVALID_ADDRESS",
            PaymentError::InvalidAmount(_) => "INVALID_AMOUNT",
            PaymentError::UnsupportedToken(_) => "UNSUPPORTED_TOKEN",
            PaymentError::TokenMismatch { .. } => "TOKEN_MISMATCH",
            PaymentError::DuplicateRecipient(_) => "DUPLICATE_RECIPIENT",
            PaymentError::AmountOverflow => "AMOUNT_OVERFLOW",
            PaymentError::RecipientIndexOutOfRange { .. } => "RECIPIENT_INDEX_OUT_OF_RANGE",
            PaymentError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            PaymentError::InvalidTransition { .. } => "INVALID_TRANSITION",
            PaymentError::AlreadyExecuting(_) => "ALREADY_EXECUTING",
            PaymentError::AlreadyTerminal(_) => "ALREADY_TERMINAL",
            PaymentError::NotFound(_) => "NOT_FOUND",
            PaymentError::InvalidTreasury(_) => "INVALID_TREASURY",
            PaymentError::Execution(_) => "EXECUTION_FAILED",
            PaymentError::Config(_) => "CONFIG_ERROR",
            PaymentError::Io(_) => "IO_ERROR",
            PaymentError::Yaml(_) => "YAML_ERROR",
            PaymentError::Serialization(_) => "SERIALIZATION_ERROR",
            PaymentError::Csv(_) => "CSV_ERROR",
            PaymentError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Input errors leave the batch editable
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Input
    }
}
