//! Core functionality for the batch payment orchestrator
//!
//! This module contains the business logic and data structures: recipient
//! parsing, aggregation, the treasury model, the execution pipeline and the
//! orchestrator that composes them.

pub mod batch;
pub mod fees;
pub mod orchestrator;
pub mod pipeline;
pub mod recipients;
pub mod tokens;
pub mod traits;
pub mod treasury;

// Re-export commonly used types
pub use batch::{BatchId, BatchStatus, BatchSummary, BatchTransaction, TxHash};
pub use fees::{FeeQuote, FeeSchedule};
pub use orchestrator::{BatchOrchestrator, DraftReport, ProgressSnapshot};
pub use pipeline::{FailureCause, FailureReason, Stage, StageProfile};
pub use recipients::{Address, ParsedRecipients, Recipient, RecipientParser, RecipientRow};
pub use tokens::{TokenRegistry, TokenSpec, TokenSymbol};
pub use traits::{Collaborators, ServiceError};
pub use treasury::TreasuryAccount;
