//! # treasury-batch
//!
//! Batch payments from a shared multisig treasury, optionally routed through
//! a privacy-shielding layer.
//!
//! ## Features
//!
//! - **Recipient import**: tabular text or manual rows, lenient or strict
//! - **Exact totals**: decimal arithmetic, no floating-point drift
//! - **Staged execution**: a fixed 3-stage or 5-stage pipeline per transaction
//! - **Observable**: progress snapshots by polling or subscription
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use treasury_batch::{BatchOrchestrator, Config};
//! use treasury_batch::services::simulated_collaborators;
//!
//! # async fn run(treasury: treasury_batch::TreasuryAccount) -> treasury_batch::Result<()> {
//! let config = Config::default();
//! let orchestrator =
//!     BatchOrchestrator::new(&config, simulated_collaborators(treasury.clone(), config.simulation()))?;
//!
//! let draft = orchestrator.create_draft(
//!     "recipient_address,amount,recipient_name\n\
//!      0x742d35Cc6634C0532925a3b8D4C9db1234567890,100,Alice\n",
//!     "USDC",
//! )?;
//! orchestrator.submit_for_approval(draft.id, &treasury)?;
//! orchestrator.set_privacy(draft.id, true)?;
//! let done = orchestrator.execute(draft.id).await?;
//! println!("{:?}", done.tx_hash);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod services;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::{
    Address, BatchId, BatchOrchestrator, BatchStatus, BatchSummary, BatchTransaction,
    Collaborators, DraftReport, FailureCause, FailureReason, FeeQuote, ProgressSnapshot,
    Recipient, RecipientRow, ServiceError, Stage, StageProfile, TokenSymbol, TreasuryAccount,
    TxHash,
};
pub use utils::error::{ErrorCategory, PaymentError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
