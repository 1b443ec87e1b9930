//! Multisig wallet contract

use super::ServiceError;
use crate::core::batch::BatchId;
use crate::core::treasury::TreasuryAccount;
use async_trait::async_trait;

/// Wallet / multisig service
///
/// Owns the treasury account and the signer set. The orchestrator only reads
/// the account and asks for signatures; it never moves funds through this
/// interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Read-only snapshot of the connected treasury
    async fn connect(&self) -> Result<TreasuryAccount, ServiceError>;

    /// Collect approvals for a transaction.
    ///
    /// Returns the number of approvals obtained. Fewer than
    /// `required_approvals` is treated as a rejection by the pipeline.
    async fn collect_signatures(
        &self,
        transaction_id: BatchId,
        required_approvals: u32,
    ) -> Result<u32, ServiceError>;
}
