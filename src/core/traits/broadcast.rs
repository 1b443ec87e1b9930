//! Broadcast and confirmation contract

use super::ServiceError;
use crate::core::batch::{BatchTransaction, TxHash};
use async_trait::async_trait;

/// Chain access used by the standard profile to broadcast and by both
/// profiles to confirm
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastService: Send + Sync {
    /// Submit the batch transfer, returning its hash
    async fn broadcast(&self, transaction: &BatchTransaction) -> Result<TxHash, ServiceError>;

    /// Resolve once `tx_hash` is confirmed on chain
    async fn confirm(&self, tx_hash: &TxHash) -> Result<(), ServiceError>;
}
