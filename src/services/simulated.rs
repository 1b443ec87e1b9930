//! Simulated collaborators
//!
//! Every call waits a fixed delay and then succeeds, returning random hashes
//! and addresses. A wallet can be told to under-deliver approvals to exercise
//! the rejection path.

use crate::config::SimulationConfig;
use crate::core::batch::{BatchId, BatchTransaction, TxHash};
use crate::core::recipients::{Address, Recipient};
use crate::core::tokens::TokenSymbol;
use crate::core::traits::{
    BroadcastService, Collaborators, PrivacyService, ServiceError, ShieldedHandle, WalletService,
};
use crate::core::treasury::TreasuryAccount;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

fn random_hex(bytes: usize) -> String {
    let buf: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    format!("0x{}", hex::encode(buf))
}

/// Multisig wallet holding a fixed treasury snapshot
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    treasury: TreasuryAccount,
    delay: Duration,
    approvals: Option<u32>,
}

impl SimulatedWallet {
    pub fn new(treasury: TreasuryAccount, delay: Duration) -> Self {
        Self {
            treasury,
            delay,
            approvals: None,
        }
    }

    /// Report exactly `approvals` signatures regardless of the threshold
    pub fn with_approvals(mut self, approvals: u32) -> Self {
        self.approvals = Some(approvals);
        self
    }
}

#[async_trait]
impl WalletService for SimulatedWallet {
    async fn connect(&self) -> Result<TreasuryAccount, ServiceError> {
        Ok(self.treasury.clone())
    }

    async fn collect_signatures(
        &self,
        transaction_id: BatchId,
        required_approvals: u32,
    ) -> Result<u32, ServiceError> {
        tokio::time::sleep(self.delay).await;
        let approvals = self.approvals.unwrap_or(required_approvals);
        debug!(%transaction_id, approvals, required_approvals, "Signatures collected");
        Ok(approvals)
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedPrivacy {
    delay: Duration,
}

impl SimulatedPrivacy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PrivacyService for SimulatedPrivacy {
    async fn shield(
        &self,
        amount: Decimal,
        token: &TokenSymbol,
    ) -> Result<ShieldedHandle, ServiceError> {
        tokio::time::sleep(self.delay).await;
        debug!(%amount, %token, "Funds shielded");
        Ok(ShieldedHandle::new(random_hex(16)))
    }

    async fn create_ephemeral_addresses(
        &self,
        count: usize,
    ) -> Result<Vec<Address>, ServiceError> {
        tokio::time::sleep(self.delay).await;
        (0..count)
            .map(|_| {
                Address::parse(&random_hex(20)).map_err(|e| ServiceError::Rejected(e.to_string()))
            })
            .collect()
    }

    async fn private_transfer(
        &self,
        handle: &ShieldedHandle,
        recipients: &[Recipient],
        ephemeral: &[Address],
    ) -> Result<TxHash, ServiceError> {
        tokio::time::sleep(self.delay).await;
        debug!(
            %handle,
            recipients = recipients.len(),
            hops = ephemeral.len(),
            "Private transfer submitted"
        );
        Ok(TxHash::new(random_hex(32)))
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedChain {
    delay: Duration,
}

impl SimulatedChain {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl BroadcastService for SimulatedChain {
    async fn broadcast(&self, transaction: &BatchTransaction) -> Result<TxHash, ServiceError> {
        tokio::time::sleep(self.delay).await;
        debug!(transaction_id = %transaction.id, "Batch broadcast");
        Ok(TxHash::new(random_hex(32)))
    }

    async fn confirm(&self, tx_hash: &TxHash) -> Result<(), ServiceError> {
        tokio::time::sleep(self.delay).await;
        debug!(%tx_hash, "Transaction confirmed");
        Ok(())
    }
}

/// Simulated wallet, privacy layer and chain sharing one stage delay
pub fn simulated_collaborators(
    treasury: TreasuryAccount,
    config: &SimulationConfig,
) -> Collaborators {
    let delay = config.stage_delay();
    Collaborators::new(
        Arc::new(SimulatedWallet::new(treasury, delay)),
        Arc::new(SimulatedPrivacy::new(delay)),
        Arc::new(SimulatedChain::new(delay)),
    )
}
