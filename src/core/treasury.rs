//! Treasury account model
//!
//! Read-only snapshot of the multisig account, as reported by the wallet
//! collaborator. The orchestrator reads it to check that a batch is covered
//! and to copy the approval threshold; it never mutates it.

use crate::core::batch::BatchSummary;
use crate::core::recipients::Address;
use crate::core::tokens::TokenSymbol;
use crate::utils::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryAccount {
    address: Address,
    balance_by_token: BTreeMap<TokenSymbol, Decimal>,
    signer_count: u32,
    approval_threshold: u32,
    network: String,
}

impl TreasuryAccount {
    /// Build a snapshot, enforcing `signer_count >= approval_threshold >= 1`
    pub fn new(
        address: Address,
        balance_by_token: BTreeMap<TokenSymbol, Decimal>,
        signer_count: u32,
        approval_threshold: u32,
        network: impl Into<String>,
    ) -> Result<Self> {
        if approval_threshold == 0 {
            return Err(PaymentError::InvalidTreasury(
                "approval threshold must be at least 1".to_string(),
            ));
        }
        if signer_count < approval_threshold {
            return Err(PaymentError::InvalidTreasury(format!(
                "threshold {} exceeds signer count {}",
                approval_threshold, signer_count
            )));
        }
        if let Some((token, _)) = balance_by_token.iter().find(|(_, b)| **b < Decimal::ZERO) {
            return Err(PaymentError::InvalidTreasury(format!(
                "negative {} balance",
                token
            )));
        }

        Ok(Self {
            address,
            balance_by_token,
            signer_count,
            approval_threshold,
            network: network.into(),
        })
    }

    /// Re-check the invariants of a snapshot received from a collaborator
    pub fn validated(self) -> Result<Self> {
        Self::new(
            self.address,
            self.balance_by_token,
            self.signer_count,
            self.approval_threshold,
            self.network,
        )
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Balance held in `token`; zero when the token is not held at all
    pub fn balance_of(&self, token: &TokenSymbol) -> Decimal {
        self.balance_by_token
            .get(token)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn balances(&self) -> &BTreeMap<TokenSymbol, Decimal> {
        &self.balance_by_token
    }

    pub fn signer_count(&self) -> u32 {
        self.signer_count
    }

    pub fn approval_threshold(&self) -> u32 {
        self.approval_threshold
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Fail with `InsufficientFunds` unless the balance covers the batch total
    pub fn ensure_covers(&self, summary: &BatchSummary) -> Result<()> {
        let required = summary.total_amount();
        let available = self.balance_of(summary.token());
        if required > available {
            return Err(PaymentError::InsufficientFunds {
                token: summary.token().to_string(),
                required,
                available,
            });
        }
        Ok(())
    }
}
