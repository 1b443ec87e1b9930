//! Privacy / shielding layer contract

use super::ServiceError;
use crate::core::batch::TxHash;
use crate::core::recipients::{Address, Recipient};
use crate::core::tokens::TokenSymbol;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to shielded funds held by the privacy layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShieldedHandle(String);

impl ShieldedHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShieldedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Privacy service, used only by the private stage profile.
///
/// Shielded notes must exist before they can be spent, which is why
/// `shield` always precedes `private_transfer`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrivacyService: Send + Sync {
    /// Convert `amount` of `token` into shielded form
    async fn shield(
        &self,
        amount: Decimal,
        token: &TokenSymbol,
    ) -> Result<ShieldedHandle, ServiceError>;

    /// Create `count` one-time intermediary addresses
    async fn create_ephemeral_addresses(&self, count: usize)
    -> Result<Vec<Address>, ServiceError>;

    /// Pay each recipient from the shielded funds, routing recipient `i`
    /// through `ephemeral[i]`
    async fn private_transfer(
        &self,
        handle: &ShieldedHandle,
        recipients: &[Recipient],
        ephemeral: &[Address],
    ) -> Result<TxHash, ServiceError>;
}
