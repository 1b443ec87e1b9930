//! Fee schedule
//!
//! Fees are flat amounts in the batch token. The private profile adds a
//! surcharge on top of the standard fee.

use crate::config::FeeConfig;
use crate::core::tokens::TokenSymbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fees a transaction would pay with its current privacy flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub token: TokenSymbol,
    pub base_fee: Decimal,
    /// Zero unless privacy is enabled
    pub privacy_fee: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    standard_fee: Decimal,
    privacy_fee: Decimal,
}

impl FeeSchedule {
    pub fn new(standard_fee: Decimal, privacy_fee: Decimal) -> Self {
        Self {
            standard_fee,
            privacy_fee,
        }
    }

    pub fn quote(&self, token: &TokenSymbol, privacy_enabled: bool) -> FeeQuote {
        let privacy_fee = if privacy_enabled {
            self.privacy_fee
        } else {
            Decimal::ZERO
        };
        FeeQuote {
            token: token.clone(),
            base_fee: self.standard_fee,
            privacy_fee,
            total: self.standard_fee + privacy_fee,
        }
    }
}

impl From<&FeeConfig> for FeeSchedule {
    fn from(config: &FeeConfig) -> Self {
        Self::new(config.standard_fee, config.privacy_fee)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::from(&FeeConfig::default())
    }
}
