//! Token configuration

use serde::{Deserialize, Serialize};

/// One supported token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Ticker symbol, case-insensitive
    pub symbol: String,
    /// Fractional digits an amount may carry
    pub decimals: u32,
}

impl TokenConfig {
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}
