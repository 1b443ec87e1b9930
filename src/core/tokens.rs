//! Token symbols and the closed set of tokens a batch may use

use crate::config::TokenConfig;
use crate::utils::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper-case token ticker such as `USDC`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSymbol(String);

impl TokenSymbol {
    pub fn new(symbol: &str) -> Self {
        Self(symbol.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured token and its on-chain precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub symbol: TokenSymbol,
    /// Maximum number of fractional digits an amount may carry
    pub decimals: u32,
}

/// Lookup of the configured tokens
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<TokenSymbol, TokenSpec>,
}

impl TokenRegistry {
    pub fn from_config(tokens: &[TokenConfig]) -> Result<Self> {
        let mut registry = BTreeMap::new();
        for token in tokens {
            let symbol = TokenSymbol::new(&token.symbol);
            if symbol.as_str().is_empty() {
                return Err(PaymentError::Config("Token symbol cannot be empty".to_string()));
            }
            let spec = TokenSpec {
                symbol: symbol.clone(),
                decimals: token.decimals,
            };
            if registry.insert(symbol, spec).is_some() {
                return Err(PaymentError::Config(format!(
                    "Duplicate token symbol: {}",
                    token.symbol
                )));
            }
        }
        Ok(Self { tokens: registry })
    }

    /// Resolve a user-supplied symbol, case-insensitively
    pub fn resolve(&self, symbol: &str) -> Result<&TokenSpec> {
        self.tokens
            .get(&TokenSymbol::new(symbol))
            .ok_or_else(|| PaymentError::UnsupportedToken(symbol.trim().to_string()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &TokenSymbol> {
        self.tokens.keys()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
