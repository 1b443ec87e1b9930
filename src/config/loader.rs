//! Configuration loading utilities
//!
//! Environment overrides use the `BATCHPAY_` prefix.

use super::models::*;
use crate::utils::error::{PaymentError, Result};
use std::env;
use tracing::debug;

impl BatchConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Ok(tokens) = env::var("BATCHPAY_TOKENS") {
            config.tokens = parse_token_list(&tokens)?;
        }

        // Import configuration
        if let Ok(mode) = env::var("BATCHPAY_IMPORT_MODE") {
            config.import.mode = mode.parse().map_err(PaymentError::Config)?;
        }
        if let Ok(duplicates) = env::var("BATCHPAY_DUPLICATES") {
            config.import.duplicates = duplicates.parse().map_err(PaymentError::Config)?;
        }

        // Pipeline configuration
        if let Ok(timeout) = env::var("BATCHPAY_STAGE_TIMEOUT_SECS") {
            config.pipeline.stage_timeout_secs = timeout
                .parse()
                .map_err(|e| PaymentError::Config(format!("Invalid stage timeout: {}", e)))?;
        }
        if let Ok(delay) = env::var("BATCHPAY_STAGE_DELAY_MS") {
            config.simulation.stage_delay_ms = delay
                .parse()
                .map_err(|e| PaymentError::Config(format!("Invalid stage delay: {}", e)))?;
        }

        // Logging configuration
        if let Ok(level) = env::var("BATCHPAY_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("BATCHPAY_LOG_JSON") {
            config.logging.json = json
                .parse()
                .map_err(|e| PaymentError::Config(format!("Invalid log json flag: {}", e)))?;
        }

        debug!("Configuration loaded from environment variables");
        Ok(config)
    }
}

/// Parse a `SYM:decimals,SYM:decimals` token list
pub fn parse_token_list(raw: &str) -> Result<Vec<TokenConfig>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (symbol, decimals) = entry.split_once(':').ok_or_else(|| {
                PaymentError::Config(format!("Invalid token entry '{}', expected SYM:decimals", entry))
            })?;
            let decimals = decimals.trim().parse().map_err(|e| {
                PaymentError::Config(format!("Invalid decimals for {}: {}", symbol, e))
            })?;
            Ok(TokenConfig::new(symbol.trim(), decimals))
        })
        .collect()
}
