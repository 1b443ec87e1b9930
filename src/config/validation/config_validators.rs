//! Configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

/// `Decimal` cannot represent more fractional digits than this
const MAX_TOKEN_DECIMALS: u32 = 28;

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch configuration");

        if self.tokens.is_empty() {
            return Err("At least one token must be configured".to_string());
        }

        let mut symbols = HashSet::new();
        for token in &self.tokens {
            token.validate()?;
            if !symbols.insert(token.symbol.trim().to_uppercase()) {
                return Err(format!("Duplicate token symbol: {}", token.symbol));
            }
        }

        self.pipeline.validate()?;
        self.fees.validate()?;
        self.logging.validate()?;

        debug!("Batch configuration validation completed");
        Ok(())
    }
}

impl Validate for TokenConfig {
    fn validate(&self) -> Result<(), String> {
        let symbol = self.symbol.trim();
        if symbol.is_empty() {
            return Err("Token symbol cannot be empty".to_string());
        }
        if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("Token symbol must be alphanumeric: {}", symbol));
        }
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(format!(
                "Token {} has {} decimals, at most {} are supported",
                symbol, self.decimals, MAX_TOKEN_DECIMALS
            ));
        }
        Ok(())
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.stage_timeout_secs == 0 {
            return Err("Stage timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for FeeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.standard_fee < Decimal::ZERO {
            return Err("Standard fee cannot be negative".to_string());
        }
        if self.privacy_fee < Decimal::ZERO {
            return Err("Privacy fee cannot be negative".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
