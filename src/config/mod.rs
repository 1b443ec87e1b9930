//! Configuration management for the orchestrator
//!
//! This module handles loading, validation, and management of the token set,
//! import rules, pipeline timeouts, fees and logging.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::parse_token_list;
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PaymentError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let batch: BatchConfig = serde_yaml::from_str(&content)?;

        let config = Self { batch };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let batch = BatchConfig::from_env()?;
        let config = Self { batch };

        config.validate()?;
        Ok(config)
    }

    pub fn tokens(&self) -> &[TokenConfig] {
        &self.batch.tokens
    }

    pub fn import(&self) -> &ImportConfig {
        &self.batch.import
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.batch.pipeline
    }

    pub fn fees(&self) -> &FeeConfig {
        &self.batch.fees
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.batch.simulation
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.batch.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.batch
            .validate()
            .map_err(|e| PaymentError::Config(format!("Invalid configuration: {}", e)))
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.batch = self.batch.merge(other.batch);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.batch)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.batch)?)
    }
}
