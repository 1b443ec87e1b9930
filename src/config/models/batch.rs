//! Top-level orchestrator configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Everything a YAML config file may contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Closed set of supported tokens
    #[serde(default = "default_tokens")]
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            tokens: default_tokens(),
            import: ImportConfig::default(),
            pipeline: PipelineConfig::default(),
            fees: FeeConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        // A token list other than the built-in one replaces it wholesale
        if other.tokens != default_tokens() {
            self.tokens = other.tokens;
        }
        self.import = self.import.merge(other.import);
        self.pipeline = self.pipeline.merge(other.pipeline);
        self.fees = self.fees.merge(other.fees);
        self.simulation = self.simulation.merge(other.simulation);
        self.logging = self.logging.merge(other.logging);
        self
    }
}
