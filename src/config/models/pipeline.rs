//! Pipeline, fee and simulation configuration

use super::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on a single stage, in seconds
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: default_stage_timeout_secs(),
        }
    }
}

impl PipelineConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    pub fn merge(mut self, other: Self) -> Self {
        if other.stage_timeout_secs != default_stage_timeout_secs() {
            self.stage_timeout_secs = other.stage_timeout_secs;
        }
        self
    }
}

/// Fee schedule, in units of the batch token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    #[serde(default = "default_standard_fee")]
    pub standard_fee: Decimal,
    /// Added on top of the standard fee when privacy is enabled
    #[serde(default = "default_privacy_fee")]
    pub privacy_fee: Decimal,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            standard_fee: default_standard_fee(),
            privacy_fee: default_privacy_fee(),
        }
    }
}

impl FeeConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.standard_fee != default_standard_fee() {
            self.standard_fee = other.standard_fee;
        }
        if other.privacy_fee != default_privacy_fee() {
            self.privacy_fee = other.privacy_fee;
        }
        self
    }
}

/// Settings of the simulated collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed delay each simulated stage waits before answering
    #[serde(default = "default_stage_delay_ms")]
    pub stage_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: default_stage_delay_ms(),
        }
    }
}

impl SimulationConfig {
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }

    pub fn merge(mut self, other: Self) -> Self {
        if other.stage_delay_ms != default_stage_delay_ms() {
            self.stage_delay_ms = other.stage_delay_ms;
        }
        self
    }
}
