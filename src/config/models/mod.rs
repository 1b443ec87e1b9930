//! Configuration data models
//!
//! This module defines all configuration structures used by the orchestrator.

#![allow(missing_docs)]

pub mod batch;
pub mod import;
pub mod logging;
pub mod pipeline;
pub mod tokens;

// Re-export all configuration types
pub use batch::*;
pub use import::*;
pub use logging::*;
pub use pipeline::*;
pub use tokens::*;

use rust_decimal::Decimal;

/// Default per-stage timeout in seconds
pub fn default_stage_timeout_secs() -> u64 {
    120
}

/// Default delay of a simulated stage in milliseconds
pub fn default_stage_delay_ms() -> u64 {
    2000
}

/// Default fee of the standard profile
pub fn default_standard_fee() -> Decimal {
    Decimal::ZERO
}

/// Default surcharge of the private profile
pub fn default_privacy_fee() -> Decimal {
    Decimal::from(15)
}

pub fn default_log_level() -> String {
    "info".to_string()
}

/// Built-in token set: USDC and USDT with 6 decimals, DAI with 18
pub fn default_tokens() -> Vec<TokenConfig> {
    vec![
        TokenConfig::new("USDC", 6),
        TokenConfig::new("USDT", 6),
        TokenConfig::new("DAI", 18),
    ]
}
