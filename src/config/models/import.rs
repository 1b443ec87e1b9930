//! Recipient import configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the parser treats incomplete rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Skip rows missing an address or amount and report them
    #[default]
    Lenient,
    /// Fail on the first incomplete or invalid row
    Strict,
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ImportMode::Lenient),
            "strict" => Ok(ImportMode::Strict),
            other => Err(format!("Unknown import mode: {}", other)),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Lenient => f.write_str("lenient"),
            ImportMode::Strict => f.write_str("strict"),
        }
    }
}

/// What to do with an address that appears more than once in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep every row as its own payment
    #[default]
    Allow,
    /// Refuse the batch
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("Unknown duplicate policy: {}", other)),
        }
    }
}

/// Import configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub mode: ImportMode,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl ImportConfig {
    /// Merge import configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.mode != ImportMode::default() {
            self.mode = other.mode;
        }
        if other.duplicates != DuplicatePolicy::default() {
            self.duplicates = other.duplicates;
        }
        self
    }
}
