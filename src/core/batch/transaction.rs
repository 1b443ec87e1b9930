//! Batch transaction record and its lifecycle status

use super::summary::BatchSummary;
use crate::core::pipeline::{FailureReason, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// On-chain transaction hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Batch transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Recipients may still be edited
    Draft,
    /// Submitted; waiting for multisig signatures
    PendingApproval,
    /// Signature threshold reached
    Approved,
    /// Funds are being moved into the privacy layer
    Shielding,
    /// Transfer submitted to the network
    Broadcasting,
    /// Waiting for on-chain confirmation
    Confirming,
    /// Terminal: funds delivered
    Completed,
    /// Terminal: a stage failed or the user cancelled
    Failed,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Draft => "Draft",
            BatchStatus::PendingApproval => "PendingApproval",
            BatchStatus::Approved => "Approved",
            BatchStatus::Shielding => "Shielding",
            BatchStatus::Broadcasting => "Broadcasting",
            BatchStatus::Confirming => "Confirming",
            BatchStatus::Completed => "Completed",
            BatchStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch payment and its progress through approval and execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTransaction {
    /// Unique transaction ID
    pub id: BatchId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Recipients and totals; frozen once submitted
    pub summary: BatchSummary,
    /// Lifecycle status
    pub status: BatchStatus,
    /// Signatures collected so far
    pub approvals_received: u32,
    /// Signature threshold copied from the treasury at submission
    pub approvals_required: u32,
    /// Route through the privacy layer; fixed once execution begins
    pub privacy_enabled: bool,
    /// Set only on `Completed`
    pub tx_hash: Option<TxHash>,
    /// Set only on `Failed`
    pub failure_reason: Option<FailureReason>,
    /// Stages that finished successfully, in execution order
    pub completed_stages: Vec<Stage>,
}

impl BatchTransaction {
    /// New draft over an aggregated summary
    pub fn draft(summary: BatchSummary) -> Self {
        Self {
            id: BatchId::new(),
            created_at: Utc::now(),
            summary,
            status: BatchStatus::Draft,
            approvals_received: 0,
            approvals_required: 0,
            privacy_enabled: false,
            tx_hash: None,
            failure_reason: None,
            completed_stages: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
