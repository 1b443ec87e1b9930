//! Pipeline stages, stage profiles and failure reasons

use crate::core::batch::BatchStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the execution pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Gather multisig approvals up to the threshold
    CollectSignatures,
    /// Submit the batch transfer publicly
    Broadcast,
    /// Move the batch total into the privacy layer
    InitiateShielding,
    /// Create one-time intermediary addresses
    CreateEphemeralAddresses,
    /// Spend the shielded funds to the recipients
    PrivateTransfer,
    /// Wait for on-chain confirmation
    Confirm,
}

impl Stage {
    /// Status published while this stage is in flight
    pub fn status(&self) -> BatchStatus {
        match self {
            Stage::CollectSignatures => BatchStatus::PendingApproval,
            Stage::InitiateShielding | Stage::CreateEphemeralAddresses => BatchStatus::Shielding,
            Stage::Broadcast | Stage::PrivateTransfer => BatchStatus::Broadcasting,
            Stage::Confirm => BatchStatus::Confirming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::CollectSignatures => "CollectSignatures",
            Stage::Broadcast => "Broadcast",
            Stage::InitiateShielding => "InitiateShielding",
            Stage::CreateEphemeralAddresses => "CreateEphemeralAddresses",
            Stage::PrivateTransfer => "PrivateTransfer",
            Stage::Confirm => "Confirm",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STANDARD_STAGES: &[Stage] = &[Stage::CollectSignatures, Stage::Broadcast, Stage::Confirm];

const PRIVATE_STAGES: &[Stage] = &[
    Stage::CollectSignatures,
    Stage::InitiateShielding,
    Stage::CreateEphemeralAddresses,
    Stage::PrivateTransfer,
    Stage::Confirm,
];

/// Fixed stage order, chosen once per transaction from its privacy flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageProfile {
    Standard,
    Private,
}

impl StageProfile {
    pub fn for_privacy(privacy_enabled: bool) -> Self {
        if privacy_enabled {
            StageProfile::Private
        } else {
            StageProfile::Standard
        }
    }

    pub fn stages(&self) -> &'static [Stage] {
        match self {
            StageProfile::Standard => STANDARD_STAGES,
            StageProfile::Private => PRIVATE_STAGES,
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages().len()
    }
}

/// Why a stage did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    /// The collaborator explicitly refused
    Rejected(String),
    /// No definitive answer in time, from the stage timeout or the collaborator
    Timeout(String),
    /// The collaborator could not be reached
    Unavailable(String),
    /// Cancelled by the user before the next stage began
    UserCancelled,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Rejected(msg) => write!(f, "rejected: {}", msg),
            FailureCause::Timeout(msg) => write!(f, "timed out: {}", msg),
            FailureCause::Unavailable(msg) => write!(f, "unavailable: {}", msg),
            FailureCause::UserCancelled => f.write_str("UserCancelled"),
        }
    }
}

/// Recorded on a `Failed` transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    /// Failing stage; `None` when cancelled outside a stage
    pub stage: Option<Stage>,
    pub cause: FailureCause,
}

impl FailureReason {
    pub fn new(stage: Option<Stage>, cause: FailureCause) -> Self {
        Self { stage, cause }
    }

    pub fn cancelled() -> Self {
        Self::new(None, FailureCause::UserCancelled)
    }

    pub fn is_cancellation(&self) -> bool {
        self.cause == FailureCause::UserCancelled
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stage {
            Some(stage) => write!(f, "{}: {}", stage, self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}
