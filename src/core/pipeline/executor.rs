//! Execution pipeline
//!
//! Runs the stages of a [`StageProfile`] strictly in order. Each stage is a
//! suspending call to a collaborator bounded by the stage timeout. The
//! observer is told before a stage starts (so the in-flight status can be
//! published) and after it succeeds (so its effect can be applied). A stage
//! either succeeds as a whole or fails the run; nothing is retried.

use super::stage::{FailureCause, FailureReason, Stage, StageProfile};
use crate::core::batch::{BatchTransaction, TxHash};
use crate::core::recipients::Address;
use crate::core::traits::{Collaborators, ServiceError, ShieldedHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// What a successful stage produced
#[derive(Debug, Clone, PartialEq)]
pub enum StageEffect {
    SignaturesCollected { approvals: u32 },
    Shielded(ShieldedHandle),
    EphemeralAddressesCreated(Vec<Address>),
    Submitted(TxHash),
    Confirmed,
}

/// Receives stage transitions from a running pipeline
pub trait StageObserver: Send + Sync {
    /// Called before stage `index` (0-based) begins. Returning `false`
    /// aborts the run as a user cancellation.
    fn stage_started(&self, index: usize, stage: Stage) -> bool;

    /// Called after stage `index` succeeded
    fn stage_succeeded(&self, index: usize, stage: Stage, effect: &StageEffect);
}

/// Outputs carried from one stage to the next
#[derive(Debug, Default)]
struct StageContext {
    shielded: Option<ShieldedHandle>,
    ephemeral: Vec<Address>,
    tx_hash: Option<TxHash>,
}

impl StageContext {
    fn apply(&mut self, effect: StageEffect) {
        match effect {
            StageEffect::Shielded(handle) => self.shielded = Some(handle),
            StageEffect::EphemeralAddressesCreated(addresses) => self.ephemeral = addresses,
            StageEffect::Submitted(hash) => self.tx_hash = Some(hash),
            StageEffect::SignaturesCollected { .. } | StageEffect::Confirmed => {}
        }
    }
}

/// Sequential staged state machine for one transaction
#[derive(Debug, Clone)]
pub struct ExecutionPipeline {
    profile: StageProfile,
    collaborators: Collaborators,
    stage_timeout: Duration,
}

impl ExecutionPipeline {
    pub fn new(profile: StageProfile, collaborators: Collaborators, stage_timeout: Duration) -> Self {
        Self {
            profile,
            collaborators,
            stage_timeout,
        }
    }

    pub fn profile(&self) -> StageProfile {
        self.profile
    }

    pub fn total_stages(&self) -> usize {
        self.profile.stage_count()
    }

    /// Run every stage of the profile against `transaction`.
    ///
    /// Returns the hash of the confirmed transfer, or the reason the first
    /// failing stage gave.
    pub async fn run(
        &self,
        transaction: &BatchTransaction,
        observer: &dyn StageObserver,
    ) -> Result<TxHash, FailureReason> {
        let mut ctx = StageContext::default();
        let total = self.total_stages();

        for (index, &stage) in self.profile.stages().iter().enumerate() {
            if !observer.stage_started(index, stage) {
                info!(
                    transaction_id = %transaction.id,
                    stage = %stage,
                    "Cancellation honoured before stage start"
                );
                return Err(FailureReason::cancelled());
            }

            debug!(
                transaction_id = %transaction.id,
                stage = %stage,
                "Stage {}/{} started",
                index + 1,
                total
            );

            let outcome = tokio::time::timeout(
                self.stage_timeout,
                self.run_stage(stage, transaction, &ctx),
            )
            .await;

            let effect = match outcome {
                Ok(Ok(effect)) => effect,
                Ok(Err(e)) => {
                    let reason = FailureReason::new(Some(stage), cause_from_service(e));
                    error!(transaction_id = %transaction.id, stage = %stage, "Stage failed: {}", reason);
                    return Err(reason);
                }
                Err(_) => {
                    let reason = FailureReason::new(
                        Some(stage),
                        FailureCause::Timeout(format!(
                            "no response within {}ms",
                            self.stage_timeout.as_millis()
                        )),
                    );
                    error!(transaction_id = %transaction.id, stage = %stage, "Stage timed out");
                    return Err(reason);
                }
            };

            observer.stage_succeeded(index, stage, &effect);
            ctx.apply(effect);
        }

        ctx.tx_hash.ok_or_else(|| {
            FailureReason::new(
                Some(Stage::Confirm),
                FailureCause::Rejected("no transaction hash was produced".to_string()),
            )
        })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        transaction: &BatchTransaction,
        ctx: &StageContext,
    ) -> Result<StageEffect, ServiceError> {
        let summary = &transaction.summary;
        match stage {
            Stage::CollectSignatures => {
                let required = transaction.approvals_required;
                let approvals = self
                    .collaborators
                    .wallet
                    .collect_signatures(transaction.id, required)
                    .await?;
                if approvals < required {
                    return Err(ServiceError::Rejected(format!(
                        "{} of {} required approvals",
                        approvals, required
                    )));
                }
                Ok(StageEffect::SignaturesCollected { approvals })
            }
            Stage::Broadcast => {
                let hash = self.collaborators.chain.broadcast(transaction).await?;
                Ok(StageEffect::Submitted(hash))
            }
            Stage::InitiateShielding => {
                let handle = self
                    .collaborators
                    .privacy
                    .shield(summary.total_amount(), summary.token())
                    .await?;
                Ok(StageEffect::Shielded(handle))
            }
            Stage::CreateEphemeralAddresses => {
                let expected = summary.recipient_count();
                let addresses = self
                    .collaborators
                    .privacy
                    .create_ephemeral_addresses(expected)
                    .await?;
                if addresses.len() != expected {
                    return Err(ServiceError::Rejected(format!(
                        "expected {} ephemeral addresses, got {}",
                        expected,
                        addresses.len()
                    )));
                }
                Ok(StageEffect::EphemeralAddressesCreated(addresses))
            }
            Stage::PrivateTransfer => {
                let handle = ctx.shielded.as_ref().ok_or_else(|| {
                    ServiceError::Rejected("no shielded funds to transfer".to_string())
                })?;
                let hash = self
                    .collaborators
                    .privacy
                    .private_transfer(handle, summary.recipients(), &ctx.ephemeral)
                    .await?;
                Ok(StageEffect::Submitted(hash))
            }
            Stage::Confirm => {
                let hash = ctx.tx_hash.as_ref().ok_or_else(|| {
                    ServiceError::Rejected("nothing was submitted to confirm".to_string())
                })?;
                self.collaborators.chain.confirm(hash).await?;
                Ok(StageEffect::Confirmed)
            }
        }
    }
}

fn cause_from_service(err: ServiceError) -> FailureCause {
    match err {
        ServiceError::Rejected(msg) => FailureCause::Rejected(msg),
        ServiceError::Unavailable(msg) => FailureCause::Unavailable(msg),
        ServiceError::Timeout(msg) => FailureCause::Timeout(msg),
    }
}
