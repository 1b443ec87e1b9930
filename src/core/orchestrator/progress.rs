//! Progress tracking
//!
//! Each stored transaction carries a small amount of execution state next to
//! the record itself, and a watch channel that carries a fresh
//! [`ProgressSnapshot`] after every transition.

use crate::core::batch::{BatchId, BatchStatus, BatchTransaction, TxHash};
use crate::core::pipeline::{FailureReason, Stage, StageEffect, StageObserver, StageProfile};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::{debug, info};

/// What a presentation layer needs to render one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub transaction_id: BatchId,
    pub status: BatchStatus,
    /// Stage in flight, or the last one that ran
    pub stage: Option<Stage>,
    /// 1-based position of `stage`; 0 before execution, `total_stages` once completed
    pub stage_index: usize,
    pub total_stages: usize,
    pub total_amount: Decimal,
    pub recipient_count: usize,
    pub failure_reason: Option<FailureReason>,
    pub tx_hash: Option<TxHash>,
}

impl ProgressSnapshot {
    /// Fraction of stages done, in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total_stages == 0 {
            return 0.0;
        }
        self.stage_index as f64 / self.total_stages as f64
    }
}

pub(super) struct TransactionEntry {
    pub(super) transaction: BatchTransaction,
    /// Insertion order, used for newest-first listings
    pub(super) seq: u64,
    pub(super) executing: bool,
    pub(super) cancel_requested: bool,
    pub(super) stage: Option<Stage>,
    pub(super) stage_index: usize,
    progress: watch::Sender<ProgressSnapshot>,
}

impl TransactionEntry {
    pub(super) fn new(transaction: BatchTransaction, seq: u64) -> Self {
        let initial = snapshot_of(&transaction, None, 0);
        let (progress, _) = watch::channel(initial);
        Self {
            transaction,
            seq,
            executing: false,
            cancel_requested: false,
            stage: None,
            stage_index: 0,
            progress,
        }
    }

    pub(super) fn snapshot(&self) -> ProgressSnapshot {
        snapshot_of(&self.transaction, self.stage, self.stage_index)
    }

    pub(super) fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    /// Push the current state to every subscriber
    pub(super) fn publish(&self) {
        self.progress.send_replace(self.snapshot());
    }
}

fn snapshot_of(
    transaction: &BatchTransaction,
    stage: Option<Stage>,
    stage_index: usize,
) -> ProgressSnapshot {
    ProgressSnapshot {
        transaction_id: transaction.id,
        status: transaction.status,
        stage,
        stage_index,
        total_stages: StageProfile::for_privacy(transaction.privacy_enabled).stage_count(),
        total_amount: transaction.summary.total_amount(),
        recipient_count: transaction.summary.recipient_count(),
        failure_reason: transaction.failure_reason.clone(),
        tx_hash: transaction.tx_hash.clone(),
    }
}

/// Applies pipeline transitions to the stored entry of one transaction
pub(super) struct EntryObserver<'a> {
    pub(super) transactions: &'a RwLock<HashMap<BatchId, TransactionEntry>>,
    pub(super) id: BatchId,
}

impl StageObserver for EntryObserver<'_> {
    fn stage_started(&self, index: usize, stage: Stage) -> bool {
        let mut transactions = self.transactions.write();
        let Some(entry) = transactions.get_mut(&self.id) else {
            return false;
        };
        if entry.cancel_requested {
            return false;
        }

        entry.stage = Some(stage);
        entry.stage_index = index + 1;
        entry.transaction.status = stage.status();
        entry.publish();

        info!(
            transaction_id = %self.id,
            stage = %stage,
            status = %entry.transaction.status,
            "Stage started"
        );
        true
    }

    fn stage_succeeded(&self, _index: usize, stage: Stage, effect: &StageEffect) {
        let mut transactions = self.transactions.write();
        let Some(entry) = transactions.get_mut(&self.id) else {
            return;
        };

        entry.transaction.completed_stages.push(stage);
        if let StageEffect::SignaturesCollected { approvals } = effect {
            entry.transaction.approvals_received = *approvals;
            entry.transaction.status = BatchStatus::Approved;
        }
        entry.publish();

        debug!(transaction_id = %self.id, stage = %stage, "Stage succeeded");
    }
}
