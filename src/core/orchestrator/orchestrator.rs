//! Batch payment orchestrator
//!
//! Owns every [`BatchTransaction`] it creates and is the only writer of their
//! state. Preconditions are checked under the map lock, so two concurrent
//! `execute` calls on one id cannot both pass; the lock is never held across
//! a collaborator call.

use super::progress::{EntryObserver, ProgressSnapshot, TransactionEntry};
use crate::config::{Config, ImportConfig};
use crate::core::batch::{BatchId, BatchStatus, BatchSummary, BatchTransaction};
use crate::core::fees::{FeeQuote, FeeSchedule};
use crate::core::pipeline::{ExecutionPipeline, FailureReason, StageProfile};
use crate::core::recipients::{Recipient, RecipientParser, RecipientRow};
use crate::core::tokens::{TokenRegistry, TokenSpec};
use crate::core::traits::Collaborators;
use crate::core::treasury::TreasuryAccount;
use crate::utils::error::{PaymentError, Result};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A new draft together with the rows the lenient import skipped
#[derive(Debug, Clone, Serialize)]
pub struct DraftReport {
    pub transaction: BatchTransaction,
    pub skipped_rows: Vec<usize>,
}

struct Inner {
    tokens: TokenRegistry,
    import: ImportConfig,
    stage_timeout: Duration,
    fees: FeeSchedule,
    collaborators: Collaborators,
    transactions: RwLock<HashMap<BatchId, TransactionEntry>>,
}

/// Composes parsing, aggregation and the execution pipeline behind one
/// id-addressed API. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BatchOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("transactions", &self.inner.transactions.read().len())
            .finish_non_exhaustive()
    }
}

impl BatchOrchestrator {
    pub fn new(config: &Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let tokens = TokenRegistry::from_config(config.tokens())?;

        info!(
            tokens = tokens.len(),
            import_mode = %config.import().mode,
            stage_timeout_secs = config.pipeline().stage_timeout_secs,
            "Batch orchestrator initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                tokens,
                import: config.import().clone(),
                stage_timeout: config.pipeline().stage_timeout(),
                fees: FeeSchedule::from(config.fees()),
                collaborators,
                transactions: RwLock::new(HashMap::new()),
            }),
        })
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.inner.tokens
    }

    /// Ask the wallet for the treasury snapshot and check its invariants
    pub async fn connect_treasury(&self) -> Result<TreasuryAccount> {
        let account = self
            .inner
            .collaborators
            .wallet
            .connect()
            .await
            .map_err(|e| PaymentError::InvalidTreasury(format!("wallet connection failed: {}", e)))?
            .validated()?;

        info!(
            address = %account.address(),
            network = account.network(),
            threshold = account.approval_threshold(),
            "Treasury connected"
        );
        Ok(account)
    }

    /// Parse and aggregate tabular text into a new draft
    pub fn create_draft(&self, raw: &str, token: &str) -> Result<BatchTransaction> {
        self.create_draft_with_report(raw, token)
            .map(|report| report.transaction)
    }

    /// Like [`create_draft`](Self::create_draft), also reporting skipped rows
    pub fn create_draft_with_report(&self, raw: &str, token: &str) -> Result<DraftReport> {
        let spec = self.inner.tokens.resolve(token)?;
        let parsed = RecipientParser::new(spec, self.inner.import.mode).parse_table(raw)?;

        let transaction = self.insert_draft(spec, parsed.recipients, false)?;
        if !parsed.skipped_rows.is_empty() {
            warn!(
                transaction_id = %transaction.id,
                skipped = ?parsed.skipped_rows,
                "Draft created with skipped rows"
            );
        }

        Ok(DraftReport {
            transaction,
            skipped_rows: parsed.skipped_rows,
        })
    }

    /// Create a draft from manually entered rows
    pub fn create_draft_from_rows(
        &self,
        rows: &[RecipientRow],
        token: &str,
    ) -> Result<BatchTransaction> {
        let spec = self.inner.tokens.resolve(token)?;
        let recipients = RecipientParser::new(spec, self.inner.import.mode).parse_rows(rows)?;
        self.insert_draft(spec, recipients, false)
    }

    fn insert_draft(
        &self,
        spec: &TokenSpec,
        recipients: Vec<Recipient>,
        privacy_enabled: bool,
    ) -> Result<BatchTransaction> {
        if recipients.is_empty() {
            return Err(PaymentError::EmptyBatch);
        }
        let summary = BatchSummary::aggregate_with_policy(
            spec.symbol.clone(),
            recipients,
            self.inner.import.duplicates,
        )?;
        self.insert(summary, privacy_enabled)
    }

    fn insert(&self, summary: BatchSummary, privacy_enabled: bool) -> Result<BatchTransaction> {
        for duplicate in summary.duplicate_addresses() {
            warn!(address = %duplicate.short(), "Address appears more than once in batch");
        }

        let mut transaction = BatchTransaction::draft(summary);
        transaction.privacy_enabled = privacy_enabled;

        let mut transactions = self.inner.transactions.write();
        let seq = transactions.len() as u64;
        transactions.insert(transaction.id, TransactionEntry::new(transaction.clone(), seq));

        info!(
            transaction_id = %transaction.id,
            recipients = transaction.summary.recipient_count(),
            total = %transaction.summary.total_amount(),
            token = %transaction.summary.token(),
            "Draft created"
        );
        Ok(transaction)
    }

    /// Move a draft to `PendingApproval` once the treasury covers it
    pub fn submit_for_approval(
        &self,
        id: BatchId,
        treasury: &TreasuryAccount,
    ) -> Result<BatchTransaction> {
        self.update(id, |entry| {
            let tx = &mut entry.transaction;
            if tx.is_terminal() {
                return Err(PaymentError::AlreadyTerminal(id));
            }
            if tx.status != BatchStatus::Draft {
                return Err(PaymentError::InvalidTransition {
                    status: tx.status,
                    operation: "submit",
                });
            }
            treasury.ensure_covers(&tx.summary)?;

            tx.status = BatchStatus::PendingApproval;
            tx.approvals_required = treasury.approval_threshold();
            info!(
                transaction_id = %id,
                approvals_required = tx.approvals_required,
                "Submitted for approval"
            );
            Ok(())
        })
    }

    /// Choose the stage profile; only before execution starts
    pub fn set_privacy(&self, id: BatchId, enabled: bool) -> Result<BatchTransaction> {
        self.update(id, |entry| {
            let status = entry.transaction.status;
            let editable = matches!(status, BatchStatus::Draft | BatchStatus::PendingApproval);
            if entry.executing || !editable {
                return Err(PaymentError::InvalidTransition {
                    status,
                    operation: "change privacy",
                });
            }
            entry.transaction.privacy_enabled = enabled;
            debug!(transaction_id = %id, enabled, "Privacy flag set");
            Ok(())
        })
    }

    /// Run the pipeline to a terminal state.
    ///
    /// On stage failure the stored transaction is `Failed` and the reason is
    /// returned as [`PaymentError::Execution`]. The pipeline runs on its own
    /// task; dropping this future stops the wait, not the pipeline.
    pub async fn execute(&self, id: BatchId) -> Result<BatchTransaction> {
        self.start(id)?
            .await
            .map_err(|e| PaymentError::Internal(format!("execution task failed: {}", e)))?
    }

    /// Same checks as [`execute`](Self::execute), but runs the pipeline on a
    /// spawned task
    pub fn start(&self, id: BatchId) -> Result<JoinHandle<Result<BatchTransaction>>> {
        let (pipeline, transaction) = self.begin_execution(id)?;
        let orchestrator = self.clone();
        Ok(tokio::spawn(async move {
            orchestrator.drive(pipeline, transaction).await
        }))
    }

    fn begin_execution(&self, id: BatchId) -> Result<(ExecutionPipeline, BatchTransaction)> {
        let mut transactions = self.inner.transactions.write();
        let entry = transactions.get_mut(&id).ok_or(PaymentError::NotFound(id))?;

        let status = entry.transaction.status;
        if status.is_terminal() {
            return Err(PaymentError::AlreadyTerminal(id));
        }
        if entry.executing {
            return Err(PaymentError::AlreadyExecuting(id));
        }
        if !matches!(status, BatchStatus::PendingApproval | BatchStatus::Approved) {
            return Err(PaymentError::InvalidTransition {
                status,
                operation: "execute",
            });
        }

        entry.executing = true;
        entry.cancel_requested = false;

        let profile = StageProfile::for_privacy(entry.transaction.privacy_enabled);
        let pipeline = ExecutionPipeline::new(
            profile,
            self.inner.collaborators.clone(),
            self.inner.stage_timeout,
        );

        info!(
            transaction_id = %id,
            profile = ?profile,
            stages = profile.stage_count(),
            "Execution started"
        );
        Ok((pipeline, entry.transaction.clone()))
    }

    async fn drive(
        &self,
        pipeline: ExecutionPipeline,
        transaction: BatchTransaction,
    ) -> Result<BatchTransaction> {
        let id = transaction.id;
        let observer = EntryObserver {
            transactions: &self.inner.transactions,
            id,
        };
        let outcome = pipeline.run(&transaction, &observer).await;

        let mut transactions = self.inner.transactions.write();
        let entry = transactions.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        entry.executing = false;
        entry.cancel_requested = false;

        let result = match outcome {
            Ok(tx_hash) => {
                info!(transaction_id = %id, tx_hash = %tx_hash, "Transaction completed");
                entry.transaction.status = BatchStatus::Completed;
                entry.transaction.tx_hash = Some(tx_hash);
                entry.stage_index = pipeline.total_stages();
                Ok(entry.transaction.clone())
            }
            Err(reason) => {
                if reason.is_cancellation() {
                    warn!(transaction_id = %id, "Transaction cancelled");
                } else {
                    error!(transaction_id = %id, reason = %reason, "Transaction failed");
                }
                entry.transaction.status = BatchStatus::Failed;
                entry.transaction.failure_reason = Some(reason.clone());
                Err(PaymentError::Execution(reason))
            }
        };
        entry.publish();
        result
    }

    /// Read-only snapshot of a transaction
    pub fn status(&self, id: BatchId) -> Result<BatchTransaction> {
        self.read(id, |entry| entry.transaction.clone())
    }

    pub fn progress(&self, id: BatchId) -> Result<ProgressSnapshot> {
        self.read(id, TransactionEntry::snapshot)
    }

    /// Receive a fresh snapshot after every transition
    pub fn subscribe(&self, id: BatchId) -> Result<watch::Receiver<ProgressSnapshot>> {
        self.read(id, TransactionEntry::subscribe)
    }

    /// All transactions, newest first
    pub fn list_transactions(&self) -> Vec<BatchTransaction> {
        let transactions = self.inner.transactions.read();
        let mut entries: Vec<&TransactionEntry> = transactions.values().collect();
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        entries
            .into_iter()
            .map(|entry| entry.transaction.clone())
            .collect()
    }

    /// Cancel before the next stage begins.
    ///
    /// An idle transaction fails immediately; an executing one is failed by
    /// its pipeline once the stage in flight finishes. Once the final stage
    /// has begun the request is rejected with `InvalidTransition`.
    pub fn cancel(&self, id: BatchId) -> Result<BatchTransaction> {
        self.update(id, |entry| {
            if entry.transaction.is_terminal() {
                return Err(PaymentError::AlreadyTerminal(id));
            }
            if entry.executing {
                let total = StageProfile::for_privacy(entry.transaction.privacy_enabled).stage_count();
                if entry.stage_index >= total {
                    // The last stage is in flight; nothing is left to stop
                    return Err(PaymentError::InvalidTransition {
                        status: entry.transaction.status,
                        operation: "cancel during the final stage",
                    });
                }
                entry.cancel_requested = true;
                info!(transaction_id = %id, "Cancellation requested");
                return Ok(());
            }

            entry.transaction.status = BatchStatus::Failed;
            entry.transaction.failure_reason = Some(FailureReason::cancelled());
            warn!(transaction_id = %id, "Transaction cancelled");
            Ok(())
        })
    }

    /// New draft with the recipients, token and privacy flag of a failed one
    pub fn retry_as_draft(&self, id: BatchId) -> Result<BatchTransaction> {
        let failed = self.status(id)?;
        if failed.status != BatchStatus::Failed {
            return Err(PaymentError::InvalidTransition {
                status: failed.status,
                operation: "retry",
            });
        }

        let retry = self.insert(failed.summary, failed.privacy_enabled)?;
        info!(transaction_id = %retry.id, retry_of = %id, "Retry draft created");
        Ok(retry)
    }

    pub fn add_recipient(&self, id: BatchId, row: &RecipientRow) -> Result<BatchTransaction> {
        self.edit_draft(id, "add recipient", |spec, recipients| {
            recipients.push(Recipient::from_row(row, spec)?);
            Ok(())
        })
    }

    pub fn update_recipient(
        &self,
        id: BatchId,
        index: usize,
        row: &RecipientRow,
    ) -> Result<BatchTransaction> {
        self.edit_draft(id, "update recipient", |spec, recipients| {
            let len = recipients.len();
            let slot = recipients
                .get_mut(index)
                .ok_or(PaymentError::RecipientIndexOutOfRange { index, len })?;
            *slot = Recipient::from_row(row, spec)?;
            Ok(())
        })
    }

    pub fn remove_recipient(&self, id: BatchId, index: usize) -> Result<BatchTransaction> {
        self.edit_draft(id, "remove recipient", |_, recipients| {
            if index >= recipients.len() {
                return Err(PaymentError::RecipientIndexOutOfRange {
                    index,
                    len: recipients.len(),
                });
            }
            recipients.remove(index);
            Ok(())
        })
    }

    /// Fees the transaction would pay with its current privacy flag
    pub fn fee_quote(&self, id: BatchId) -> Result<FeeQuote> {
        self.read(id, |entry| {
            self.inner.fees.quote(
                entry.transaction.summary.token(),
                entry.transaction.privacy_enabled,
            )
        })
    }

    fn edit_draft<F>(&self, id: BatchId, operation: &'static str, edit: F) -> Result<BatchTransaction>
    where
        F: FnOnce(&TokenSpec, &mut Vec<Recipient>) -> Result<()>,
    {
        let tokens = &self.inner.tokens;
        let duplicates = self.inner.import.duplicates;
        self.update(id, |entry| {
            let tx = &mut entry.transaction;
            if tx.status != BatchStatus::Draft {
                return Err(PaymentError::InvalidTransition {
                    status: tx.status,
                    operation,
                });
            }

            let spec = tokens.resolve(tx.summary.token().as_str())?;
            let mut recipients = tx.summary.clone().into_recipients();
            edit(spec, &mut recipients)?;
            if recipients.is_empty() {
                return Err(PaymentError::EmptyBatch);
            }

            tx.summary =
                BatchSummary::aggregate_with_policy(spec.symbol.clone(), recipients, duplicates)?;
            debug!(
                transaction_id = %id,
                operation,
                recipients = tx.summary.recipient_count(),
                "Draft edited"
            );
            Ok(())
        })
    }

    fn read<T>(&self, id: BatchId, f: impl FnOnce(&TransactionEntry) -> T) -> Result<T> {
        let transactions = self.inner.transactions.read();
        transactions
            .get(&id)
            .map(f)
            .ok_or(PaymentError::NotFound(id))
    }

    /// Apply `f` under the write lock. A failed update leaves the entry
    /// untouched; a successful one is published.
    fn update(
        &self,
        id: BatchId,
        f: impl FnOnce(&mut TransactionEntry) -> Result<()>,
    ) -> Result<BatchTransaction> {
        let mut transactions = self.inner.transactions.write();
        let entry = transactions.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        f(entry)?;
        entry.publish();
        Ok(entry.transaction.clone())
    }
}
