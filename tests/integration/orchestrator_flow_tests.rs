//! Orchestrator lifecycle tests
//!
//! Drafts are driven to a terminal state against scripted collaborators and
//! the recorded call order is checked against the stage profile.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedServices, TableFactory, fast_config, treasury};
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::time::Duration;
    use treasury_batch::{
        BatchId, BatchOrchestrator, BatchStatus, FailureCause, PaymentError, ServiceError, Stage,
        TxHash,
    };

    fn orchestrator(services: &Arc<ScriptedServices>) -> BatchOrchestrator {
        BatchOrchestrator::new(&fast_config(), services.collaborators()).unwrap()
    }

    fn submitted(orchestrator: &BatchOrchestrator, private: bool) -> BatchId {
        let draft = orchestrator
            .create_draft(&TableFactory::alice_and_bob(), "USDC")
            .unwrap();
        orchestrator
            .submit_for_approval(draft.id, &treasury(500, 2))
            .unwrap();
        orchestrator.set_privacy(draft.id, private).unwrap();
        draft.id
    }

    // ==================== Acceptance scenarios ====================

    #[test]
    fn test_scenario_two_rows_against_two_treasuries() {
        let services = Arc::new(ScriptedServices::new());
        let orchestrator = orchestrator(&services);

        let draft = orchestrator
            .create_draft(&TableFactory::alice_and_bob(), "USDC")
            .unwrap();
        assert_eq!(draft.summary.recipient_count(), 2);
        assert_eq!(draft.summary.total_amount(), Decimal::from(300));

        let poor = orchestrator.submit_for_approval(draft.id, &treasury(250, 2));
        match poor {
            Err(PaymentError::InsufficientFunds {
                required,
                available,
                ..
            }) => {
                assert_eq!(required, Decimal::from(300));
                assert_eq!(available, Decimal::from(250));
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
        assert_eq!(
            orchestrator.status(draft.id).unwrap().status,
            BatchStatus::Draft
        );

        let rich = treasury(500, 3);
        let pending = orchestrator.submit_for_approval(draft.id, &rich).unwrap();
        assert_eq!(pending.status, BatchStatus::PendingApproval);
        assert_eq!(pending.approvals_required, rich.approval_threshold());
    }

    #[tokio::test]
    async fn test_standard_profile_visits_three_stages() {
        let services = Arc::new(ScriptedServices::new());
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, false);

        let done = orchestrator.execute(id).await.unwrap();

        assert_eq!(
            services.calls(),
            vec!["collect_signatures", "broadcast", "confirm"]
        );
        assert_eq!(done.status, BatchStatus::Completed);
        assert_eq!(done.tx_hash, Some(TxHash::new("0xpublic")));
    }

    #[tokio::test]
    async fn test_private_profile_visits_five_stages() {
        let services = Arc::new(ScriptedServices::new());
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, true);

        let done = orchestrator.execute(id).await.unwrap();

        assert_eq!(
            services.calls(),
            vec![
                "collect_signatures",
                "shield",
                "create_ephemeral_addresses",
                "private_transfer",
                "confirm",
            ]
        );
        assert_eq!(done.completed_stages.len(), 5);
        assert_eq!(done.tx_hash, Some(TxHash::new("0xprivate")));
    }

    #[tokio::test]
    async fn test_failure_at_private_transfer_is_final() {
        let services = Arc::new(
            ScriptedServices::new().failing_at(
                "private_transfer",
                ServiceError::Rejected("nullifier already spent".to_string()),
            ),
        );
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, true);

        assert!(matches!(
            orchestrator.execute(id).await,
            Err(PaymentError::Execution(_))
        ));

        let failed = orchestrator.status(id).unwrap();
        assert_eq!(failed.status, BatchStatus::Failed);
        assert_eq!(failed.tx_hash, None);
        assert_eq!(
            failed.failure_reason.as_ref().and_then(|r| r.stage),
            Some(Stage::PrivateTransfer)
        );
        assert!(!services.calls().contains(&"confirm"));

        // Terminal: nothing moves it out of Failed
        assert!(orchestrator.execute(id).await.is_err());
        assert!(orchestrator.cancel(id).is_err());
        assert!(orchestrator.set_privacy(id, false).is_err());
        assert_eq!(orchestrator.status(id).unwrap(), failed);
    }

    #[tokio::test]
    async fn test_insufficient_approvals_fail_collect_signatures() {
        let services = Arc::new(ScriptedServices::new().with_approvals(1));
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, false);

        orchestrator.execute(id).await.unwrap_err();

        let failed = orchestrator.status(id).unwrap();
        let reason = failed.failure_reason.unwrap();
        assert_eq!(reason.stage, Some(Stage::CollectSignatures));
        assert!(matches!(reason.cause, FailureCause::Rejected(_)));
        assert_eq!(services.calls(), vec!["collect_signatures"]);
    }

    #[tokio::test]
    async fn test_confirmation_timeout_from_collaborator() {
        let services = Arc::new(ScriptedServices::new().failing_at(
            "confirm",
            ServiceError::Timeout("no confirmation after 12 blocks".to_string()),
        ));
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, false);

        orchestrator.execute(id).await.unwrap_err();

        let reason = orchestrator.status(id).unwrap().failure_reason.unwrap();
        assert_eq!(reason.stage, Some(Stage::Confirm));
        assert!(matches!(reason.cause, FailureCause::Timeout(_)));
    }

    #[tokio::test]
    async fn test_stage_timeout_fails_transaction() {
        let services = Arc::new(ScriptedServices::new().with_delay(Duration::from_secs(30)));
        let mut config = fast_config();
        config.batch.pipeline.stage_timeout_secs = 1;
        let orchestrator = BatchOrchestrator::new(&config, services.collaborators()).unwrap();
        let id = submitted(&orchestrator, false);

        orchestrator.execute(id).await.unwrap_err();

        let failed = orchestrator.status(id).unwrap();
        assert_eq!(failed.status, BatchStatus::Failed);
        let reason = failed.failure_reason.unwrap();
        assert_eq!(reason.stage, Some(Stage::CollectSignatures));
        assert!(matches!(reason.cause, FailureCause::Timeout(_)));
    }

    // ==================== Concurrency ====================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_second_execute_on_same_id_is_rejected() {
        let services =
            Arc::new(ScriptedServices::new().with_delay(Duration::from_millis(50)));
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, false);

        let first = orchestrator.clone();
        let second = orchestrator.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { first.execute(id).await }),
            tokio::spawn(async move { second.execute(id).await }),
        );
        let outcomes = [a.unwrap(), b.unwrap()];

        let completed = outcomes.iter().filter(|r| r.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|r| matches!(r, Err(PaymentError::AlreadyExecuting(_))))
            .count();
        assert_eq!((completed, rejected), (1, 1));
        assert_eq!(services.calls().len(), 3);
        assert_eq!(
            orchestrator.status(id).unwrap().status,
            BatchStatus::Completed
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_transactions_run_concurrently() {
        let services =
            Arc::new(ScriptedServices::new().with_delay(Duration::from_millis(20)));
        let orchestrator = orchestrator(&services);
        let ids: Vec<BatchId> = (0..4)
            .map(|i| submitted(&orchestrator, i % 2 == 0))
            .collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|id| orchestrator.start(*id).unwrap())
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for id in ids {
            assert_eq!(
                orchestrator.status(id).unwrap().status,
                BatchStatus::Completed
            );
        }
        assert_eq!(services.calls().len(), 2 * 5 + 2 * 3);
    }

    // ==================== Observation and cancellation ====================

    #[tokio::test]
    async fn test_progress_reports_stage_in_flight() {
        let services =
            Arc::new(ScriptedServices::new().with_delay(Duration::from_millis(10)));
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, true);

        let before = orchestrator.progress(id).unwrap();
        assert_eq!((before.stage_index, before.total_stages), (0, 5));

        let mut progress = orchestrator.subscribe(id).unwrap();
        let handle = orchestrator.start(id).unwrap();

        let shielding = progress
            .wait_for(|s| s.status == BatchStatus::Shielding)
            .await
            .unwrap()
            .clone();
        assert!(shielding.stage_index == 2 || shielding.stage_index == 3);
        assert_eq!(shielding.total_amount, Decimal::from(300));

        handle.await.unwrap().unwrap();
        let after = orchestrator.progress(id).unwrap();
        assert_eq!(after.stage_index, 5);
        assert_eq!(after.status, BatchStatus::Completed);
        assert_eq!(after.tx_hash, Some(TxHash::new("0xprivate")));
    }

    #[tokio::test]
    async fn test_cancel_then_retry() {
        let services =
            Arc::new(ScriptedServices::new().with_delay(Duration::from_millis(10)));
        let orchestrator = orchestrator(&services);
        let id = submitted(&orchestrator, true);

        let mut progress = orchestrator.subscribe(id).unwrap();
        let handle = orchestrator.start(id).unwrap();
        progress
            .wait_for(|s| s.stage == Some(Stage::InitiateShielding))
            .await
            .unwrap();
        orchestrator.cancel(id).unwrap();

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, PaymentError::Execution(ref r) if r.is_cancellation()));
        assert_eq!(
            services.calls(),
            vec!["collect_signatures", "shield"]
        );

        let retry = orchestrator.retry_as_draft(id).unwrap();
        assert_eq!(retry.status, BatchStatus::Draft);
        assert!(retry.privacy_enabled);

        let history: Vec<BatchId> = orchestrator
            .list_transactions()
            .iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(history, vec![retry.id, id]);
    }

    #[tokio::test]
    async fn test_connect_treasury_through_wallet() {
        let services = Arc::new(ScriptedServices::new());
        let orchestrator = orchestrator(&services);

        let account = orchestrator.connect_treasury().await.unwrap();
        assert_eq!(account.approval_threshold(), 2);
        assert_eq!(services.calls(), vec!["connect"]);
    }
}
