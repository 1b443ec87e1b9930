//! Configuration loading tests

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedServices, TableFactory, treasury};
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use treasury_batch::config::{DuplicatePolicy, ImportMode};
    use treasury_batch::{BatchOrchestrator, Config, PaymentError};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_file_config_drives_orchestrator() {
        let file = write_config(
            r#"
tokens:
  - symbol: "EURC"
    decimals: 2
import:
  mode: strict
fees:
  standard_fee: "1.5"
  privacy_fee: "20"
"#,
        );
        let config = Config::from_file(file.path()).await.unwrap();
        let orchestrator = BatchOrchestrator::new(
            &config,
            Arc::new(ScriptedServices::new()).collaborators(),
        )
        .unwrap();

        assert!(matches!(
            orchestrator.create_draft(&TableFactory::alice_and_bob(), "USDC"),
            Err(PaymentError::UnsupportedToken(_))
        ));

        let draft = orchestrator
            .create_draft(&TableFactory::alice_and_bob(), "eurc")
            .unwrap();
        assert_eq!(draft.summary.token().as_str(), "EURC");

        orchestrator.set_privacy(draft.id, true).unwrap();
        let quote = orchestrator.fee_quote(draft.id).unwrap();
        assert_eq!(quote.total, Decimal::new(215, 1));
    }

    #[tokio::test]
    async fn test_unknown_import_mode_is_rejected() {
        let file = write_config("import:\n  mode: sloppy\n");
        assert!(matches!(
            Config::from_file(file.path()).await,
            Err(PaymentError::Yaml(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_tokens_are_rejected() {
        let file = write_config(
            "tokens:\n  - symbol: USDC\n    decimals: 6\n  - symbol: usdc\n    decimals: 2\n",
        );
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: this is the only test that touches BATCHPAY_ variables
        unsafe {
            std::env::set_var("BATCHPAY_IMPORT_MODE", "strict");
            std::env::set_var("BATCHPAY_DUPLICATES", "reject");
            std::env::set_var("BATCHPAY_STAGE_TIMEOUT_SECS", "9");
            std::env::set_var("BATCHPAY_TOKENS", "USDC:6,WBTC:8");
        }

        let loaded = Config::from_env();

        unsafe {
            std::env::remove_var("BATCHPAY_IMPORT_MODE");
            std::env::remove_var("BATCHPAY_DUPLICATES");
            std::env::remove_var("BATCHPAY_STAGE_TIMEOUT_SECS");
            std::env::remove_var("BATCHPAY_TOKENS");
        }

        let config = loaded.unwrap();
        assert_eq!(config.import().mode, ImportMode::Strict);
        assert_eq!(config.import().duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.pipeline().stage_timeout_secs, 9);
        assert_eq!(config.tokens().len(), 2);
        assert_eq!(config.simulation().stage_delay_ms, 2000);
    }

    #[test]
    fn test_submission_uses_treasury_threshold() {
        let orchestrator = BatchOrchestrator::new(
            &Config::default(),
            Arc::new(ScriptedServices::new()).collaborators(),
        )
        .unwrap();
        let draft = orchestrator
            .create_draft(&TableFactory::alice_and_bob(), "USDC")
            .unwrap();

        let pending = orchestrator
            .submit_for_approval(draft.id, &treasury(300, 3))
            .unwrap();
        assert_eq!(pending.approvals_required, 3);
    }
}
