//! batchpay - batch payments from a simulated multisig treasury
//!
//! Imports a recipient table, runs it through approval and the execution
//! pipeline, and prints progress snapshots as JSON lines on stdout.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use treasury_batch::config::{ImportMode, LoggingConfig};
use treasury_batch::core::{RecipientParser, TokenRegistry};
use treasury_batch::services::simulated_collaborators;
use treasury_batch::utils::logging::init_logging;
use treasury_batch::{
    Address, BatchOrchestrator, BatchStatus, BatchSummary, Config, TokenSymbol, TreasuryAccount,
};

const TREASURY_ADDRESS: &str = "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c";

#[derive(Parser)]
#[command(name = "batchpay", version, about = "Batch payments from a multisig treasury")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import, approve and execute a batch against a simulated treasury
    Run(RunArgs),
    /// Parse and aggregate a recipient table without executing it
    Validate(ImportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Recipient table with an `address,amount,name` header
    #[arg(long)]
    csv: PathBuf,
    /// Token every recipient is paid in
    #[arg(long, default_value = "USDC")]
    token: String,
    /// Fail on the first incomplete row instead of skipping it
    #[arg(long)]
    strict: bool,
    /// YAML configuration file; environment variables are used otherwise
    #[arg(long, env = "BATCHPAY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    import: ImportArgs,
    /// Route the transfer through the privacy layer
    #[arg(long)]
    private: bool,
    /// Treasury balance in the batch token
    #[arg(long, default_value = "1000000")]
    balance: Decimal,
    #[arg(long, default_value_t = 3)]
    signers: u32,
    #[arg(long, default_value_t = 2)]
    threshold: u32,
    /// Override the simulated stage delay
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    summary: &'a BatchSummary,
    total_amount: Decimal,
    recipient_count: usize,
    skipped_rows: &'a [usize],
    duplicate_addresses: Vec<Address>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Validate(args) => validate(args).await,
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(args: &ImportArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    if args.strict {
        config.batch.import.mode = ImportMode::Strict;
    }
    Ok(config)
}

fn start_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    init_logging(config).context("logging setup failed")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

async fn read_table(path: &PathBuf) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

async fn validate(args: ImportArgs) -> anyhow::Result<bool> {
    let config = load_config(&args).await?;
    start_logging(config.logging())?;

    let tokens = TokenRegistry::from_config(config.tokens())?;
    let spec = tokens.resolve(&args.token)?;
    let raw = read_table(&args.csv).await?;

    let parsed = RecipientParser::new(spec, config.import().mode).parse_table(&raw)?;
    if parsed.recipients.is_empty() {
        bail!("no valid recipients in {}", args.csv.display());
    }
    let summary = BatchSummary::aggregate_with_policy(
        spec.symbol.clone(),
        parsed.recipients,
        config.import().duplicates,
    )?;

    print_json(&ValidationReport {
        total_amount: summary.total_amount(),
        recipient_count: summary.recipient_count(),
        skipped_rows: &parsed.skipped_rows,
        duplicate_addresses: summary.duplicate_addresses(),
        summary: &summary,
    })?;
    Ok(true)
}

async fn run(args: RunArgs) -> anyhow::Result<bool> {
    let mut config = load_config(&args.import).await?;
    if let Some(delay) = args.delay_ms {
        config.batch.simulation.stage_delay_ms = delay;
    }
    start_logging(config.logging())?;

    let mut balances = BTreeMap::new();
    balances.insert(TokenSymbol::new(&args.import.token), args.balance);
    let treasury = TreasuryAccount::new(
        Address::parse(TREASURY_ADDRESS)?,
        balances,
        args.signers,
        args.threshold,
        "simulated",
    )?;

    let orchestrator = BatchOrchestrator::new(
        &config,
        simulated_collaborators(treasury, config.simulation()),
    )?;
    let treasury = orchestrator.connect_treasury().await?;

    let raw = read_table(&args.import.csv).await?;
    let report = orchestrator.create_draft_with_report(&raw, &args.import.token)?;
    let id = report.transaction.id;
    info!(transaction_id = %id, skipped = ?report.skipped_rows, "Draft ready");

    orchestrator.submit_for_approval(id, &treasury)?;
    orchestrator.set_privacy(id, args.private)?;
    print_json(&orchestrator.fee_quote(id)?)?;

    let mut progress = orchestrator.subscribe(id)?;
    let handle = orchestrator.start(id)?;

    let initial = progress.borrow_and_update().clone();
    print_json(&initial)?;
    while progress.changed().await.is_ok() {
        let snapshot = progress.borrow_and_update().clone();
        print_json(&snapshot)?;
        if snapshot.status.is_terminal() {
            break;
        }
    }

    let finished = match handle.await? {
        Ok(transaction) => transaction,
        Err(_) => orchestrator.status(id)?,
    };
    print_json(&finished)?;
    Ok(finished.status == BatchStatus::Completed)
}
