// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cloudns_sync::{
    config::Configuration,
    constants::ENV_LOG_FORMAT,
    metrics::PrometheusMetrics,
    provider::CloudnsProvider,
    snapshot::SnapshotDnsApi,
    types::Changes,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "cloudns-sync", version, about = "Reconcile desired DNS endpoints against ClouDNS records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the managed records as endpoints
    Records {
        /// Provider state file (YAML or JSON)
        #[arg(long)]
        state: PathBuf,
    },
    /// Compute the change set for a plan without applying it
    Plan {
        #[arg(long)]
        state: PathBuf,
        /// Plan changes file (Create, UpdateOld, UpdateNew, Delete)
        #[arg(long)]
        changes: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
    /// Run a full reconciliation pass and save the resulting state
    Apply {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        changes: PathBuf,
        /// Log intended changes without applying them (overrides DRY_RUN)
        #[arg(long)]
        dry_run: bool,
        /// Print provider API metrics when done
        #[arg(long)]
        metrics: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Configuration::from_env()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("cloudns-sync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli, config))
}

fn init_tracing(debug: bool) {
    // Respects RUST_LOG if set, otherwise defaults to INFO (DEBUG with CLOUDNS_DEBUG)
    let default_level = if debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let log_format = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn read_changes(path: &Path) -> Result<Changes> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read changes file {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let changes = if is_json {
        serde_json::from_str(&raw).with_context(|| format!("Invalid changes file {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw).with_context(|| format!("Invalid changes file {}", path.display()))?
    };
    Ok(changes)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling reconciliation pass");
            token.cancel();
        }
    });
    cancel
}

async fn async_main(cli: Cli, mut config: Configuration) -> Result<()> {
    init_tracing(config.debug);
    info!("Starting cloudns-sync");

    let cancel = cancel_on_ctrl_c();
    let metrics = Arc::new(PrometheusMetrics::new()?);

    match cli.command {
        Command::Records { state } => {
            let api = Arc::new(SnapshotDnsApi::load(state).await?);
            config.log_summary();
            let provider = CloudnsProvider::new(api, metrics, config);

            let endpoints = provider.records(&cancel).await?;
            println!("{}", serde_json::to_string_pretty(&endpoints)?);
        }
        Command::Plan {
            state,
            changes,
            output,
        } => {
            let api = Arc::new(SnapshotDnsApi::load(state).await?);
            let changes = read_changes(&changes).await?;
            config.log_summary();
            let provider = CloudnsProvider::new(api, metrics, config);

            let plan = provider.plan(&changes, &cancel).await?;
            let rendered = match output {
                OutputFormat::Json => serde_json::to_string_pretty(&plan)?,
                OutputFormat::Yaml => serde_yaml::to_string(&plan)?,
            };
            println!("{rendered}");
        }
        Command::Apply {
            state,
            changes,
            dry_run,
            metrics: print_metrics,
        } => {
            config.dry_run |= dry_run;
            let api = Arc::new(SnapshotDnsApi::load(state).await?);
            let changes = read_changes(&changes).await?;
            config.log_summary();
            let dry_run = config.dry_run;
            let provider = CloudnsProvider::new(api.clone(), metrics.clone(), config);

            let report = provider.apply_changes(&changes, &cancel).await?;
            if dry_run {
                debug!("Dry run, state file left unchanged");
            } else {
                api.save().await?;
            }
            info!(
                deleted = report.deleted,
                created = report.created,
                updated = report.updated,
                skipped = report.skipped,
                "Reconciliation pass complete"
            );
            if print_metrics {
                print!("{}", metrics.gather()?);
            }
        }
    }

    Ok(())
}
