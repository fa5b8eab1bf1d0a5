//! Command line surface.
//!
//! `serve` (the default) runs the exporter until the shutdown future resolves.
//! `update` is the out-of-process entry point for test runners: it folds one
//! run into the snapshot file and exits, and the running exporter picks the
//! change up on its next scrape.

use std::future::Future;

use clap::{Args, Parser, Subcommand};

use ats_metrics_core::error::Result;
use ats_metrics_core::{MetricSet, RunReport};

use crate::app_state::AppState;
use crate::config::ExporterConfig;
use crate::server;

#[derive(Debug, Parser)]
#[command(
    name = "ats-metrics-exporter",
    version,
    about = "Prometheus exporter for ATS test runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve /metrics and /health (default).
    Serve,
    /// Record one test run into the metrics file.
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Passed tests to add to the total.
    #[arg(long, default_value_t = 0)]
    pub passed: u64,

    /// Failed tests to add to the total.
    #[arg(long, default_value_t = 0)]
    pub failed: u64,

    /// Duration of this run in seconds.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub duration: f64,

    /// Firmware version under test. Empty keeps the recorded one.
    #[arg(long, default_value = "")]
    pub fw_version: String,

    /// 1 while a run is active, 0 otherwise.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub in_progress: u8,
}

impl UpdateArgs {
    pub fn to_report(&self) -> RunReport {
        RunReport {
            passed: self.passed,
            failed: self.failed,
            duration_secs: self.duration,
            fw_version: self.fw_version.clone(),
            in_progress: self.in_progress == 1,
        }
    }
}

/// Restore from the snapshot, serve until `shutdown` resolves, then drain.
pub async fn serve<F>(cfg: ExporterConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let state = AppState::restore(cfg);
    let handle = server::spawn(state).await?;

    let addr = handle.local_addr();
    tracing::info!("metrics endpoint: http://{addr}/metrics");
    tracing::info!("health endpoint: http://{addr}/health");

    shutdown.await;
    tracing::info!("shutting down metrics exporter");
    handle.shutdown().await
}

/// Apply one run on top of the persisted snapshot and write it back.
pub fn update(cfg: ExporterConfig, args: &UpdateArgs) -> Result<MetricSet> {
    let report = args.to_report();
    report.validate()?;

    let state = AppState::new(cfg);
    state.store().refresh();
    state.store().update(&report);

    let set = state.store().snapshot();
    tracing::info!(
        pass_total = set.pass_total,
        fail_total = set.fail_total,
        path = %state.cfg().metrics_file.display(),
        "recorded test run"
    );
    Ok(set)
}
