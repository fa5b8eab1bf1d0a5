//! Exporter config loader (environment based).

pub mod schema;

use std::path::PathBuf;

use ats_metrics_core::error::{AtsMetricsError, Result};

pub use schema::{ExporterConfig, ENV_METRICS_FILE, ENV_METRICS_PORT};

pub fn load_from_env() -> Result<ExporterConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from an arbitrary variable source. Unset variables fall back
/// to defaults; set-but-invalid ones are errors.
pub fn load_from_lookup<F>(lookup: F) -> Result<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = ExporterConfig::default();

    if let Some(path) = lookup(ENV_METRICS_FILE) {
        cfg.metrics_file = PathBuf::from(path);
    }
    if let Some(port) = lookup(ENV_METRICS_PORT) {
        cfg.port = port.trim().parse().map_err(|e| {
            AtsMetricsError::Config(format!("{ENV_METRICS_PORT}={port:?} is not a valid port: {e}"))
        })?;
    }

    cfg.validate()?;
    Ok(cfg)
}
