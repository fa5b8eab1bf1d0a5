use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ats_metrics_core::error::{AtsMetricsError, Result};

pub const ENV_METRICS_FILE: &str = "METRICS_FILE";
pub const ENV_METRICS_PORT: &str = "METRICS_PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Snapshot file shared with out-of-process test runners.
    pub metrics_file: PathBuf,
    pub port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            metrics_file: default_metrics_file(),
            port: default_port(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        let raw = self.metrics_file.to_string_lossy();
        if raw.trim().is_empty() {
            return Err(AtsMetricsError::Config(format!(
                "{ENV_METRICS_FILE} must not be empty"
            )));
        }
        if raw.ends_with('/') || self.metrics_file.file_name().is_none() {
            return Err(AtsMetricsError::Config(format!(
                "{ENV_METRICS_FILE} must name a file, got {raw}"
            )));
        }
        Ok(())
    }

    /// All interfaces on the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn default_metrics_file() -> PathBuf {
    PathBuf::from("/app/reports/metrics.json")
}
fn default_port() -> u16 {
    8080
}
