//! Shared application state for the exporter.
//!
//! Owns the metric store for the lifetime of the server. Handlers and
//! in-process updaters reach it through cheap `AppState` clones.

use std::sync::Arc;

use crate::config::ExporterConfig;
use crate::persist::MetricsFile;
use crate::store::MetricsStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    store: MetricsStore,
}

impl AppState {
    /// Fresh store backed by `cfg.metrics_file`. Nothing is read from disk yet.
    pub fn new(cfg: ExporterConfig) -> Self {
        let store = MetricsStore::new(MetricsFile::new(cfg.metrics_file.clone()));
        Self {
            inner: Arc::new(AppStateInner { cfg, store }),
        }
    }

    /// Like [`AppState::new`], then merge whatever snapshot the file holds.
    pub fn restore(cfg: ExporterConfig) -> Self {
        let state = Self::new(cfg);
        if state.store().refresh() {
            tracing::info!(
                path = %state.cfg().metrics_file.display(),
                "restored metrics from previous snapshot"
            );
        }
        state
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &MetricsStore {
        &self.inner.store
    }
}
