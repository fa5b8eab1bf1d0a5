//! Process-wide metric store.
//!
//! One `MetricSet` behind a mutex, paired with the file it is persisted to.
//! Update, merge and encode all run under the lock so a scrape never renders a
//! half-applied update.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use ats_metrics_core::exposition;
use ats_metrics_core::{MetricPatch, MetricSet, RunReport};

use crate::persist::MetricsFile;

pub struct MetricsStore {
    set: Mutex<MetricSet>,
    file: MetricsFile,
}

impl MetricsStore {
    /// Start from zero/empty defaults. Call [`MetricsStore::refresh`] to pick
    /// up a snapshot left by a previous process.
    pub fn new(file: MetricsFile) -> Self {
        Self {
            set: Mutex::new(MetricSet::default()),
            file,
        }
    }

    pub fn file(&self) -> &MetricsFile {
        &self.file
    }

    fn lock(&self) -> MutexGuard<'_, MetricSet> {
        self.set.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one run and persist the result.
    pub fn update(&self, report: &RunReport) {
        self.update_at(report, unix_now());
    }

    pub fn update_at(&self, report: &RunReport, now_unix_secs: u64) {
        let mut set = self.lock();
        set.apply(report, now_unix_secs);
        // Saved under the lock so concurrent updates reach the file in order.
        self.file.save(&set);
    }

    /// Entry point for in-process test runners.
    pub fn update_metrics(
        &self,
        passed: u64,
        failed: u64,
        duration_secs: f64,
        fw_version: &str,
        in_progress: bool,
    ) {
        self.update(&RunReport {
            passed,
            failed,
            duration_secs,
            fw_version: fw_version.to_string(),
            in_progress,
        });
    }

    pub fn merge_from(&self, patch: &MetricPatch) {
        self.lock().merge_from(patch);
    }

    /// Merge the persisted snapshot into memory. Returns whether the file
    /// contributed anything.
    pub fn refresh(&self) -> bool {
        let patch = self.file.load();
        if patch.is_empty() {
            return false;
        }
        self.merge_from(&patch);
        tracing::debug!(path = %self.file.path().display(), "merged metrics from file");
        true
    }

    /// Refresh from disk, then render. The read happens outside the lock; merge
    /// and encode happen under one acquisition.
    pub fn scrape(&self) -> String {
        let patch = self.file.load();
        let mut set = self.lock();
        set.merge_from(&patch);
        exposition::encode(&set)
    }

    pub fn snapshot(&self) -> MetricSet {
        self.lock().clone()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn temp_store() -> (tempfile::TempDir, MetricsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MetricsStore::new(MetricsFile::new(dir.path().join("metrics.json")));
        (dir, store)
    }

    #[test]
    fn update_accumulates_and_persists() {
        let (_dir, store) = temp_store();
        store.update_metrics(3, 1, 12.5, "1.2.3", false);
        store.update_metrics(2, 0, 4.0, "", true);

        let snap = store.snapshot();
        assert_eq!(snap.pass_total, 5);
        assert_eq!(snap.fail_total, 1);
        assert_eq!(snap.duration_seconds, 4.0);
        assert_eq!(snap.fw_version, "1.2.3");
        assert!(snap.in_progress);

        let mut on_disk = MetricSet::default();
        on_disk.merge_from(&store.file().load());
        assert_eq!(on_disk, snap);
    }

    #[test]
    fn update_stamps_current_time() {
        let (_dir, store) = temp_store();
        let before = unix_now();
        store.update(&RunReport::default());
        let after = unix_now();

        let ts = store.snapshot().last_run_timestamp;
        assert!(ts >= before && ts <= after, "ts={ts} before={before} after={after}");
    }

    #[test]
    fn reads_do_not_touch_timestamp() {
        let (_dir, store) = temp_store();
        store.update_at(&RunReport::default(), 1234);
        let _ = store.scrape();
        let _ = store.scrape();
        assert_eq!(store.snapshot().last_run_timestamp, 1234);
    }

    #[test]
    fn scrape_merges_externally_written_file() {
        let (_dir, store) = temp_store();
        store.update_metrics(1, 0, 1.0, "", false);

        let writer = MetricsFile::new(store.file().path());
        writer.save(&MetricSet {
            pass_total: 10,
            fail_total: 4,
            duration_seconds: 99.5,
            fw_version: "9.9.9".into(),
            last_run_timestamp: 42,
            in_progress: true,
        });

        let out = store.scrape();
        assert!(out.contains("ats_test_pass_total 10\n"));
        assert!(out.contains("ats_fw_version{version=\"9.9.9\"} 1\n"));
        assert_eq!(store.snapshot().fail_total, 4);
    }

    #[test]
    fn corrupt_file_keeps_in_memory_values() {
        let (_dir, store) = temp_store();
        store.update_metrics(7, 2, 3.0, "1.0.0", false);
        std::fs::write(store.file().path(), "not json").unwrap();

        let out = store.scrape();
        assert!(out.contains("ats_test_pass_total 7\n"));
        assert!(!store.refresh());
    }

    #[test]
    fn refresh_restores_previous_snapshot() {
        let (dir, store) = temp_store();
        store.update_metrics(5, 1, 2.0, "3.1.4", false);
        drop(store);

        let restarted = MetricsStore::new(MetricsFile::new(dir.path().join("metrics.json")));
        assert!(restarted.refresh());
        assert_eq!(restarted.snapshot().pass_total, 5);
        assert_eq!(restarted.snapshot().fw_version, "3.1.4");
    }

    #[test]
    fn concurrent_updates_sum_exactly() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.update_metrics(2, 1, 0.5, "", false);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snap = store.snapshot();
        assert_eq!(snap.pass_total, 400);
        assert_eq!(snap.fail_total, 200);
    }
}
