//! File-backed snapshot of the metric set.
//!
//! The file doubles as the channel through which out-of-process test runners
//! hand results to the long-lived exporter: they write on update, the exporter
//! reads on every scrape. Both directions are best-effort. `save` and `load`
//! never fail from the caller's point of view; problems are logged as warnings
//! and the in-memory state is left as it was.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ats_metrics_core::error::{AtsMetricsError, Result};
use ats_metrics_core::{MetricPatch, MetricSet};

#[derive(Debug, Clone)]
pub struct MetricsFile {
    path: PathBuf,
}

impl MetricsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `set`. Failures are logged and swallowed.
    pub fn save(&self, set: &MetricSet) {
        if let Err(e) = self.try_save(set) {
            tracing::warn!(
                path = %self.path.display(),
                code = e.code(),
                error = %e,
                "could not save metrics to file"
            );
        }
    }

    /// Read whatever the file currently holds. Absent or unreadable files
    /// yield an empty patch.
    pub fn load(&self) -> MetricPatch {
        match self.try_load() {
            Ok(Some(patch)) => patch,
            Ok(None) => MetricPatch::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    code = e.code(),
                    error = %e,
                    "could not load metrics from file"
                );
                MetricPatch::default()
            }
        }
    }

    /// Atomic overwrite: write a sibling `.tmp` file, then rename it over the
    /// target so readers never see a partial document.
    pub fn try_save(&self, set: &MetricSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error("create dir", parent, e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(set)
            .map_err(|e| AtsMetricsError::Internal(format!("serialize metrics failed: {e}")))?;

        let tmp = self.tmp_path();
        fs::write(&tmp, bytes).map_err(|e| io_error("write", &tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error("rename", &self.path, e));
        }
        Ok(())
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn try_load(&self) -> Result<Option<MetricPatch>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read", &self.path, e)),
        };

        let patch = serde_json::from_slice::<MetricPatch>(&bytes)
            .map_err(|e| AtsMetricsError::Decode(format!("{}: {e}", self.path.display())))?;
        Ok(Some(patch))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(op: &str, path: &Path, e: io::Error) -> AtsMetricsError {
    AtsMetricsError::Io(format!("{op} {} failed: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> MetricSet {
        MetricSet {
            pass_total: 41,
            fail_total: 3,
            duration_seconds: 12.0,
            fw_version: "2.4.0-rc1".into(),
            last_run_timestamp: 1_718_000_000,
            in_progress: true,
        }
    }

    #[test]
    fn save_then_load_reproduces_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetricsFile::new(dir.path().join("metrics.json"));

        file.save(&sample_set());
        let mut restored = MetricSet::default();
        restored.merge_from(&file.load());

        assert_eq!(restored, sample_set());
    }

    #[test]
    fn file_keeps_integer_and_float_types() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetricsFile::new(dir.path().join("metrics.json"));
        file.save(&sample_set());

        let raw = fs::read_to_string(file.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(v["ats_test_pass_total"].is_u64());
        assert!(v["ats_test_last_run_timestamp"].is_u64());
        assert!(v["ats_test_in_progress"].is_u64());
        assert!(v["ats_test_duration_seconds"].is_f64());
        assert_eq!(v["ats_fw_version"], "2.4.0-rc1");
        assert_eq!(v.as_object().unwrap().len(), 6);
    }

    #[test]
    fn save_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("nested").join("metrics.json");
        let file = MetricsFile::new(&path);

        file.try_save(&MetricSet::default()).unwrap();

        assert!(path.exists());
        assert!(!path.with_file_name("metrics.json.tmp").exists());
    }

    #[test]
    fn save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetricsFile::new(dir.path().join("metrics.json"));
        file.save(&sample_set());
        file.save(&MetricSet::default());

        let mut restored = sample_set();
        restored.merge_from(&file.load());
        assert_eq!(restored, MetricSet::default());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetricsFile::new(dir.path().join("absent.json"));

        assert!(file.try_load().unwrap().is_none());
        assert!(file.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        fs::write(&path, b"{\"ats_test_pass_total\": 4,").unwrap();
        let file = MetricsFile::new(&path);

        let err = file.try_load().expect_err("must fail");
        assert_eq!(err.code(), "DECODE");
        assert!(file.load().is_empty());
    }

    #[test]
    fn unwritable_target_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a parent directory is expected.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let file = MetricsFile::new(blocker.join("metrics.json"));

        assert_eq!(file.try_save(&sample_set()).unwrap_err().code(), "IO");
        file.save(&sample_set());
    }
}
