//! The six-metric test-run set and its partial (file-sourced) counterpart.
//!
//! Serialized keys are the exposition names (`ats_test_pass_total`, ...), which
//! is also what external test runners write. The short field names are
//! accepted as aliases when reading.

use serde::{Deserialize, Serialize};

use super::report::RunReport;

/// Full in-memory state of the exporter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(rename = "ats_test_pass_total", alias = "pass_total")]
    pub pass_total: u64,

    #[serde(rename = "ats_test_fail_total", alias = "fail_total")]
    pub fail_total: u64,

    #[serde(rename = "ats_test_duration_seconds", alias = "duration_seconds")]
    pub duration_seconds: f64,

    /// Empty until a run reports a version.
    #[serde(rename = "ats_fw_version", alias = "fw_version")]
    pub fw_version: String,

    /// Unix seconds of the last `apply`.
    #[serde(rename = "ats_test_last_run_timestamp", alias = "last_run_timestamp")]
    pub last_run_timestamp: u64,

    /// Stored as `0`/`1` on disk.
    #[serde(rename = "ats_test_in_progress", alias = "in_progress", with = "flag")]
    pub in_progress: bool,
}

impl MetricSet {
    /// Apply one run report: counters accumulate, gauges are overwritten,
    /// the version only when the report carries one.
    pub fn apply(&mut self, report: &RunReport, now_unix_secs: u64) {
        self.pass_total = self.pass_total.saturating_add(report.passed);
        self.fail_total = self.fail_total.saturating_add(report.failed);
        self.duration_seconds = report.duration_secs;
        if !report.fw_version.is_empty() {
            self.fw_version = report.fw_version.clone();
        }
        self.in_progress = report.in_progress;
        self.last_run_timestamp = now_unix_secs;
    }

    /// Overwrite every field present in `patch`; absent fields stay as they are.
    pub fn merge_from(&mut self, patch: &MetricPatch) {
        if let Some(v) = patch.pass_total {
            self.pass_total = v;
        }
        if let Some(v) = patch.fail_total {
            self.fail_total = v;
        }
        if let Some(v) = patch.duration_seconds {
            self.duration_seconds = v;
        }
        if let Some(v) = &patch.fw_version {
            self.fw_version = v.clone();
        }
        if let Some(v) = patch.last_run_timestamp {
            self.last_run_timestamp = v;
        }
        if let Some(v) = patch.in_progress {
            self.in_progress = v;
        }
    }
}

/// Partial metric set as read back from the persisted file.
///
/// Unknown keys are ignored so files written by newer or foreign writers still
/// load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricPatch {
    #[serde(default, rename = "ats_test_pass_total", alias = "pass_total")]
    pub pass_total: Option<u64>,

    #[serde(default, rename = "ats_test_fail_total", alias = "fail_total")]
    pub fail_total: Option<u64>,

    #[serde(default, rename = "ats_test_duration_seconds", alias = "duration_seconds")]
    pub duration_seconds: Option<f64>,

    #[serde(default, rename = "ats_fw_version", alias = "fw_version")]
    pub fw_version: Option<String>,

    #[serde(default, rename = "ats_test_last_run_timestamp", alias = "last_run_timestamp")]
    pub last_run_timestamp: Option<u64>,

    #[serde(
        default,
        rename = "ats_test_in_progress",
        alias = "in_progress",
        deserialize_with = "flag::deserialize_option"
    )]
    pub in_progress: Option<bool>,
}

impl MetricPatch {
    pub fn is_empty(&self) -> bool {
        *self == MetricPatch::default()
    }
}

/// `bool` <-> `0`/`1`. Any non-zero integer reads as `true`.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(u64::deserialize(d)? != 0)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(|v| v != 0))
    }
}
