//! Prometheus text exposition for the metric set.
//!
//! Every metric is rendered as a HELP line, a TYPE line and one sample, in the
//! fixed order of [`DESCRIPTORS`]. The firmware version is a string, so it is
//! exported as an info-style gauge: constant value `1` with the version carried
//! in a `version` label.

use std::fmt::{self, Write};

use crate::model::MetricSet;

/// Content type served with the encoded body.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Label value used while no run has reported a firmware version.
pub const UNKNOWN_VERSION: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Static metadata for one exported metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

pub const PASS_TOTAL: MetricDesc = MetricDesc {
    name: "ats_test_pass_total",
    help: "Total number of passed tests",
    kind: MetricKind::Counter,
};

pub const FAIL_TOTAL: MetricDesc = MetricDesc {
    name: "ats_test_fail_total",
    help: "Total number of failed tests",
    kind: MetricKind::Counter,
};

pub const DURATION_SECONDS: MetricDesc = MetricDesc {
    name: "ats_test_duration_seconds",
    help: "Duration of last test run in seconds",
    kind: MetricKind::Gauge,
};

pub const FW_VERSION: MetricDesc = MetricDesc {
    name: "ats_fw_version",
    help: "Firmware version under test",
    kind: MetricKind::Gauge,
};

pub const LAST_RUN_TIMESTAMP: MetricDesc = MetricDesc {
    name: "ats_test_last_run_timestamp",
    help: "Unix timestamp of last test run",
    kind: MetricKind::Gauge,
};

pub const IN_PROGRESS: MetricDesc = MetricDesc {
    name: "ats_test_in_progress",
    help: "Whether a test is currently running (1) or not (0)",
    kind: MetricKind::Gauge,
};

/// Declaration order; also the render order.
pub const DESCRIPTORS: [MetricDesc; 6] = [
    PASS_TOTAL,
    FAIL_TOTAL,
    DURATION_SECONDS,
    FW_VERSION,
    LAST_RUN_TIMESTAMP,
    IN_PROGRESS,
];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Float sample that always shows a fractional part (`12.0`, not `12`).
struct FloatSample(f64);

impl fmt::Display for FloatSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

fn write_metric(out: &mut String, desc: &MetricDesc, labels: &str, value: impl fmt::Display) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# HELP {} {}", desc.name, desc.help);
    let _ = writeln!(out, "# TYPE {} {}", desc.name, desc.kind.as_str());
    let _ = writeln!(out, "{}{} {}", desc.name, labels, value);
}

/// Render the whole set. Output always ends with a newline.
pub fn encode(set: &MetricSet) -> String {
    let mut out = String::with_capacity(1024);

    write_metric(&mut out, &PASS_TOTAL, "", set.pass_total);
    write_metric(&mut out, &FAIL_TOTAL, "", set.fail_total);
    write_metric(&mut out, &DURATION_SECONDS, "", FloatSample(set.duration_seconds));

    let version = if set.fw_version.is_empty() {
        UNKNOWN_VERSION
    } else {
        set.fw_version.as_str()
    };
    let labels = format!("{{version=\"{}\"}}", escape_label(version));
    write_metric(&mut out, &FW_VERSION, &labels, 1);

    write_metric(&mut out, &LAST_RUN_TIMESTAMP, "", set.last_run_timestamp);
    write_metric(&mut out, &IN_PROGRESS, "", u8::from(set.in_progress));

    out
}
