use crate::error::{AtsMetricsError, Result};

/// One update from the test runner.
///
/// `passed`/`failed` are deltas; everything else overwrites the stored gauge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub passed: u64,
    pub failed: u64,
    pub duration_secs: f64,
    /// Empty leaves the stored version untouched.
    pub fw_version: String,
    pub in_progress: bool,
}

impl RunReport {
    /// Reject values the exposition format cannot carry as a duration.
    pub fn validate(&self) -> Result<()> {
        if !self.duration_secs.is_finite() {
            return Err(AtsMetricsError::BadRequest(
                "duration must be a finite number of seconds".into(),
            ));
        }
        if self.duration_secs < 0.0 {
            return Err(AtsMetricsError::BadRequest(
                "duration must not be negative".into(),
            ));
        }
        Ok(())
    }
}
