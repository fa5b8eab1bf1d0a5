//! Shared error type across ats-metrics crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, AtsMetricsError>;

/// Unified error type used by core and exporter.
///
/// None of these ever reach an HTTP client: persistence errors are logged and
/// swallowed at the persistence boundary, and configuration errors stop the
/// process before the listener is bound.
#[derive(Debug, Error)]
pub enum AtsMetricsError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io: {0}")]
    Io(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AtsMetricsError {
    /// Stable identifier used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            AtsMetricsError::Config(_) => "CONFIG",
            AtsMetricsError::BadRequest(_) => "BAD_REQUEST",
            AtsMetricsError::Io(_) => "IO",
            AtsMetricsError::Decode(_) => "DECODE",
            AtsMetricsError::Internal(_) => "INTERNAL",
        }
    }
}
