//! ats-metrics core: the test-run metric model, its exposition encoding, and
//! the shared error type.
//!
//! This crate carries no transport or runtime dependencies; the exporter crate
//! adds persistence and HTTP on top of it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Encoding already-valid state cannot fail, and every fallible path surfaces
//! as `AtsMetricsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod model;

/// Shared result type.
pub use error::{AtsMetricsError, Result};
pub use model::{MetricPatch, MetricSet, RunReport};
