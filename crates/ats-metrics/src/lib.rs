//! Top-level facade crate for the ATS metrics exporter.
//!
//! Re-exports the core model and the exporter library so users can depend on a
//! single crate. In-process test runners typically hold an
//! [`exporter::app_state::AppState`] and call
//! `state.store().update_metrics(..)` after each run.

pub mod core {
    pub use ats_metrics_core::*;
}

pub mod exporter {
    pub use ats_metrics_exporter::*;
}
