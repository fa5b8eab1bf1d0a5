//! Data model: the persisted metric set and the update input.

pub mod report;
pub mod set;

pub use report::RunReport;
pub use set::{MetricPatch, MetricSet};
