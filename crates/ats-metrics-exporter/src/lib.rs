//! ATS metrics exporter library entry.
//!
//! This crate wires configuration, the file-backed metric store, and the HTTP
//! surface into a runnable exporter. It is consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod cli;
pub mod config;
pub mod ops;
pub mod persist;
pub mod router;
pub mod server;
pub mod store;
