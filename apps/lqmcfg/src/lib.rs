//! # lqmcfg Library
//!
//! This library exposes the lqmcfg modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod apply;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod run;
pub mod session;

pub use error::CliError;

// Re-export the workspace crates for convenience
pub use lqm_client;
pub use lqm_core;
