//! Handover CLI - Layer 7
//!
//! Thin calling layer over `handover-ceremony`: loads configuration, builds
//! the storage handler and catalog, runs one command and maps failures to
//! exit codes. All command output is JSON on stdout.

#![forbid(unsafe_code)]

pub mod commands;
pub mod config;
pub mod exit;

pub use commands::Command;
pub use config::{CliConfig, WatchConfig};
