//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the zenith binary.

mod commands;
mod generate;
mod records;
mod serve;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
pub use records::{list_records, show_stats};
pub use serve::run_server;
