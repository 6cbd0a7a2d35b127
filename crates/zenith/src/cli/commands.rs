//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zenith - LLM-driven NPC generator for the city of Zenith
#[derive(Parser, Debug)]
#[command(name = "zenith")]
#[command(about = "LLM-driven NPC generator for the city of Zenith", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API and the topic worker
    Serve {
        /// Address to listen on, overriding `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },

    /// Generate characters and print the outcome as JSON
    Generate {
        /// Number of characters
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Preferred species
        #[arg(long)]
        species: Option<String>,

        /// Preferred district of residence
        #[arg(long)]
        district: Option<String>,

        /// Preferred age range, e.g. "25-35"
        #[arg(long)]
        age_range: Option<String>,
    },

    /// Print stored characters as JSON
    List,

    /// Print storage statistics as JSON
    Stats,
}
