//! Zenith CLI binary.
//!
//! This binary provides command-line access to the NPC generator:
//! - Serve the HTTP API and topic worker
//! - Generate characters once and print them
//! - Inspect the record directory

use clap::Parser;
use zenith::{ObservabilityConfig, ZenithConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, list_records, run_generate, run_server, show_stats};

    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = ZenithConfig::load(cli.config.as_deref())?;

    let mut observability = ObservabilityConfig::new(config.server.service_name.clone())
        .with_logging(&config.logging);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    if cli.json_logs {
        observability = observability.with_json_logs(true);
    }
    init_observability(&observability).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Serve { bind } => run_server(&config, bind).await?,
        Commands::Generate {
            count,
            species,
            district,
            age_range,
        } => run_generate(&config, count, species, district, age_range).await?,
        Commands::List => list_records(&config).await?,
        Commands::Stats => show_stats(&config).await?,
    }

    Ok(())
}
