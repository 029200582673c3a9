//! Shutterlink CLI - incremental WiFi photo importer
//!
//! Provides commands for:
//! - Running the import loop against a camera's WiFi storage
//! - Viewing ledger status (what has been imported so far)
//! - Resetting the ledger for a fresh card
//!
//! WiFi association with the camera's access point is assumed to be
//! established before the importer starts; switching the machine between
//! the camera network and a normal internet network is an operator task
//! outside this tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{reset::ResetCommand, run::RunCommand, status::StatusCommand};
use output::OutputFormat;
use shutterlink_core::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "shutterlink",
    version,
    about = "Mirror photos from a camera's WiFi storage as they are shot"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Poll the camera and import new photos until interrupted
    Run(RunCommand),
    /// Show what the import ledger has recorded
    Status(StatusCommand),
    /// Discard the import ledger (next run re-imports the whole card)
    Reset(ResetCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Run(cmd) => cmd.execute(&config_path, format).await,
        Commands::Status(cmd) => cmd.execute(&config_path, format).await,
        Commands::Reset(cmd) => cmd.execute(&config_path, format).await,
    }
}
