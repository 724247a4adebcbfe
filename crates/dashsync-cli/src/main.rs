//! dashsync CLI - Command-line interface for dashsync
//!
//! Provides commands for:
//! - Fetching and listing remote dashboards
//! - Pulling dashboards to disk and pushing local files
//! - Renaming dashboards and watching one for changes
//! - Publishing snapshot previews
//! - Checking connectivity and managing configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    config::ConfigCommand, get::GetCommand, list::ListCommand, preview::PreviewCommand,
    pull::PullCommand, push::PushCommand, rename::RenameCommand, status::StatusCommand,
    watch::WatchCommand,
};
use context::AppContext;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "dashsync", version, about = "Keep Grafana dashboards in sync with local files")]
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
    /// Print a remote dashboard
    Get(GetCommand),
    /// List remote dashboard UIDs
    List(ListCommand),
    /// Write every remote dashboard below a directory
    Pull(PullCommand),
    /// Push local dashboard files
    Push(PushCommand),
    /// Change the UID of a remote dashboard
    Rename(RenameCommand),
    /// Mirror a remote dashboard into a local file until interrupted
    Watch(WatchCommand),
    /// Publish snapshot previews of local dashboards
    Preview(PreviewCommand),
    /// Check connectivity and credentials
    Status(StatusCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Filter directive: `-v` wins over the configured level
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::load(cli.config.clone());

    // RUST_LOG takes precedence over both
    let filter = log_filter(cli.verbose, &ctx.config.logging.level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Get(cmd) => cmd.execute(&ctx, format).await,
        Commands::List(cmd) => cmd.execute(&ctx, format).await,
        Commands::Pull(cmd) => cmd.execute(&ctx, format).await,
        Commands::Push(cmd) => cmd.execute(&ctx, format).await,
        Commands::Rename(cmd) => cmd.execute(&ctx, format).await,
        Commands::Watch(cmd) => cmd.execute(&ctx, format).await,
        Commands::Preview(cmd) => cmd.execute(&ctx, format).await,
        Commands::Status(cmd) => cmd.execute(&ctx, format).await,
        Commands::Config(cmd) => cmd.execute(&ctx, format).await,
    }
}
