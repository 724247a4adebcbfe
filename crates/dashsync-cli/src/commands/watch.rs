//! Watch command - Mirror a remote dashboard into a local file
//!
//! Runs until Ctrl+C or SIGTERM, or until the dashboard disappears.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::output::{ConsoleNotifier, OutputFormat};

#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Dashboard UID
    pub uid: String,
    /// Local file to keep updated (.json, .yaml or .yml)
    pub file: PathBuf,
    /// Seconds between polls (defaults to watch.poll_interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl WatchCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let handler = ctx.handler()?;
        let notifier = ConsoleNotifier::new(format);

        let mut options = ctx.watch_options()?;
        if let Some(secs) = self.interval.filter(|s| *s > 0) {
            options.poll_interval = std::time::Duration::from_secs(secs);
        }

        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            signal_token.cancel();
        });

        handler
            .watch(&notifier, &self.uid, &self.file, options, cancel)
            .await?;
        info!(uid = %self.uid, "Watch stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }
}
