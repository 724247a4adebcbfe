//! Preview command - Publish snapshot previews of local dashboards
//!
//! Every dashboard in the given file is published as a snapshot; the view
//! and delete URLs are reported as notifications.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dashsync_core::ports::SnapshotOptions;
use dashsync_sync::addressing::read_resources;

use crate::context::AppContext;
use crate::output::{ConsoleNotifier, OutputFormat};

#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// Dashboard file
    pub file: PathBuf,
    /// Seconds until the snapshot is deleted (0 = never; defaults to preview.expires_seconds)
    #[arg(long)]
    pub expires: Option<u64>,
}

impl PreviewCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let handler = ctx.handler()?;
        let notifier = ConsoleNotifier::new(format);
        let options = SnapshotOptions {
            expires_seconds: self.expires.unwrap_or(ctx.config.preview.expires_seconds),
        };

        let resources = read_resources(&self.file)
            .await
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        for resource in &resources {
            handler.preview(resource, &notifier, options).await?;
        }
        Ok(())
    }
}
