//! Get command - Print one remote dashboard
//!
//! Fetches the dashboard, resolves its folder and prints the manifest in the
//! requested encoding (the configured extension by default).

use anyhow::{Context, Result};
use clap::Args;
use dashsync_sync::addressing::Encoding;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct GetCommand {
    /// Dashboard UID
    pub uid: String,

    /// Encoding of the printed manifest (json, yaml); defaults to sync.extension
    #[arg(short, long)]
    pub output: Option<String>,
}

impl GetCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let handler = ctx.handler()?;

        info!(uid = %self.uid, "Fetching dashboard");
        let resource = handler.get_by_uid(&self.uid).await?;

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::to_value(&resource).context("Failed to serialize dashboard")?;
            formatter.print_json(&json);
            return Ok(());
        }

        let ext = self.output.as_deref().unwrap_or(handler.extension());
        let encoded = Encoding::from_extension(ext)?.encode(&resource)?;
        print!("{}", encoded);
        Ok(())
    }
}
