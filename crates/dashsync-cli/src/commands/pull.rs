//! Pull command - Write every remote dashboard below a directory
//!
//! Files land at `dashboards/<folder>/dashboard-<uid>.<ext>`; dashboards in
//! the General folder go to `dashboards/General/`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct PullCommand {
    /// Target directory (defaults to sync.root)
    pub dir: Option<PathBuf>,
}

impl PullCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let root = self.dir.clone().unwrap_or_else(|| ctx.config.sync.root.clone());
        let handler = ctx.handler()?;

        info!(root = %root.display(), "Pulling dashboards");
        let written = handler
            .pull(&root)
            .await
            .with_context(|| format!("Failed to pull dashboards into {}", root.display()))?;

        if matches!(format, OutputFormat::Json) {
            let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "root": root.display().to_string(),
                "written": paths,
            }));
            return Ok(());
        }

        formatter.success(&format!(
            "Pulled {} dashboard{} into {}",
            written.len(),
            if written.len() == 1 { "" } else { "s" },
            root.display()
        ));
        for path in &written {
            formatter.info(&path.display().to_string());
        }
        Ok(())
    }
}
