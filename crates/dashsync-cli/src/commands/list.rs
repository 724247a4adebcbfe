//! List command - List remote dashboard UIDs

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let uids = ctx.handler()?.list_remote().await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "count": uids.len(),
                "dashboards": uids,
            }));
            return Ok(());
        }

        formatter.success(&format!(
            "{} dashboard{}",
            uids.len(),
            if uids.len() == 1 { "" } else { "s" }
        ));
        for uid in &uids {
            formatter.info(uid);
        }
        Ok(())
    }
}
