//! Rename command - Change the UID of a remote dashboard

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{ConsoleNotifier, OutputFormat};

#[derive(Debug, Args)]
pub struct RenameCommand {
    /// Current dashboard UID
    pub old_uid: String,
    /// New dashboard UID
    pub new_uid: String,
}

impl RenameCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let notifier = ConsoleNotifier::new(format);
        ctx.handler()?
            .rename(&self.old_uid, &self.new_uid, &notifier)
            .await?;
        Ok(())
    }
}
