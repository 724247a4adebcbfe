//! Push command - Push local dashboard files
//!
//! Accepts a single file or a directory. Directories are searched with the
//! `dashboards/*/dashboard-*` layout. Every resource is pushed even when an
//! earlier one fails; the command fails at the end if any push did.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use dashsync_sync::addressing::read_resources;
use dashsync_sync::handler::DashboardHandler;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct PushCommand {
    /// File or directory to push (defaults to sync.root)
    pub path: Option<PathBuf>,
}

impl PushCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let target = self.path.clone().unwrap_or_else(|| ctx.config.sync.root.clone());
        let handler = ctx.handler()?;

        let files = collect_files(&handler, &target)?;
        info!(target = %target.display(), files = files.len(), "Pushing dashboards");

        let mut results = Vec::new();
        let mut failures = 0usize;

        for file in &files {
            let resources = match read_resources(file).await {
                Ok(resources) => resources,
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "Failed to read file");
                    failures += 1;
                    results.push(serde_json::json!({
                        "path": file.display().to_string(),
                        "error": e.to_string(),
                    }));
                    if format == OutputFormat::Human {
                        formatter.error(&format!("{}: {}", file.display(), e));
                    }
                    continue;
                }
            };

            for resource in resources {
                match handler.push(&resource).await {
                    Ok(outcome) => {
                        results.push(serde_json::json!({
                            "path": file.display().to_string(),
                            "resource": resource.to_string(),
                            "outcome": outcome.to_string(),
                        }));
                        if format == OutputFormat::Human {
                            formatter.success(&format!("{} {}", resource, outcome));
                        }
                    }
                    Err(e) => {
                        failures += 1;
                        results.push(serde_json::json!({
                            "path": file.display().to_string(),
                            "resource": resource.to_string(),
                            "error": e.to_string(),
                        }));
                        if format == OutputFormat::Human {
                            formatter.error(&format!("{}: {}", resource, e));
                        }
                    }
                }
            }
        }

        if format == OutputFormat::Json {
            formatter.print_json(&serde_json::json!({
                "success": failures == 0,
                "results": results,
            }));
        }

        if failures > 0 {
            bail!("{} of {} push operations failed", failures, results.len());
        }
        Ok(())
    }
}

/// A file argument is pushed as-is; a directory is searched with the layout glob
fn collect_files(handler: &DashboardHandler, target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_dir() {
        Ok(handler.find_resource_files(target)?)
    } else if target.is_file() {
        Ok(vec![target.to_path_buf()])
    } else {
        bail!("{} does not exist", target.display())
    }
}
