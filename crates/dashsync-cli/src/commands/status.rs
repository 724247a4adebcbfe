//! Status command - Check connectivity to the configured Grafana instance
//!
//! Provides the `dashsync status` CLI command which:
//! 1. Shows the Grafana URL and the authentication mode in use
//! 2. Probes the instance and reports whether it is reachable

use anyhow::Result;
use clap::Args;
use dashsync_core::ports::RemoteGateway;
use dashsync_grafana::client::Auth;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusCommand {}

/// Authentication mode label; never includes the secret
fn auth_mode(auth: &Auth) -> String {
    match auth {
        Auth::Anonymous => "anonymous".to_string(),
        Auth::Bearer(_) => "bearer token".to_string(),
        Auth::Basic { user, .. } => format!("basic ({user})"),
    }
}

impl StatusCommand {
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let gateway = ctx.gateway()?;
        let url = gateway.client().api_base().to_string();
        let auth = auth_mode(gateway.client().auth());

        info!(url = %url, "Checking Grafana connectivity");
        let health = gateway.health().await;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "url": url,
                "auth": auth,
                "reachable": health.is_ok(),
                "error": health.as_ref().err().map(|e| e.to_string()),
                "config_path": ctx.config_path.display().to_string(),
            }));
            return Ok(());
        }

        formatter.info(&format!("Grafana:  {}", url));
        formatter.info(&format!("Auth:     {}", auth));
        formatter.info(&format!("Config:   {}", ctx.config_path.display()));
        formatter.info("");
        match health {
            Ok(()) => formatter.success("Grafana is reachable"),
            Err(e) => formatter.error(&format!("Grafana is not reachable: {}", e)),
        }

        Ok(())
    }
}
