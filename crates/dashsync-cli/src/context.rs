//! Shared command context: configuration and the dashboard handler

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dashsync_core::config::Config;
use dashsync_grafana::provider::GrafanaGateway;
use dashsync_sync::handler::DashboardHandler;
use dashsync_sync::watch::WatchOptions;

/// Configuration resolved once per invocation
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
}

impl AppContext {
    /// Loads the config file (defaults when absent) and applies `GRAFANA_*` overrides
    pub fn load(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(Config::default_path);
        let mut config = Config::load_or_default(&config_path);
        config.apply_env_overrides();
        Self {
            config,
            config_path,
        }
    }

    /// Validation problems of one config section, e.g. `"grafana."`
    fn section_errors(&self, prefix: &str, hint: &str) -> Result<()> {
        let problems: Vec<String> = self
            .config
            .validate()
            .into_iter()
            .filter(|e| e.field.starts_with(prefix))
            .map(|e| e.to_string())
            .collect();
        if !problems.is_empty() {
            bail!(
                "{} (set it in {}{})",
                problems.join("; "),
                self.config_path.display(),
                hint
            );
        }
        Ok(())
    }

    /// Gateway for the configured Grafana instance
    ///
    /// Fails early when the `grafana` section does not validate.
    pub fn gateway(&self) -> Result<GrafanaGateway> {
        self.section_errors("grafana.", " or through GRAFANA_URL / GRAFANA_TOKEN")?;

        GrafanaGateway::from_config(&self.config.grafana).context("Failed to create Grafana client")
    }

    /// Polling parameters from the `watch` section, which must validate
    pub fn watch_options(&self) -> Result<WatchOptions> {
        self.section_errors("watch.", "")?;
        Ok(WatchOptions::from(&self.config.watch))
    }

    /// Dashboard handler writing files with the configured extension
    pub fn handler(&self) -> Result<DashboardHandler> {
        let gateway = self.gateway()?;
        Ok(DashboardHandler::new(Arc::new(gateway)).with_extension(self.config.sync.extension.clone()))
    }
}
