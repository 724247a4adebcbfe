//! Config command - View and manage dashsync configuration
//!
//! Provides the `dashsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON) with the token redacted
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use dashsync_core::config::Config;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

/// Placeholder printed instead of the API token
const REDACTED: &str = "********";

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "watch.poll_interval_secs")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx, format),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value, format),
            ConfigCommand::Validate => self.execute_validate(ctx, format),
        }
    }

    fn execute_show(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config = redacted(&ctx.config);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    /// Writes the file configuration; environment overrides are not persisted
    fn execute_set(&self, ctx: &AppContext, key: &str, value: &str, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config_path = &ctx.config_path;
        let mut config = Config::load_or_default(config_path);

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (key, description) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {:<32} - {}", key, description));
                }
            }
            bail!("Configuration not changed: {}", e);
        }

        // Only reject errors the new value introduced; a missing URL is
        // expected while the file is being built up key by key.
        let errors: Vec<String> = config
            .validate()
            .iter()
            .filter(|e| e.field == key)
            .map(|e| e.message.clone())
            .collect();
        if !errors.is_empty() {
            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "errors": errors,
                }));
            } else {
                formatter.error(&format!("Invalid value for '{}': {}", key, errors.join("; ")));
            }
            bail!("Configuration not changed: invalid value for '{}'", key);
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
        }
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        std::fs::write(config_path, yaml).context("Failed to write configuration file")?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            let shown = if key == "grafana.token" { REDACTED } else { value };
            formatter.success(&format!("Set {} = {}", key, shown));
            formatter.info(&format!("Saved to {}", config_path.display()));
        }
        Ok(())
    }

    fn execute_validate(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config_path = &ctx.config_path;

        // Parse errors are reported, not replaced by defaults
        let mut config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                let message = if config_path.exists() {
                    format!("Failed to parse configuration: {}", e)
                } else {
                    "Configuration file not found".to_string()
                };
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                    formatter.info(&format!("File: {}", config_path.display()));
                    formatter.info("Run 'dashsync config set grafana.url <url>' to create one.");
                }
                bail!("{}", message);
            }
        };
        config.apply_env_overrides();

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if matches!(format, OutputFormat::Json) {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if !errors.is_empty() {
            bail!(
                "Configuration has {} error{}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            );
        }
        Ok(())
    }
}

/// Keys accepted by `config set`
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("grafana.url", "Grafana base URL"),
    ("grafana.token", "API key or service-account token (\"none\" clears)"),
    ("grafana.user", "Basic auth user (\"none\" clears)"),
    ("grafana.insecure_skip_verify", "true|false"),
    ("sync.root", "Default directory for pull/push"),
    ("sync.extension", "json|yaml|yml"),
    ("watch.poll_interval_secs", "Seconds between polls"),
    ("watch.max_transient_failures", "Consecutive failures before giving up"),
    ("preview.expires_seconds", "Snapshot lifetime (0 = never)"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Copy of the configuration safe to print
fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.grafana.token.is_some() {
        config.grafana.token = Some(REDACTED.to_string());
    }
    config
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- grafana ---
        "grafana.url" => {
            config.grafana.url = value.trim_end_matches('/').to_string();
        }
        "grafana.token" => {
            config.grafana.token = optional(value);
        }
        "grafana.user" => {
            config.grafana.user = optional(value);
        }
        "grafana.insecure_skip_verify" => {
            config.grafana.insecure_skip_verify = value
                .parse::<bool>()
                .context("Expected true or false for grafana.insecure_skip_verify")?;
        }

        // --- sync ---
        "sync.root" => {
            config.sync.root = PathBuf::from(value);
        }
        "sync.extension" => {
            config.sync.extension = value.to_string();
        }

        // --- watch ---
        "watch.poll_interval_secs" => {
            config.watch.poll_interval_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for watch.poll_interval_secs")?;
        }
        "watch.max_transient_failures" => {
            config.watch.max_transient_failures = value
                .parse::<u32>()
                .context("Expected a positive integer")?;
        }

        // --- preview ---
        "preview.expires_seconds" => {
            config.preview.expires_seconds = value
                .parse::<u64>()
                .context("Expected a non-negative integer")?;
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = value.to_string();
        }

        _ => {
            bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}
