//! Configuration module for dashsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, environment overrides, validation, defaults, and a builder
//! pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for dashsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grafana: GrafanaConfig,
    pub sync: SyncConfig,
    pub watch: WatchConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the Grafana instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrafanaConfig {
    /// Base URL, e.g. `https://grafana.example.com` (sub-paths are kept).
    pub url: String,
    /// API token, service-account token, or password when `user` is set.
    pub token: Option<String>,
    /// User name for basic authentication.
    pub user: Option<String>,
    /// Skip TLS certificate verification for https URLs.
    pub insecure_skip_verify: bool,
}

/// Local resource tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Root directory containing the `dashboards/` tree.
    pub root: PathBuf,
    /// File extension used when writing resources: `json`, `yaml` or `yml`.
    pub extension: String,
}

/// Change watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Seconds between remote polls.
    pub poll_interval_secs: u64,
    /// Consecutive transient fetch failures tolerated before giving up.
    pub max_transient_failures: u32,
}

/// Snapshot preview settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Seconds until previews expire; `0` keeps them forever.
    pub expires_seconds: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Environment variable overriding `grafana.url`.
pub const ENV_GRAFANA_URL: &str = "GRAFANA_URL";
/// Environment variable overriding `grafana.token`.
pub const ENV_GRAFANA_TOKEN: &str = "GRAFANA_TOKEN";
/// Environment variable overriding `grafana.user`.
pub const ENV_GRAFANA_USER: &str = "GRAFANA_USER";

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/dashsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dashsync")
            .join("config.yaml")
    }

    /// Apply `GRAFANA_URL`, `GRAFANA_TOKEN` and `GRAFANA_USER` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_GRAFANA_URL) {
            self.grafana.url = url;
        }
        if let Some(token) = get(ENV_GRAFANA_TOKEN) {
            self.grafana.token = Some(token);
        }
        if let Some(user) = get(ENV_GRAFANA_USER) {
            self.grafana.user = Some(user);
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "json".to_string(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            max_transient_failures: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"watch.poll_interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `sync.extension`.
const VALID_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- grafana ---
        if self.grafana.url.is_empty() {
            errors.push(ValidationError {
                field: "grafana.url".into(),
                message: "grafana URL is not set".into(),
            });
        } else if !(self.grafana.url.starts_with("http://")
            || self.grafana.url.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "grafana.url".into(),
                message: format!("must be an http or https URL, got '{}'", self.grafana.url),
            });
        }
        if self.grafana.user.is_some() && self.grafana.token.is_none() {
            errors.push(ValidationError {
                field: "grafana.token".into(),
                message: "a token (or password) is required when grafana.user is set".into(),
            });
        }

        // --- sync ---
        if !VALID_EXTENSIONS.contains(&self.sync.extension.as_str()) {
            errors.push(ValidationError {
                field: "sync.extension".into(),
                message: format!(
                    "invalid extension '{}', expected one of: {}",
                    self.sync.extension,
                    VALID_EXTENSIONS.join(", ")
                ),
            });
        }

        // --- watch ---
        if self.watch.poll_interval_secs == 0 {
            errors.push(ValidationError {
                field: "watch.poll_interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.watch.max_transient_failures == 0 {
            errors.push(ValidationError {
                field: "watch.max_transient_failures".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid log level '{}', expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grafana_url(mut self, url: impl Into<String>) -> Self {
        self.config.grafana.url = url.into();
        self
    }

    pub fn grafana_token(mut self, token: impl Into<String>) -> Self {
        self.config.grafana.token = Some(token.into());
        self
    }

    pub fn grafana_user(mut self, user: impl Into<String>) -> Self {
        self.config.grafana.user = Some(user.into());
        self
    }

    pub fn grafana_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.config.grafana.insecure_skip_verify = skip;
        self
    }

    pub fn sync_root(mut self, root: PathBuf) -> Self {
        self.config.sync.root = root;
        self
    }

    pub fn sync_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.sync.extension = extension.into();
        self
    }

    pub fn watch_poll_interval_secs(mut self, seconds: u64) -> Self {
        self.config.watch.poll_interval_secs = seconds;
        self
    }

    pub fn watch_max_transient_failures(mut self, n: u32) -> Self {
        self.config.watch.max_transient_failures = n;
        self
    }

    pub fn preview_expires_seconds(mut self, seconds: u64) -> Self {
        self.config.preview.expires_seconds = seconds;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Build without validation.
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate, returning the errors if any.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
