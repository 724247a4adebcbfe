//! ChangeWatcher - mirrors one remote dashboard into a local file
//!
//! Polls the remote dashboard at a fixed interval, encodes it in the format
//! of the target file and overwrites the file only when the encoded content
//! differs from what was last written (seeded from the file's current
//! content). Every write is reported through the [`Notifier`].
//!
//! ## Termination
//!
//! - Cancellation of the token ends the watch with `Ok(())`, also while a
//!   fetch is in flight.
//! - Fatal errors (not found, malformed payloads, local I/O) end it with the
//!   error.
//! - Transient errors are logged and retried on the next tick; too many in a
//!   row become fatal.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use dashsync_core::config::WatchConfig;
use dashsync_core::ports::{Notifier, Subject};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::addressing::{write_atomic, Encoding};
use crate::remote::RemoteDashboards;
use crate::SyncError;

/// Polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub poll_interval: Duration,
    /// Consecutive transient failures tolerated before giving up
    pub max_transient_failures: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self::from(&WatchConfig::default())
    }
}

impl From<&WatchConfig> for WatchOptions {
    fn from(config: &WatchConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_transient_failures: config.max_transient_failures,
        }
    }
}

/// Polling watcher for a single dashboard
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    remote: RemoteDashboards,
    options: WatchOptions,
}

impl ChangeWatcher {
    pub fn new(remote: RemoteDashboards, options: WatchOptions) -> Self {
        Self { remote, options }
    }

    pub fn options(&self) -> WatchOptions {
        self.options
    }

    /// Watches `uid` and keeps `local_path` in sync until `cancel` fires
    pub async fn watch(
        &self,
        notifier: &dyn Notifier,
        uid: &str,
        local_path: &Path,
        cancel: CancellationToken,
    ) -> Result<(), SyncError> {
        if self.options.poll_interval.is_zero() {
            return Err(SyncError::InvalidWatchOptions(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        let encoding = Encoding::from_path(local_path)?;
        let mut last_written = match tokio::fs::read_to_string(local_path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        info!(
            uid,
            path = %local_path.display(),
            poll_secs = self.options.poll_interval.as_secs_f64(),
            "Watching dashboard"
        );

        let mut ticker = tokio::time::interval(self.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut transient_failures: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                fetched = self.remote.fetch_resource(uid) => fetched,
            };

            let resource = match fetched {
                Ok(resource) => {
                    transient_failures = 0;
                    resource
                }
                Err(e) if e.is_transient() => {
                    transient_failures += 1;
                    warn!(uid, error = %e, attempt = transient_failures, "Transient failure while watching");
                    if transient_failures >= self.options.max_transient_failures {
                        return Err(SyncError::TooManyTransientFailures {
                            count: transient_failures,
                            last: e,
                        });
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let content = encoding.encode(&resource)?;
            if last_written.as_deref() == Some(content.as_str()) {
                debug!(uid, "no change");
                continue;
            }

            write_atomic(local_path, content.as_bytes()).await?;
            info!(uid, path = %local_path.display(), "Wrote updated dashboard");
            notifier.info(
                Subject::from(&resource),
                &format!("written to {}", local_path.display()),
            );
            last_written = Some(content);
        }

        info!(uid, "Watch cancelled");
        Ok(())
    }
}
