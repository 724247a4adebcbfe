//! Identity rename for remote dashboards
//!
//! The remote API has no rename primitive and refuses two dashboards with the
//! same title in one folder. [`RenameCoordinator`] therefore creates the new
//! identity under a random placeholder title, deletes the old identity, then
//! restores the real title:
//!
//! ```text
//! fetch(old) ──→ create(new, placeholder) ──→ delete-old ──→ restore-title(new)
//!                      │                          │
//!                      └──── both copies live ────┘
//! ```
//!
//! A failure aborts at the failing step without rollback. From the create
//! step onward at least one live copy exists remotely. The create step
//! refuses to run when `new_uid` is already taken, so an unrelated dashboard
//! is never overwritten and a rerun after a late failure reports the
//! collision instead of redoing the create.

use std::fmt::{self, Display, Formatter};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dashsync_core::domain::RemoteError;
use dashsync_core::ports::{Notifier, Subject};
use rand::RngCore;
use tracing::{debug, info};

use crate::remote::RemoteDashboards;
use crate::SyncError;

/// Random bytes drawn per placeholder title
const PLACEHOLDER_TOKEN_BYTES: usize = 7;

/// A step of the rename protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStep {
    Fetch,
    Create,
    DeleteOld,
    RestoreTitle,
}

impl Display for RenameStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenameStep::Fetch => "fetch",
            RenameStep::Create => "create",
            RenameStep::DeleteOld => "delete-old",
            RenameStep::RestoreTitle => "restore-title",
        };
        write!(f, "{}", s)
    }
}

/// Source of placeholder titles
pub trait TokenSource: Send + Sync {
    fn placeholder_title(&self) -> String;
}

/// Seven random bytes, standard base64
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn placeholder_title(&self) -> String {
        let mut token = [0u8; PLACEHOLDER_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut token);
        STANDARD.encode(token)
    }
}

/// Runs the placeholder-title rename protocol
pub struct RenameCoordinator {
    remote: RemoteDashboards,
    tokens: Box<dyn TokenSource>,
}

impl RenameCoordinator {
    pub fn new(remote: RemoteDashboards) -> Self {
        Self::with_token_source(remote, Box::new(RandomTokenSource))
    }

    pub fn with_token_source(remote: RemoteDashboards, tokens: Box<dyn TokenSource>) -> Self {
        Self { remote, tokens }
    }

    /// Moves the dashboard `old_uid` to `new_uid`, keeping folder and title
    ///
    /// # Errors
    /// [`SyncError::InvalidRename`] before any remote call when the UIDs are
    /// equal or `new_uid` is empty; otherwise [`SyncError::Rename`] tagged
    /// with the failing step.
    pub async fn rename(&self, old_uid: &str, new_uid: &str, notifier: &dyn Notifier) -> Result<(), SyncError> {
        if new_uid.is_empty() {
            return Err(SyncError::InvalidRename("new UID is empty".to_string()));
        }
        if old_uid == new_uid {
            return Err(SyncError::InvalidRename(format!(
                "{old_uid} is already the dashboard UID"
            )));
        }

        let mut resource = self
            .remote
            .fetch_resource(old_uid)
            .await
            .map_err(step_failed(RenameStep::Fetch))?;
        debug!(old_uid, new_uid, "rename: fetched");

        resource.set_name(new_uid);
        resource.set_spec_str("uid", new_uid);
        let title = resource.title().map(String::from);

        // create_or_replace overwrites, so an existing new_uid must stop the
        // rename here. A rerun after a restore-title failure lands here too.
        match self.remote.gateway().fetch_by_uid(new_uid).await {
            Ok(_) => {
                return Err(SyncError::Rename {
                    step: RenameStep::Create,
                    source: RemoteError::AlreadyExists(format!("dashboard {new_uid}")),
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(step_failed(RenameStep::Create)(e)),
        }

        let placeholder = self.tokens.placeholder_title();
        resource.set_spec_str("title", placeholder.as_str());
        self.remote
            .push(&resource)
            .await
            .map_err(step_failed(RenameStep::Create))?;
        debug!(new_uid, placeholder = %placeholder, "rename: created under placeholder title");

        self.remote
            .gateway()
            .delete_by_uid(old_uid)
            .await
            .map_err(step_failed(RenameStep::DeleteOld))?;
        debug!(old_uid, "rename: deleted old identity");

        match title {
            Some(title) => resource.set_spec_str("title", title),
            None => {
                resource.remove_spec("title");
            }
        }
        self.remote
            .push(&resource)
            .await
            .map_err(step_failed(RenameStep::RestoreTitle))?;

        info!(old_uid, new_uid, "Renamed dashboard");
        notifier.info(Subject::text(old_uid), &format!("renamed to {new_uid}"));
        Ok(())
    }
}

fn step_failed(step: RenameStep) -> impl FnOnce(RemoteError) -> SyncError {
    move |source| SyncError::Rename { step, source }
}
