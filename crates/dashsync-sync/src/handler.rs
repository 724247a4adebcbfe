//! DashboardHandler - dashboard operations over a remote gateway
//!
//! Composes addressing, folder resolution, rename and watch into the
//! operations the CLI exposes: get, list, push, pull, preview, delete,
//! rename and watch.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashsync_core::domain::{is_general_uid, AddressingError, Folder, Resource, DASHBOARD_KIND};
use dashsync_core::ports::{Notifier, RemoteGateway, Subject, SnapshotOptions};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::addressing::{self, write_resource};
use crate::prepare::{prepare, unprepare};
use crate::remote::RemoteDashboards;
use crate::rename::RenameCoordinator;
use crate::watch::{ChangeWatcher, WatchOptions};
use crate::SyncError;

/// Extension used when none is configured
pub const DEFAULT_EXTENSION: &str = "json";

/// Result of pushing one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Added,
    Updated,
    /// The remote copy already matches
    Unchanged,
}

impl Display for PushOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            PushOutcome::Added => "added",
            PushOutcome::Updated => "updated",
            PushOutcome::Unchanged => "unchanged",
        };
        write!(f, "{}", s)
    }
}

/// Dashboard operations against one remote instance
#[derive(Debug, Clone)]
pub struct DashboardHandler {
    remote: RemoteDashboards,
    extension: String,
}

impl DashboardHandler {
    /// Creates a handler with the default folder chain and `json` files
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self::from_remote(RemoteDashboards::new(gateway))
    }

    pub fn from_remote(remote: RemoteDashboards) -> Self {
        Self {
            remote,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the extension used for pulled files
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn kind(&self) -> &'static str {
        DASHBOARD_KIND
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn remote(&self) -> &RemoteDashboards {
        &self.remote
    }

    /// Dashboard files below `root`
    pub fn find_resource_files(&self, root: &Path) -> Result<Vec<PathBuf>, SyncError> {
        addressing::files_under(root)
    }

    /// Relative location of a resource with the handler's extension
    pub fn resource_file_path(&self, resource: &Resource) -> Result<PathBuf, AddressingError> {
        addressing::path_for(resource, &self.extension)
    }

    pub fn parse(&self, document: Value) -> Result<Vec<Resource>, AddressingError> {
        addressing::parse_document(document)
    }

    /// Fetches a dashboard as a folder-resolved resource
    pub async fn get_by_uid(&self, uid: &str) -> Result<Resource, SyncError> {
        self.remote
            .fetch_resource(uid)
            .await
            .map_err(|source| SyncError::Retrieve {
                uid: uid.to_string(),
                source,
            })
    }

    /// UIDs of every remote dashboard
    pub async fn list_remote(&self) -> Result<Vec<String>, SyncError> {
        Ok(self.remote.gateway().list_uids().await?)
    }

    /// Creates a dashboard, materializing its folder first
    pub async fn add(&self, resource: &Resource) -> Result<(), SyncError> {
        self.ensure_folder(resource).await?;
        self.remote.push(resource).await?;
        info!(uid = resource.name(), "Added dashboard");
        Ok(())
    }

    /// Replaces `existing` with `resource`
    pub async fn update(&self, existing: &Resource, resource: &Resource) -> Result<(), SyncError> {
        if folder_key(existing.folder()) != folder_key(resource.folder()) {
            info!(
                uid = resource.name(),
                from = folder_key(existing.folder()),
                to = folder_key(resource.folder()),
                "Moving dashboard to another folder"
            );
        }
        self.ensure_folder(resource).await?;
        self.remote.push(resource).await?;
        info!(uid = resource.name(), "Updated dashboard");
        Ok(())
    }

    /// Adds, updates or skips a resource depending on its remote state
    pub async fn push(&self, resource: &Resource) -> Result<PushOutcome, SyncError> {
        if resource.name().is_empty() {
            return Err(AddressingError::MissingName(resource.kind().to_string()).into());
        }

        match self.remote.fetch_resource(resource.name()).await {
            Err(e) if e.is_not_found() => {
                self.add(resource).await?;
                Ok(PushOutcome::Added)
            }
            Err(e) => Err(e.into()),
            Ok(existing) if same_content(&existing, resource) => {
                debug!(uid = resource.name(), "remote copy is up to date");
                Ok(PushOutcome::Unchanged)
            }
            Ok(existing) => {
                self.update(&existing, resource).await?;
                Ok(PushOutcome::Updated)
            }
        }
    }

    /// Writes every remote dashboard below `root`, returning the paths written
    pub async fn pull(&self, root: &Path) -> Result<Vec<PathBuf>, SyncError> {
        let uids = self.list_remote().await?;
        let mut written = Vec::with_capacity(uids.len());
        for uid in uids {
            let resource = self.get_by_uid(&uid).await?;
            let path = write_resource(root, &resource, &self.extension).await?;
            debug!(uid = %uid, path = %path.display(), "pulled dashboard");
            written.push(path);
        }
        info!(count = written.len(), root = %root.display(), "Pulled dashboards");
        Ok(written)
    }

    /// Publishes a snapshot and reports its view and delete URLs
    pub async fn preview(
        &self,
        resource: &Resource,
        notifier: &dyn Notifier,
        options: SnapshotOptions,
    ) -> Result<(), SyncError> {
        let snapshot = self
            .remote
            .gateway()
            .create_snapshot(&prepare(resource.clone()), options)
            .await?;

        notifier.info(Subject::from(resource), &format!("view: {}", snapshot.url));
        notifier.error(Subject::from(resource), &format!("delete: {}", snapshot.delete_url));
        if options.expires_seconds > 0 {
            notifier.warn(
                Subject::from(resource),
                &format!(
                    "Previews will expire and be deleted automatically in {} seconds",
                    options.expires_seconds
                ),
            );
        }
        Ok(())
    }

    pub async fn delete_by_uid(&self, uid: &str) -> Result<(), SyncError> {
        self.remote.gateway().delete_by_uid(uid).await?;
        info!(uid, "Deleted dashboard");
        Ok(())
    }

    /// Changes the UID of a remote dashboard
    pub async fn rename(&self, old_uid: &str, new_uid: &str, notifier: &dyn Notifier) -> Result<(), SyncError> {
        RenameCoordinator::new(self.remote.clone())
            .rename(old_uid, new_uid, notifier)
            .await
    }

    /// Mirrors a remote dashboard into `local_path` until cancelled
    pub async fn watch(
        &self,
        notifier: &dyn Notifier,
        uid: &str,
        local_path: &Path,
        options: WatchOptions,
        cancel: CancellationToken,
    ) -> Result<(), SyncError> {
        ChangeWatcher::new(self.remote.clone(), options)
            .watch(notifier, uid, local_path, cancel)
            .await
    }

    /// Creates the resource's folder when it is not General and missing remotely
    async fn ensure_folder(&self, resource: &Resource) -> Result<(), SyncError> {
        let Some(folder) = resource.folder() else {
            return Ok(());
        };
        if is_general_uid(folder) {
            return Ok(());
        }

        let gateway = self.remote.gateway();
        match gateway.fetch_folder_by_uid(folder).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                let created = gateway.create_folder(&Folder::new(folder, folder)).await?;
                info!(folder = %created.uid, "Created folder");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Folder UID with the General aliases collapsed to `""`
fn folder_key(folder: Option<&str>) -> &str {
    match folder {
        Some(f) if !is_general_uid(f) => f,
        _ => "",
    }
}

/// True when pushing `local` would not change `existing`
fn same_content(existing: &Resource, local: &Resource) -> bool {
    let local = unprepare(prepare(local.clone()));
    existing.spec() == local.spec() && folder_key(existing.folder()) == folder_key(local.folder())
}
