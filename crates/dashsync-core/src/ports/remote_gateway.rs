//! Remote gateway port (driven/secondary port)
//!
//! This module defines the interface for the primitive operations against
//! the remote visualization service. The primary implementation targets the
//! Grafana HTTP API (`dashsync-grafana`); the sync layer depends only on
//! this trait.
//!
//! ## Design Notes
//!
//! - Returns the typed [`RemoteError`] rather than `anyhow::Error`: callers
//!   branch on `NotFound` (push decides between add and update, rename fails
//!   fast) and on transience (the watcher retries transport failures).
//! - Uses `#[async_trait]` for async trait methods.
//! - Implementations do not retry; a failed call is reported as-is.

use serde::{Deserialize, Serialize};

use crate::domain::{DashboardWrapper, Folder, RemoteError, Resource};

/// Options for publishing a snapshot of a dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    /// Seconds until the remote system deletes the snapshot; `0` keeps it forever
    pub expires_seconds: u64,
}

/// A published snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// URL at which the snapshot can be viewed
    pub url: String,
    /// URL that deletes the snapshot
    pub delete_url: String,
}

/// Port trait for the remote dashboard service
#[async_trait::async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetches a dashboard and its metadata by UID
    ///
    /// # Errors
    /// [`RemoteError::NotFound`] when no dashboard has this UID
    async fn fetch_by_uid(&self, uid: &str) -> Result<DashboardWrapper, RemoteError>;

    /// Lists the UIDs of every remote dashboard
    async fn list_uids(&self) -> Result<Vec<String>, RemoteError>;

    /// Creates the dashboard, or replaces the one with the same UID
    ///
    /// The target folder is taken from the resource's `folder` metadata;
    /// a missing or empty folder targets the General folder.
    async fn create_or_replace(&self, resource: &Resource) -> Result<(), RemoteError>;

    /// Deletes the dashboard with the given UID
    async fn delete_by_uid(&self, uid: &str) -> Result<(), RemoteError>;

    /// Looks a folder up by its legacy numeric id
    async fn fetch_folder_by_numeric_id(&self, id: i64) -> Result<Folder, RemoteError>;

    /// Looks a folder up by UID
    async fn fetch_folder_by_uid(&self, uid: &str) -> Result<Folder, RemoteError>;

    /// Creates a folder; the General folder must never be passed here
    async fn create_folder(&self, folder: &Folder) -> Result<Folder, RemoteError>;

    /// Publishes a snapshot of the resource
    async fn create_snapshot(
        &self,
        resource: &Resource,
        options: SnapshotOptions,
    ) -> Result<Snapshot, RemoteError>;

    /// Checks that the remote system is reachable with the configured credentials
    async fn health(&self) -> Result<(), RemoteError>;
}
