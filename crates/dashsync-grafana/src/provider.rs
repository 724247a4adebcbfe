//! GrafanaGateway - RemoteGateway implementation for the Grafana HTTP API
//!
//! Wraps the [`GrafanaClient`] and maps its typed errors onto the port-level
//! [`RemoteError`] so the sync layer never sees HTTP details.
//!
//! ## Design Notes
//!
//! - `GrafanaClient` methods take `&self`, so no interior locking is needed.
//! - The target folder of a save comes from the resource's `folder`
//!   metadata; the General folder (and its `General` alias) is sent as `""`.
//! - Listing walks the search endpoint page by page until a short page.

use dashsync_core::config::GrafanaConfig;
use dashsync_core::domain::{is_general_uid, DashboardWrapper, Folder, RemoteError, Resource};
use dashsync_core::ports::{RemoteGateway, Snapshot, SnapshotOptions};
use tracing::{debug, info};

use crate::client::{GrafanaClient, SEARCH_PAGE_SIZE};
use crate::GrafanaError;

/// Upper bound on search pages, guarding against a server that ignores `page`
const MAX_SEARCH_PAGES: usize = 1000;

/// Remote gateway backed by a Grafana instance
#[derive(Debug, Clone)]
pub struct GrafanaGateway {
    client: GrafanaClient,
}

impl GrafanaGateway {
    /// Creates a new `GrafanaGateway` wrapping the given [`GrafanaClient`]
    pub fn new(client: GrafanaClient) -> Self {
        Self { client }
    }

    /// Builds the client from the `grafana` configuration section
    pub fn from_config(config: &GrafanaConfig) -> Result<Self, GrafanaError> {
        Ok(Self::new(GrafanaClient::from_config(config)?))
    }

    pub fn client(&self) -> &GrafanaClient {
        &self.client
    }
}

/// Folder UID to send with a save; General is always `""`
fn target_folder(resource: &Resource) -> &str {
    match resource.folder() {
        Some(folder) if !is_general_uid(folder) => folder,
        _ => "",
    }
}

#[async_trait::async_trait]
impl RemoteGateway for GrafanaGateway {
    async fn fetch_by_uid(&self, uid: &str) -> Result<DashboardWrapper, RemoteError> {
        debug!(uid, "GrafanaGateway::fetch_by_uid");
        self.client.get_dashboard(uid).await.map_err(|e| match e {
            GrafanaError::NotFound(_) => RemoteError::NotFound(format!("dashboard {uid}")),
            other => other.into(),
        })
    }

    async fn list_uids(&self) -> Result<Vec<String>, RemoteError> {
        let mut uids = Vec::new();

        for page in 1..=MAX_SEARCH_PAGES {
            let hits = self.client.search_dashboards(page).await?;
            let count = hits.len();
            uids.extend(
                hits.into_iter()
                    .filter(|h| h.hit_type.is_empty() || h.hit_type == "dash-db")
                    .map(|h| h.uid),
            );
            if count < SEARCH_PAGE_SIZE {
                break;
            }
        }

        debug!(count = uids.len(), "GrafanaGateway::list_uids");
        Ok(uids)
    }

    async fn create_or_replace(&self, resource: &Resource) -> Result<(), RemoteError> {
        let folder_uid = target_folder(resource);
        debug!(uid = resource.name(), folder = folder_uid, "GrafanaGateway::create_or_replace");

        let saved = self.client.save_dashboard(resource.spec(), folder_uid).await?;
        debug!(
            uid = saved.uid.as_deref().unwrap_or_default(),
            version = saved.version.unwrap_or_default(),
            "Dashboard saved"
        );
        Ok(())
    }

    async fn delete_by_uid(&self, uid: &str) -> Result<(), RemoteError> {
        self.client.delete_dashboard(uid).await.map_err(|e| match e {
            GrafanaError::NotFound(_) => RemoteError::NotFound(format!("dashboard {uid}")),
            other => other.into(),
        })
    }

    async fn fetch_folder_by_numeric_id(&self, id: i64) -> Result<Folder, RemoteError> {
        debug!(id, "GrafanaGateway::fetch_folder_by_numeric_id");
        Ok(self.client.get_folder_by_id(id).await?)
    }

    async fn fetch_folder_by_uid(&self, uid: &str) -> Result<Folder, RemoteError> {
        Ok(self.client.get_folder(uid).await?)
    }

    async fn create_folder(&self, folder: &Folder) -> Result<Folder, RemoteError> {
        if folder.is_general() {
            return Err(RemoteError::Rejected {
                status: 400,
                message: "the General folder cannot be created".to_string(),
            });
        }
        let created = self.client.create_folder(&folder.uid, &folder.title).await?;
        info!(uid = %created.uid, title = %created.title, "Created folder");
        Ok(created)
    }

    async fn create_snapshot(
        &self,
        resource: &Resource,
        options: SnapshotOptions,
    ) -> Result<Snapshot, RemoteError> {
        debug!(uid = resource.name(), expires = options.expires_seconds, "GrafanaGateway::create_snapshot");
        let response = self
            .client
            .create_snapshot(resource.spec(), options.expires_seconds)
            .await?;
        Ok(Snapshot {
            url: response.url,
            delete_url: response.delete_url,
        })
    }

    async fn health(&self) -> Result<(), RemoteError> {
        Ok(self.client.get_home_dashboard().await?)
    }
}
