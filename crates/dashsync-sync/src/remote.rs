//! RemoteDashboards - gateway facade speaking in resources
//!
//! Pairs a [`RemoteGateway`] with a [`FolderResolver`] so callers fetch
//! folder-resolved, unprepared [`Resource`]s and push prepared ones without
//! touching raw payloads.

use std::sync::Arc;

use dashsync_core::domain::{RemoteError, Resource};
use dashsync_core::ports::RemoteGateway;
use tracing::debug;

use crate::folder::FolderResolver;
use crate::prepare::{prepare, unprepare};

/// Resource-level access to remote dashboards
#[derive(Clone)]
pub struct RemoteDashboards {
    gateway: Arc<dyn RemoteGateway>,
    resolver: Arc<FolderResolver>,
}

impl RemoteDashboards {
    /// Uses the default folder-resolution chain
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self::with_resolver(gateway, FolderResolver::default())
    }

    pub fn with_resolver(gateway: Arc<dyn RemoteGateway>, resolver: FolderResolver) -> Self {
        Self {
            gateway,
            resolver: Arc::new(resolver),
        }
    }

    pub fn gateway(&self) -> &dyn RemoteGateway {
        self.gateway.as_ref()
    }

    /// Fetches a dashboard as a folder-resolved, unprepared resource
    pub async fn fetch_resource(&self, uid: &str) -> Result<Resource, RemoteError> {
        let wrapper = self.gateway.fetch_by_uid(uid).await?;
        let folder = self
            .resolver
            .resolve_folder_uid(&wrapper, self.gateway.as_ref())
            .await;
        debug!(uid, folder = %folder, "fetched dashboard");
        Ok(unprepare(wrapper.into_resource(uid, folder)))
    }

    /// Prepares and saves a resource, replacing any dashboard with the same UID
    pub async fn push(&self, resource: &Resource) -> Result<(), RemoteError> {
        let prepared = prepare(resource.clone());
        self.gateway.create_or_replace(&prepared).await
    }
}

impl std::fmt::Debug for RemoteDashboards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDashboards")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
