//! Folder resolution for fetched dashboards
//!
//! A fetched payload carries up to three folder hints that different remote
//! versions fill in differently. [`FolderResolver`] evaluates an ordered list
//! of [`FolderStrategy`] values and takes the first answer; when none
//! answers, the dashboard is in the General folder.
//!
//! The default chain:
//!
//! 1. [`GeneralFolderId`] - `folderId == 0` means General, stop here
//! 2. [`MetaFolderUid`] - a non-empty `folderUid`
//! 3. [`FolderUrl`] - the UID segment of `/dashboards/f/<uid>`
//! 4. [`NumericIdLookup`] - a remote folder lookup by numeric id

use async_trait::async_trait;
use dashsync_core::domain::{DashboardWrapper, GENERAL_FOLDER_ID, GENERAL_FOLDER_UID};
use dashsync_core::ports::RemoteGateway;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Captures the folder UID from a folder URL path
static FOLDER_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/dashboards/f/([^/]+)").expect("folder URL regex is valid")
});

/// Folder UID embedded in a folder URL, e.g. `abc123` in `/dashboards/f/abc123/my-folder`
pub fn folder_uid_from_url(url: &str) -> Option<&str> {
    FOLDER_URL_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// One step of the resolution chain
#[async_trait]
pub trait FolderStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns the folder UID, or `None` to defer to the next strategy
    async fn resolve(&self, wrapper: &DashboardWrapper, gateway: &dyn RemoteGateway) -> Option<String>;
}

/// Legacy numeric id `0` is the General folder
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralFolderId;

#[async_trait]
impl FolderStrategy for GeneralFolderId {
    fn name(&self) -> &'static str {
        "general-folder-id"
    }

    async fn resolve(&self, wrapper: &DashboardWrapper, _gateway: &dyn RemoteGateway) -> Option<String> {
        (wrapper.meta.folder_id == GENERAL_FOLDER_ID).then(|| GENERAL_FOLDER_UID.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetaFolderUid;

#[async_trait]
impl FolderStrategy for MetaFolderUid {
    fn name(&self) -> &'static str {
        "meta-folder-uid"
    }

    async fn resolve(&self, wrapper: &DashboardWrapper, _gateway: &dyn RemoteGateway) -> Option<String> {
        let uid = &wrapper.meta.folder_uid;
        (!uid.is_empty()).then(|| uid.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FolderUrl;

#[async_trait]
impl FolderStrategy for FolderUrl {
    fn name(&self) -> &'static str {
        "folder-url"
    }

    async fn resolve(&self, wrapper: &DashboardWrapper, _gateway: &dyn RemoteGateway) -> Option<String> {
        folder_uid_from_url(&wrapper.meta.folder_url).map(String::from)
    }
}

/// Remote lookup by numeric id; failures defer silently
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIdLookup;

#[async_trait]
impl FolderStrategy for NumericIdLookup {
    fn name(&self) -> &'static str {
        "numeric-id-lookup"
    }

    async fn resolve(&self, wrapper: &DashboardWrapper, gateway: &dyn RemoteGateway) -> Option<String> {
        let id = wrapper.meta.folder_id;
        match gateway.fetch_folder_by_numeric_id(id).await {
            Ok(folder) => Some(folder.uid),
            Err(e) => {
                debug!(folder_id = id, error = %e, "folder lookup failed, using General");
                None
            }
        }
    }
}

/// Ordered chain of folder strategies
pub struct FolderResolver {
    strategies: Vec<Box<dyn FolderStrategy>>,
}

impl FolderResolver {
    /// Creates a resolver evaluating `strategies` in order
    pub fn new(strategies: Vec<Box<dyn FolderStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the configured strategies, in evaluation order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Folder UID of a fetched dashboard; `""` is the General folder
    pub async fn resolve_folder_uid(&self, wrapper: &DashboardWrapper, gateway: &dyn RemoteGateway) -> String {
        for strategy in &self.strategies {
            if let Some(uid) = strategy.resolve(wrapper, gateway).await {
                debug!(strategy = strategy.name(), folder = %uid, "resolved folder");
                return uid;
            }
        }
        GENERAL_FOLDER_UID.to_string()
    }
}

impl Default for FolderResolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(GeneralFolderId),
            Box::new(MetaFolderUid),
            Box::new(FolderUrl),
            Box::new(NumericIdLookup),
        ])
    }
}

impl std::fmt::Debug for FolderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderResolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
