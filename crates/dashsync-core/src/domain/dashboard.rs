//! Raw dashboard payload returned by a fetch
//!
//! The `meta` block carries three independent hints about folder membership
//! that different versions of the remote API fill in differently: the legacy
//! numeric `folderId`, the `folderUid`, and a `folderUrl` path embedding the
//! folder UID.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::Resource;

/// Dashboard document plus remote metadata, as returned by a fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardWrapper {
    /// The dashboard specification
    pub dashboard: Map<String, Value>,
    /// Remote-side metadata
    #[serde(default)]
    pub meta: DashboardMeta,
}

/// Metadata block of a fetched dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    /// Legacy numeric folder id; `0` is the General folder
    #[serde(default)]
    pub folder_id: i64,
    /// Folder UID, empty on older remote versions
    #[serde(default)]
    pub folder_uid: String,
    /// Human path of the folder, e.g. `/dashboards/f/abc123/my-folder`
    #[serde(default)]
    pub folder_url: String,
    #[serde(default)]
    pub folder_title: String,
    /// Relative URL of the dashboard itself
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub version: i64,
}

impl DashboardWrapper {
    /// Builds a wrapper around a dashboard document with empty metadata
    pub fn new(dashboard: Map<String, Value>) -> Self {
        Self {
            dashboard,
            meta: DashboardMeta::default(),
        }
    }

    /// UID declared inside the dashboard document
    pub fn uid(&self) -> Option<&str> {
        self.dashboard.get("uid").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.dashboard.get("title").and_then(Value::as_str)
    }

    /// Converts the payload into a dashboard [`Resource`] living in `folder_uid`
    ///
    /// The resource name is the dashboard UID, falling back to `fallback_name`
    /// when the payload omits it.
    pub fn into_resource(self, fallback_name: &str, folder_uid: impl Into<String>) -> Resource {
        let name = self.uid().unwrap_or(fallback_name).to_string();
        let mut resource = Resource::dashboard(name, self.dashboard);
        resource.set_folder(folder_uid);
        resource
    }
}
