//! Resource entity
//!
//! A [`Resource`] is the local representation of a remote object: a kind tag,
//! a metadata map (whose `name` entry is the remote identity) and a free-form
//! specification document. It serializes to the manifest shape used on disk:
//!
//! ```yaml
//! apiVersion: grizzly.grafana.com/v1alpha1
//! kind: Dashboard
//! metadata:
//!   folder: team-x
//!   name: abc
//! spec:
//!   title: Sales
//!   uid: abc
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Group/version written into every manifest
pub const API_VERSION: &str = "grizzly.grafana.com/v1alpha1";

/// Kind tag of dashboard resources
pub const DASHBOARD_KIND: &str = "Dashboard";

/// Metadata key holding the remote identity
pub const NAME_KEY: &str = "name";

/// Metadata key holding the folder UID, set by the addressing layer
pub const FOLDER_KEY: &str = "folder";

/// A typed, kind-tagged document mirrored between disk and the remote system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default = "default_api_version")]
    api_version: String,
    kind: String,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    spec: Map<String, Value>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

impl Resource {
    /// Creates a resource of the given kind and name around a spec document
    pub fn new(kind: impl Into<String>, name: impl Into<String>, spec: Map<String, Value>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(NAME_KEY.to_string(), name.into());
        Self {
            api_version: API_VERSION.to_string(),
            kind: kind.into(),
            metadata,
            spec,
        }
    }

    /// Creates a dashboard resource
    pub fn dashboard(name: impl Into<String>, spec: Map<String, Value>) -> Self {
        Self::new(DASHBOARD_KIND, name, spec)
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Remote identity of the resource; empty when unset
    pub fn name(&self) -> &str {
        self.metadata(NAME_KEY).unwrap_or_default()
    }

    /// Sets the remote identity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set_metadata(NAME_KEY, name);
    }

    /// Folder UID assigned by the addressing layer, if resolved
    pub fn folder(&self) -> Option<&str> {
        self.metadata(FOLDER_KEY)
    }

    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.set_metadata(FOLDER_KEY, folder);
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn remove_metadata(&mut self, key: &str) -> Option<String> {
        self.metadata.remove(key)
    }

    pub fn spec(&self) -> &Map<String, Value> {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.spec
    }

    /// Returns a string-valued spec field
    pub fn spec_str(&self, key: &str) -> Option<&str> {
        self.spec.get(key).and_then(Value::as_str)
    }

    pub fn set_spec_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.spec.insert(key.into(), Value::String(value.into()));
    }

    pub fn remove_spec(&mut self, key: &str) -> Option<Value> {
        self.spec.remove(key)
    }

    /// Display title of the resource, when the spec carries one
    pub fn title(&self) -> Option<&str> {
        self.spec_str("title")
    }

    /// Returns true when `spec.uid` equals the resource name
    pub fn is_dispatchable(&self) -> bool {
        !self.name().is_empty() && self.spec_str("uid") == Some(self.name())
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_dashboard_constructor() {
        let r = Resource::dashboard("abc", spec(json!({"uid": "abc", "title": "Sales"})));
        assert_eq!(r.kind(), DASHBOARD_KIND);
        assert_eq!(r.api_version(), API_VERSION);
        assert_eq!(r.name(), "abc");
        assert_eq!(r.title(), Some("Sales"));
        assert!(r.folder().is_none());
        assert!(r.is_dispatchable());
        assert_eq!(r.to_string(), "Dashboard.abc");
    }

    #[test]
    fn test_uid_mismatch_is_not_dispatchable() {
        let r = Resource::dashboard("abc", spec(json!({"uid": "other"})));
        assert!(!r.is_dispatchable());

        let r = Resource::dashboard("abc", Map::new());
        assert!(!r.is_dispatchable());
    }

    #[test]
    fn test_manifest_serialization() {
        let mut r = Resource::dashboard("abc", spec(json!({"uid": "abc"})));
        r.set_folder("team-x");

        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["apiVersion"], API_VERSION);
        assert_eq!(value["kind"], "Dashboard");
        assert_eq!(value["metadata"]["name"], "abc");
        assert_eq!(value["metadata"]["folder"], "team-x");
        assert_eq!(value["spec"]["uid"], "abc");

        let back: Resource = serde_json::from_value(value).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_api_version_defaults_when_omitted() {
        let r: Resource = serde_json::from_value(json!({
            "kind": "Dashboard",
            "metadata": {"name": "abc"}
        }))
        .unwrap();
        assert_eq!(r.api_version(), API_VERSION);
        assert!(r.spec().is_empty());
    }

    #[test]
    fn test_spec_accessors() {
        let mut r = Resource::dashboard("abc", Map::new());
        r.set_spec_str("title", "Sales");
        assert_eq!(r.spec_str("title"), Some("Sales"));
        assert_eq!(r.remove_spec("title"), Some(json!("Sales")));
        assert!(r.title().is_none());
    }
}
