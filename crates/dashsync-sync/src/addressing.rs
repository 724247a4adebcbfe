//! Resource addressing - mapping between resources and the on-disk layout
//!
//! Dashboards live at `dashboards/<folder-dir>/dashboard-<name>.<ext>` below a
//! root directory. The General folder (UID `""`) is addressed through the
//! directory name `General`, so every path produced by [`path_for`] is found
//! again by [`files_under`].
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: Uses write-to-temp + rename to avoid partial files
//!   on crash or power loss.
//! - **Extension-driven encoding**: `.json` files hold pretty-printed JSON,
//!   `.yaml`/`.yml` files hold YAML. Both decode through `serde_json::Value`.
//! - **Two authoring conventions**: a per-dashboard `folderName` field and a
//!   document-level `grafanaDashboardFolder` declaration.

use std::path::{Path, PathBuf};

use dashsync_core::domain::{is_general_uid, AddressingError, Resource, DASHBOARD_KIND, GENERAL_FOLDER_TITLE, GENERAL_FOLDER_UID};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::SyncError;

/// Discovery glob, relative to the root
pub const DASHBOARD_GLOB: &str = "dashboards/*/dashboard-*";

/// Top-level directory holding dashboards
const DASHBOARDS_DIR: &str = "dashboards";

/// File name prefix of a dashboard file
const FILE_PREFIX: &str = "dashboard-";

/// Per-dashboard folder override, removed from the body on parse
const FOLDER_NAME_FIELD: &str = "folderName";

/// Document-level folder declaration applied to every dashboard in the bundle
const BUNDLE_FOLDER_FIELD: &str = "grafanaDashboardFolder";

/// Bundle map of dashboards keyed by an arbitrary name
const BUNDLE_DASHBOARDS_FIELD: &str = "grafanaDashboards";

// ============================================================================
// Encoding
// ============================================================================

/// On-disk encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Yaml,
}

impl Encoding {
    /// Maps an extension (without the dot) to an encoding
    pub fn from_extension(ext: &str) -> Result<Self, AddressingError> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "yaml" | "yml" => Ok(Encoding::Yaml),
            other => Err(AddressingError::UnsupportedExtension(other.to_string())),
        }
    }

    /// Encoding of an existing path, from its extension
    pub fn from_path(path: &Path) -> Result<Self, AddressingError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(ext)
    }

    /// Serializes a resource manifest
    pub fn encode(self, resource: &Resource) -> Result<String, SyncError> {
        match self {
            Encoding::Json => {
                let mut out = serde_json::to_string_pretty(resource)?;
                out.push('\n');
                Ok(out)
            }
            Encoding::Yaml => Ok(serde_yaml::to_string(resource)?),
        }
    }

    /// Decodes file content into a generic document
    pub fn decode(self, content: &str) -> Result<Value, SyncError> {
        match self {
            Encoding::Json => Ok(serde_json::from_str(content)?),
            Encoding::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

// ============================================================================
// Paths
// ============================================================================

/// Directory name used for a folder UID
pub fn folder_dir(folder_uid: &str) -> &str {
    if is_general_uid(folder_uid) {
        GENERAL_FOLDER_TITLE
    } else {
        folder_uid
    }
}

/// Folder UID addressed by a directory name
pub fn folder_from_dir(dir: &str) -> &str {
    if dir == GENERAL_FOLDER_TITLE {
        GENERAL_FOLDER_UID
    } else {
        dir
    }
}

/// Relative location of a resource: `dashboards/<folder-dir>/dashboard-<name>.<ext>`
///
/// # Errors
/// [`AddressingError::MissingFolder`] when the resource has not been
/// folder-resolved, [`AddressingError::MissingName`] when it has no name.
pub fn path_for(resource: &Resource, ext: &str) -> Result<PathBuf, AddressingError> {
    let folder = resource
        .folder()
        .ok_or_else(|| AddressingError::MissingFolder {
            kind: resource.kind().to_string(),
            name: resource.name().to_string(),
        })?;
    if resource.name().is_empty() {
        return Err(AddressingError::MissingName(resource.kind().to_string()));
    }
    let dir = folder_dir(folder);
    check_segment("folder", dir)?;
    check_segment("name", resource.name())?;

    Ok(PathBuf::from(DASHBOARDS_DIR)
        .join(dir)
        .join(format!("{FILE_PREFIX}{}.{ext}", resource.name())))
}

/// A folder directory or name must stay one component below `dashboards/`
fn check_segment(field: &'static str, value: &str) -> Result<(), AddressingError> {
    let unsafe_segment = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if unsafe_segment {
        return Err(AddressingError::InvalidPathSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Folder UID implied by a path inside the layout, if it is one
pub fn folder_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if !file_name.starts_with(FILE_PREFIX) {
        return None;
    }
    let dir = path.parent()?;
    let top = dir.parent()?.file_name()?.to_str()?;
    if top != DASHBOARDS_DIR {
        return None;
    }
    Some(folder_from_dir(dir.file_name()?.to_str()?).to_string())
}

/// Every file under `root` matching the discovery glob
///
/// Order follows the glob crate (alphabetical per directory level).
#[instrument(fields(root = %root.display()))]
pub fn files_under(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let pattern = Path::new(&glob::Pattern::escape(&root.to_string_lossy())).join(DASHBOARD_GLOB);
    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry.map_err(std::io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    debug!(count = files.len(), "discovered dashboard files");
    Ok(files)
}

// ============================================================================
// Document parsing
// ============================================================================

/// Interprets a decoded document as dashboard resources
///
/// Accepts a single manifest, a list of manifests, or a bundle
/// `{grafanaDashboardFolder?, grafanaDashboards: {key: dashboard}}`.
/// A `folderName` field inside a dashboard body is removed and becomes its
/// folder. `spec.uid` is normalized to the resource name. Resources whose
/// folder cannot be determined from the document keep no folder metadata.
pub fn parse_document(document: Value) -> Result<Vec<Resource>, AddressingError> {
    match document {
        Value::Array(items) => {
            let mut resources = Vec::with_capacity(items.len());
            for item in items {
                resources.extend(parse_document(item)?);
            }
            Ok(resources)
        }
        Value::Object(map) if map.contains_key(BUNDLE_DASHBOARDS_FIELD) => parse_bundle(map),
        Value::Object(map) if map.contains_key("kind") => parse_manifest(Value::Object(map)).map(|r| vec![r]),
        Value::Object(_) => Err(AddressingError::InvalidDocument(
            "expected a manifest, a list of manifests or a dashboard bundle".to_string(),
        )),
        other => Err(AddressingError::InvalidDocument(format!(
            "expected an object or a list, found {}",
            value_kind(&other)
        ))),
    }
}

fn parse_manifest(value: Value) -> Result<Resource, AddressingError> {
    let mut resource: Resource = serde_json::from_value(value)
        .map_err(|e| AddressingError::InvalidDocument(e.to_string()))?;
    if resource.kind() != DASHBOARD_KIND {
        return Err(AddressingError::InvalidDocument(format!(
            "unsupported kind '{}'",
            resource.kind()
        )));
    }
    if resource.name().is_empty() {
        return Err(AddressingError::MissingName(resource.kind().to_string()));
    }

    if let Some(folder) = take_folder_name(resource.spec_mut()) {
        resource.set_folder(folder);
    }
    let name = resource.name().to_string();
    resource.set_spec_str("uid", name);
    Ok(resource)
}

fn parse_bundle(mut map: Map<String, Value>) -> Result<Vec<Resource>, AddressingError> {
    let bundle_folder = match map.remove(BUNDLE_FOLDER_FIELD) {
        Some(Value::String(folder)) => Some(folder),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(AddressingError::InvalidDocument(format!(
                "{BUNDLE_FOLDER_FIELD} must be a string, found {}",
                value_kind(&other)
            )))
        }
    };

    let dashboards = match map.remove(BUNDLE_DASHBOARDS_FIELD) {
        Some(Value::Object(dashboards)) => dashboards,
        Some(other) => {
            return Err(AddressingError::InvalidDocument(format!(
                "{BUNDLE_DASHBOARDS_FIELD} must be an object, found {}",
                value_kind(&other)
            )))
        }
        None => Map::new(),
    };

    let mut resources = Vec::with_capacity(dashboards.len());
    for (key, body) in dashboards {
        let Value::Object(mut spec) = body else {
            return Err(AddressingError::InvalidDocument(format!(
                "dashboard '{key}' is not an object"
            )));
        };

        let folder = take_folder_name(&mut spec).or_else(|| bundle_folder.clone());
        let name = match spec.get("uid").and_then(Value::as_str) {
            Some(uid) if !uid.is_empty() => uid.to_string(),
            _ => key.strip_suffix(".json").unwrap_or(&key).to_string(),
        };
        if name.is_empty() {
            return Err(AddressingError::MissingName(DASHBOARD_KIND.to_string()));
        }

        let mut resource = Resource::dashboard(name.clone(), spec);
        resource.set_spec_str("uid", name);
        if let Some(folder) = folder {
            resource.set_folder(folder);
        }
        resources.push(resource);
    }
    Ok(resources)
}

/// Removes a string `folderName` from a dashboard body
fn take_folder_name(spec: &mut Map<String, Value>) -> Option<String> {
    match spec.remove(FOLDER_NAME_FIELD)? {
        Value::String(folder) => Some(folder),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// File I/O
// ============================================================================

/// Reads every dashboard resource declared in a file
///
/// Resources without folder metadata take the folder implied by the file's
/// location in the layout, or the General folder elsewhere.
#[instrument(fields(path = %path.display()))]
pub async fn read_resources(path: &Path) -> Result<Vec<Resource>, SyncError> {
    let encoding = Encoding::from_path(path)?;
    let content = tokio::fs::read_to_string(path).await?;
    let mut resources = parse_document(encoding.decode(&content)?)?;

    let implied = folder_from_path(path).unwrap_or_else(|| GENERAL_FOLDER_UID.to_string());
    for resource in &mut resources {
        if resource.folder().is_none() {
            resource.set_folder(implied.clone());
        }
    }
    debug!(count = resources.len(), "parsed resources");
    Ok(resources)
}

/// Writes a resource to its place below `root`, returning the full path
pub async fn write_resource(root: &Path, resource: &Resource, ext: &str) -> Result<PathBuf, SyncError> {
    let path = root.join(path_for(resource, ext)?);
    let content = Encoding::from_extension(ext)?.encode(resource)?;
    write_atomic(&path, content.as_bytes()).await?;
    Ok(path)
}

/// Hidden sibling `.<file name>.tmp` used while writing `target`
///
/// Same directory keeps the rename on one filesystem; the leading dot keeps
/// a leftover from an interrupted write out of the discovery glob.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    if let Some(file_name) = target.file_name() {
        name.push(file_name);
    }
    name.push(".tmp");
    target.with_file_name(name)
}

/// Atomic write via temp + rename, creating parent directories
#[instrument(skip(data), fields(path = %target.display(), bytes = data.len()))]
pub async fn write_atomic(target: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path_for(target);

    debug!(?tmp_path, "writing to temporary file");
    tokio::fs::write(&tmp_path, data).await?;
    tokio::fs::rename(&tmp_path, target).await?;
    debug!("write complete");
    Ok(())
}
