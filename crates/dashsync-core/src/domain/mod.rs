//! Domain entities
//!
//! This module contains the core domain types for dashsync:
//! - Resources (the kind-tagged documents mirrored to disk)
//! - Folders, including the General folder sentinel
//! - The raw dashboard payload returned by a fetch
//! - Domain-specific error types

pub mod dashboard;
pub mod errors;
pub mod folder;
pub mod resource;

// Re-export commonly used types
pub use dashboard::{DashboardMeta, DashboardWrapper};
pub use errors::{AddressingError, RemoteError};
pub use folder::{is_general_uid, Folder, GENERAL_FOLDER_ID, GENERAL_FOLDER_TITLE, GENERAL_FOLDER_UID};
pub use resource::{Resource, API_VERSION, DASHBOARD_KIND};
