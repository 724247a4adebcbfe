//! dashsync Sync - Resource addressing and remote orchestration
//!
//! Provides:
//! - Mapping between dashboard resources and the on-disk file layout
//! - Folder resolution for fetched dashboards
//! - Collision-avoiding identity rename
//! - Polling watcher mirroring one remote dashboard into a local file
//!
//! ## Modules
//!
//! - [`addressing`] - File discovery, path mapping, document parsing and encoding
//! - [`folder`] - Ordered folder-resolution strategy chain
//! - [`prepare`] - Pure normalization before dispatch and after fetch
//! - [`remote`] - Gateway facade returning folder-resolved resources
//! - [`rename`] - Placeholder-title rename protocol
//! - [`watch`] - Cancellable polling watcher
//! - [`handler`] - Dashboard operations composed from the above

pub mod addressing;
pub mod folder;
pub mod handler;
pub mod prepare;
pub mod remote;
pub mod rename;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_support;

use dashsync_core::domain::{AddressingError, RemoteError};
use thiserror::Error;

pub use rename::RenameStep;

/// Errors that can occur during synchronization operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A resource could not be mapped to or from the file layout
    #[error(transparent)]
    Addressing(#[from] AddressingError),

    /// A remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A dashboard could not be retrieved
    #[error("Error retrieving dashboard {uid}: {source}")]
    Retrieve {
        uid: String,
        #[source]
        source: RemoteError,
    },

    /// A rename step failed; earlier steps are not rolled back
    #[error("Rename failed at step '{step}': {source}")]
    Rename {
        /// The step that failed
        step: RenameStep,
        #[source]
        source: RemoteError,
    },

    /// The rename request was refused before any remote call
    #[error("Invalid rename: {0}")]
    InvalidRename(String),

    /// The watcher was started with unusable polling parameters
    #[error("Invalid watch options: {0}")]
    InvalidWatchOptions(String),

    /// The watcher gave up after repeated transient failures
    #[error("Giving up after {count} consecutive transient failures: {last}")]
    TooManyTransientFailures {
        count: u32,
        /// The most recent failure
        last: RemoteError,
    },

    /// The discovery glob could not be built from the root path
    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SyncError {
    /// Returns the remote error behind this failure, if any
    pub fn remote_error(&self) -> Option<&RemoteError> {
        match self {
            SyncError::Remote(e)
            | SyncError::Retrieve { source: e, .. }
            | SyncError::Rename { source: e, .. }
            | SyncError::TooManyTransientFailures { last: e, .. } => Some(e),
            _ => None,
        }
    }
}
