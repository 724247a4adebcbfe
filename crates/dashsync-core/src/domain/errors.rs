//! Domain error types
//!
//! Errors raised at the remote boundary ([`RemoteError`]) and while mapping
//! resources to and from the local file layout ([`AddressingError`]).

use thiserror::Error;

/// Errors reported by a [`RemoteGateway`](crate::ports::RemoteGateway)
/// implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The resource or folder does not exist remotely
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote system could not be reached or refused the credentials
    #[error("Transport error: {0}")]
    Transport(String),

    /// A resource already exists under the identity about to be created
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The remote system answered with a payload of unexpected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The remote system rejected the request (validation, version mismatch, ...)
    #[error("Rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code returned by the remote system
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
}

impl RemoteError {
    /// Returns true when retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Transport(_) => true,
            RemoteError::Rejected { status, .. } => *status >= 500 || *status == 429,
            RemoteError::NotFound(_)
            | RemoteError::AlreadyExists(_)
            | RemoteError::MalformedResponse(_) => false,
        }
    }

    /// Returns true for [`RemoteError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}

/// Errors raised while mapping resources onto the on-disk layout
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressingError {
    /// The resource has not been folder-resolved yet
    #[error("{kind} {name} has no folder metadata")]
    MissingFolder {
        /// Resource kind
        kind: String,
        /// Resource name
        name: String,
    },

    /// The resource has no name
    #[error("{0} resource has no name")]
    MissingName(String),

    /// The document could not be interpreted as one or more resources
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A folder or name cannot be used as a single path component
    #[error("{field} {value:?} is not a valid path component")]
    InvalidPathSegment {
        /// Which part of the address was rejected (`folder` or `name`)
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The file extension is not a supported encoding
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}
