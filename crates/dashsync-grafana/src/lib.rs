//! dashsync Grafana - Grafana HTTP API gateway
//!
//! Provides an async client for the dashboard, folder, search and snapshot
//! endpoints of the Grafana HTTP API, and the [`RemoteGateway`] adapter the
//! sync layer talks to.
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client and typed endpoint calls
//! - [`provider`] - [`RemoteGateway`] implementation on top of the client
//!
//! [`RemoteGateway`]: dashsync_core::ports::RemoteGateway

pub mod client;
pub mod provider;

use dashsync_core::domain::RemoteError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when communicating with the Grafana API
#[derive(Debug, Error)]
pub enum GrafanaError {
    /// The configured URL cannot be used as an API base
    #[error("Invalid Grafana URL: {0}")]
    InvalidUrl(String),

    /// Authentication credentials are missing or invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Grafana refused the request (validation, version mismatch, name taken)
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, or the raw body
        message: String,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, or the raw body
        message: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GrafanaError {
    /// Classifies a non-success HTTP status and its body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => GrafanaError::Unauthorized(message),
            StatusCode::FORBIDDEN => GrafanaError::Forbidden(message),
            StatusCode::NOT_FOUND => GrafanaError::NotFound(message),
            s if s.is_server_error() => GrafanaError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => GrafanaError::Rejected {
                status: s.as_u16(),
                message,
            },
        }
    }
}

/// Extracts the `message` field Grafana puts in error bodies
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

impl From<GrafanaError> for RemoteError {
    fn from(err: GrafanaError) -> Self {
        match err {
            GrafanaError::NotFound(msg) => RemoteError::NotFound(msg),
            GrafanaError::Unauthorized(_)
            | GrafanaError::Forbidden(_)
            | GrafanaError::NetworkError(_)
            | GrafanaError::InvalidUrl(_) => RemoteError::Transport(err.to_string()),
            GrafanaError::InvalidResponse(msg) => RemoteError::MalformedResponse(msg),
            GrafanaError::Rejected { status, message }
            | GrafanaError::ServerError { status, message } => {
                RemoteError::Rejected { status, message }
            }
        }
    }
}
