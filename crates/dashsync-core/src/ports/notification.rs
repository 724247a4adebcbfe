//! Notifier port (driven/secondary port)
//!
//! This module defines the interface through which operations report
//! user-facing events: rename confirmations, watcher writes, preview URLs.
//!
//! ## Design Notes
//!
//! - Notifications are fire-and-forget; delivery failures are the
//!   implementation's concern and never reach the caller.
//! - Each notification is keyed by a [`Subject`], either a resource or a
//!   plain string (e.g. a UID that no longer resolves to a resource).

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::Resource;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warn,
    Error,
}

impl Display for NotificationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warn => "warn",
            NotificationLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// What a notification is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject {
    /// A resource, identified by kind and name
    Resource { kind: String, name: String },
    /// Free text, typically a bare UID
    Text { value: String },
}

impl Subject {
    pub fn text(value: impl Into<String>) -> Self {
        Subject::Text {
            value: value.into(),
        }
    }
}

impl From<&Resource> for Subject {
    fn from(resource: &Resource) -> Self {
        Subject::Resource {
            kind: resource.kind().to_string(),
            name: resource.name().to_string(),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Resource { kind, name } => write!(f, "{}.{}", kind, name),
            Subject::Text { value } => write!(f, "{}", value),
        }
    }
}

/// A leveled message about a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub subject: Subject,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, subject: Subject, message: impl Into<String>) -> Self {
        Self {
            level,
            subject,
            message: message.into(),
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.message)
    }
}

/// Port trait for reporting user-facing events
pub trait Notifier: Send + Sync {
    /// Delivers a notification
    fn notify(&self, notification: Notification);

    fn info(&self, subject: Subject, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, subject, message));
    }

    fn warn(&self, subject: Subject, message: &str) {
        self.notify(Notification::new(NotificationLevel::Warn, subject, message));
    }

    fn error(&self, subject: Subject, message: &str) {
        self.notify(Notification::new(NotificationLevel::Error, subject, message));
    }
}

/// Notifier that forwards every notification to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let subject = notification.subject.to_string();
        match notification.level {
            NotificationLevel::Info => info!(subject = %subject, "{}", notification.message),
            NotificationLevel::Warn => warn!(subject = %subject, "{}", notification.message),
            NotificationLevel::Error => error!(subject = %subject, "{}", notification.message),
        }
    }
}
