//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the sync layer depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`RemoteGateway`] - Primitive operations against the remote dashboard service
//! - [`Notifier`] - User-facing event reporting

pub mod notification;
pub mod remote_gateway;

pub use notification::{Notification, NotificationLevel, Notifier, Subject, TracingNotifier};
pub use remote_gateway::{RemoteGateway, Snapshot, SnapshotOptions};
