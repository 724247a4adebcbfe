//! Normalization of resources crossing the remote boundary
//!
//! [`prepare`] readies a local resource for dispatch; [`unprepare`] strips
//! the fields the remote system adds so fetched resources compare cleanly
//! against local files. Both are pure.

use dashsync_core::domain::Resource;

/// Spec fields assigned by the remote system on every save
const REMOTE_ASSIGNED_FIELDS: [&str; 2] = ["id", "version"];

/// Readies a resource for dispatch: `spec.uid` follows the name and the
/// numeric `id` is dropped
pub fn prepare(mut resource: Resource) -> Resource {
    let name = resource.name().to_string();
    resource.set_spec_str("uid", name);
    resource.remove_spec("id");
    resource
}

/// Strips remote-applied fields from a fetched resource
pub fn unprepare(mut resource: Resource) -> Resource {
    for field in REMOTE_ASSIGNED_FIELDS {
        resource.remove_spec(field);
    }
    resource
}
