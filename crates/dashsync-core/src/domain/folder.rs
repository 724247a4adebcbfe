//! Remote folder type
//!
//! The General (root) folder has UID `""` and numeric id `0`. It always
//! exists remotely and is never created as a real folder object.

use serde::{Deserialize, Serialize};

/// UID of the General folder
pub const GENERAL_FOLDER_UID: &str = "";

/// Numeric id of the General folder
pub const GENERAL_FOLDER_ID: i64 = 0;

/// Display title (and on-disk directory name) of the General folder
pub const GENERAL_FOLDER_TITLE: &str = "General";

/// A remote grouping container for dashboards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Stable folder identifier
    pub uid: String,
    /// Display title
    pub title: String,
    /// Legacy numeric identifier, when the remote system reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Folder {
    pub fn new(uid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            id: None,
        }
    }

    /// Returns true for the General folder
    pub fn is_general(&self) -> bool {
        is_general_uid(&self.uid) || self.id == Some(GENERAL_FOLDER_ID)
    }
}

/// Returns true when `uid` designates the General folder
///
/// The title `General` is accepted as an alias because it is what authors
/// write in `folderName` overrides.
pub fn is_general_uid(uid: &str) -> bool {
    uid == GENERAL_FOLDER_UID || uid == GENERAL_FOLDER_TITLE
}
