//! In-memory doubles shared by the unit tests of this crate

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use dashsync_core::domain::{
    is_general_uid, DashboardMeta, DashboardWrapper, Folder, RemoteError, Resource,
};
use dashsync_core::ports::{Notification, Notifier, RemoteGateway, Snapshot, SnapshotOptions};
use serde_json::{json, Map, Value};

use crate::rename::TokenSource;

#[derive(Default)]
struct State {
    dashboards: BTreeMap<String, DashboardWrapper>,
    folders: BTreeMap<String, Folder>,
    calls: Vec<String>,
    fetch_failures: VecDeque<RemoteError>,
    persistent_fetch_failure: Option<RemoteError>,
    delete_failure: Option<RemoteError>,
    create_failure: Option<(usize, RemoteError)>,
    folder_failure: Option<RemoteError>,
    saves: usize,
    next_id: i64,
}

/// Remote gateway over in-memory maps, with failure injection
///
/// Saves behave like the real service: a non-General target folder must
/// exist, and two dashboards in one folder cannot share a title.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_folder(&self, folder: Folder) {
        let mut state = self.state.lock().unwrap();
        state.folders.insert(folder.uid.clone(), folder);
    }

    /// Stores a dashboard as a save would, creating its folder if needed
    pub fn insert_dashboard(&self, uid: &str, title: &str, folder_uid: &str) {
        let mut state = self.state.lock().unwrap();
        if !is_general_uid(folder_uid) && !state.folders.contains_key(folder_uid) {
            state.next_id += 1;
            let id = state.next_id;
            state.folders.insert(
                folder_uid.to_string(),
                Folder {
                    uid: folder_uid.to_string(),
                    title: folder_uid.to_string(),
                    id: Some(id),
                },
            );
        }
        let spec = json!({"uid": uid, "title": title, "panels": []});
        let wrapper = stored(&mut state, spec.as_object().cloned().unwrap_or_default(), folder_uid);
        state.dashboards.insert(uid.to_string(), wrapper);
    }

    /// Stores a raw payload untouched
    pub fn insert_wrapper(&self, uid: &str, wrapper: DashboardWrapper) {
        self.state
            .lock()
            .unwrap()
            .dashboards
            .insert(uid.to_string(), wrapper);
    }

    pub fn dashboard(&self, uid: &str) -> Option<Map<String, Value>> {
        self.state
            .lock()
            .unwrap()
            .dashboards
            .get(uid)
            .map(|w| w.dashboard.clone())
    }

    pub fn folder_of(&self, uid: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .dashboards
            .get(uid)
            .map(|w| w.meta.folder_uid.clone())
    }

    pub fn has_folder(&self, uid: &str) -> bool {
        self.state.lock().unwrap().folders.contains_key(uid)
    }

    pub fn uids(&self) -> Vec<String> {
        self.state.lock().unwrap().dashboards.keys().cloned().collect()
    }

    /// Changes a stored title as an edit in the remote UI would
    pub fn set_title(&self, uid: &str, title: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(wrapper) = state.dashboards.get_mut(uid) {
            wrapper.dashboard.insert("title".into(), json!(title));
            wrapper.meta.version += 1;
            wrapper.dashboard.insert("version".into(), json!(wrapper.meta.version));
        }
    }

    pub fn remove(&self, uid: &str) {
        self.state.lock().unwrap().dashboards.remove(uid);
    }

    pub fn fail_next_fetch(&self, err: RemoteError) {
        self.state.lock().unwrap().fetch_failures.push_back(err);
    }

    pub fn fail_fetches(&self, err: RemoteError) {
        self.state.lock().unwrap().persistent_fetch_failure = Some(err);
    }

    pub fn fail_deletes(&self, err: RemoteError) {
        self.state.lock().unwrap().delete_failure = Some(err);
    }

    /// Lets `successes` more saves through, then fails every save with `err`
    pub fn fail_creates_after(&self, successes: usize, err: RemoteError) {
        let mut state = self.state.lock().unwrap();
        let allowed = state.saves + successes;
        state.create_failure = Some((allowed, err));
    }

    pub fn fail_folder_lookups(&self, err: RemoteError) {
        self.state.lock().unwrap().folder_failure = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

/// Builds the stored payload for a save into `folder_uid`
fn stored(state: &mut State, mut dashboard: Map<String, Value>, folder_uid: &str) -> DashboardWrapper {
    let folder_uid = if is_general_uid(folder_uid) { "" } else { folder_uid };
    let folder_id = state
        .folders
        .get(folder_uid)
        .and_then(|f| f.id)
        .unwrap_or(0);
    let uid = dashboard
        .get("uid")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let version = state
        .dashboards
        .get(&uid)
        .map(|w| w.meta.version + 1)
        .unwrap_or(1);

    state.next_id += 1;
    dashboard.insert("id".into(), json!(state.next_id));
    dashboard.insert("version".into(), json!(version));

    DashboardWrapper {
        dashboard,
        meta: DashboardMeta {
            folder_id,
            folder_uid: folder_uid.to_string(),
            folder_url: if folder_uid.is_empty() {
                String::new()
            } else {
                format!("/dashboards/f/{folder_uid}/")
            },
            folder_title: folder_uid.to_string(),
            url: format!("/d/{uid}"),
            version,
        },
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn fetch_by_uid(&self, uid: &str) -> Result<DashboardWrapper, RemoteError> {
        self.record(format!("fetch_by_uid {uid}"));
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fetch_failures.pop_front() {
            return Err(err);
        }
        if let Some(err) = &state.persistent_fetch_failure {
            return Err(err.clone());
        }
        state
            .dashboards
            .get(uid)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("dashboard {uid}")))
    }

    async fn list_uids(&self) -> Result<Vec<String>, RemoteError> {
        self.record("list_uids".to_string());
        Ok(self.uids())
    }

    async fn create_or_replace(&self, resource: &Resource) -> Result<(), RemoteError> {
        self.record(format!("create_or_replace {}", resource.name()));
        let mut state = self.state.lock().unwrap();

        if let Some((allowed, err)) = &state.create_failure {
            if state.saves >= *allowed {
                return Err(err.clone());
            }
        }
        state.saves += 1;

        let folder = resource.folder().unwrap_or_default();
        let folder = if is_general_uid(folder) { "" } else { folder };
        if !folder.is_empty() && !state.folders.contains_key(folder) {
            return Err(RemoteError::Rejected {
                status: 400,
                message: "folder not found".into(),
            });
        }

        let clash = state.dashboards.iter().any(|(uid, w)| {
            uid != resource.name()
                && w.meta.folder_uid == folder
                && w.dashboard.get("title").and_then(Value::as_str) == resource.title()
        });
        if clash {
            return Err(RemoteError::Rejected {
                status: 412,
                message: "A dashboard with the same name in the folder already exists".into(),
            });
        }

        let wrapper = stored(&mut state, resource.spec().clone(), folder);
        state.dashboards.insert(resource.name().to_string(), wrapper);
        Ok(())
    }

    async fn delete_by_uid(&self, uid: &str) -> Result<(), RemoteError> {
        self.record(format!("delete_by_uid {uid}"));
        let mut state = self.state.lock().unwrap();
        if let Some(err) = &state.delete_failure {
            return Err(err.clone());
        }
        state
            .dashboards
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(format!("dashboard {uid}")))
    }

    async fn fetch_folder_by_numeric_id(&self, id: i64) -> Result<Folder, RemoteError> {
        self.record(format!("fetch_folder_by_numeric_id {id}"));
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.folder_failure {
            return Err(err.clone());
        }
        state
            .folders
            .values()
            .find(|f| f.id == Some(id))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("folder {id}")))
    }

    async fn fetch_folder_by_uid(&self, uid: &str) -> Result<Folder, RemoteError> {
        self.record(format!("fetch_folder_by_uid {uid}"));
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.folder_failure {
            return Err(err.clone());
        }
        state
            .folders
            .get(uid)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("folder {uid}")))
    }

    async fn create_folder(&self, folder: &Folder) -> Result<Folder, RemoteError> {
        self.record(format!("create_folder {}", folder.uid));
        let mut state = self.state.lock().unwrap();
        if state.folders.contains_key(&folder.uid) {
            return Err(RemoteError::Rejected {
                status: 409,
                message: "a folder with the same uid already exists".into(),
            });
        }
        state.next_id += 1;
        let created = Folder {
            id: Some(state.next_id),
            ..folder.clone()
        };
        state.folders.insert(created.uid.clone(), created.clone());
        Ok(created)
    }

    async fn create_snapshot(
        &self,
        resource: &Resource,
        options: SnapshotOptions,
    ) -> Result<Snapshot, RemoteError> {
        self.record(format!(
            "create_snapshot {} {}",
            resource.name(),
            options.expires_seconds
        ));
        Ok(Snapshot {
            url: format!("http://grafana.local/dashboard/snapshot/{}", resource.name()),
            delete_url: format!("http://grafana.local/api/snapshots-delete/{}", resource.name()),
        })
    }

    async fn health(&self) -> Result<(), RemoteError> {
        self.record("health".to_string());
        Ok(())
    }
}

/// Notifier keeping every notification
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    /// Rendered `subject message` lines
    pub fn lines(&self) -> Vec<String> {
        self.notifications().iter().map(ToString::to_string).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Token source returning a fixed placeholder
pub struct FixedTokenSource(pub &'static str);

impl TokenSource for FixedTokenSource {
    fn placeholder_title(&self) -> String {
        self.0.to_string()
    }
}
