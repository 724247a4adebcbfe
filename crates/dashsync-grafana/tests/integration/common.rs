//! Shared test helpers for Grafana API integration tests
//!
//! Provides wiremock-based mock server setup for the Grafana endpoints.
//! Each helper mounts the necessary mock endpoints and returns a gateway
//! pointing at the mock server.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashsync_grafana::client::{Auth, GrafanaClient};
use dashsync_grafana::provider::GrafanaGateway;

pub const TEST_TOKEN: &str = "test-token";

/// Starts a mock server and returns a (MockServer, GrafanaGateway) tuple.
///
/// Pre-configured endpoints:
/// - GET /api/dashboards/home → home dashboard
pub async fn setup_grafana_mock() -> (MockServer, GrafanaGateway) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dashboard": {"title": "Home"},
            "meta": {"isHome": true}
        })))
        .mount(&server)
        .await;

    let client = GrafanaClient::new(&server.uri(), Auth::Bearer(TEST_TOKEN.to_string()))
        .expect("mock server URI is valid");

    (server, GrafanaGateway::new(client))
}

/// Body returned by `GET /api/dashboards/uid/{uid}`
pub fn dashboard_body(uid: &str, title: &str, folder_uid: &str, folder_id: i64) -> Value {
    json!({
        "dashboard": {
            "id": 42,
            "uid": uid,
            "title": title,
            "version": 3,
            "panels": []
        },
        "meta": {
            "folderId": folder_id,
            "folderUid": folder_uid,
            "folderTitle": "Team X",
            "folderUrl": format!("/dashboards/f/{folder_uid}/team-x"),
            "url": format!("/d/{uid}/{}", title.to_lowercase()),
            "version": 3
        }
    })
}

/// Mounts `GET /api/dashboards/uid/{uid}` returning the given body
pub async fn mount_dashboard(server: &MockServer, uid: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/dashboards/uid/{uid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a Grafana-style error response for any request on `route`
pub async fn mount_error(server: &MockServer, http_method: &str, route: &str, status: u16, message: &str) {
    Mock::given(method(http_method))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
        .mount(server)
        .await;
}

/// Builds `count` search hits with UIDs `<prefix>-<n>`
pub fn search_hits(prefix: &str, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|n| {
                json!({
                    "id": n,
                    "uid": format!("{prefix}-{n}"),
                    "title": format!("Dashboard {n}"),
                    "type": "dash-db"
                })
            })
            .collect(),
    )
}
