//! Integration tests for dashboard fetch, list, save and delete

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use dashsync_core::domain::{RemoteError, Resource};
use dashsync_core::ports::RemoteGateway;

use crate::common::{
    dashboard_body, mount_dashboard, mount_error, search_hits, setup_grafana_mock, TEST_TOKEN,
};

#[tokio::test]
async fn test_fetch_by_uid_returns_dashboard_and_meta() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_dashboard(&server, "abc", dashboard_body("abc", "Sales", "team-x", 7)).await;

    let wrapper = gateway.fetch_by_uid("abc").await.unwrap();

    assert_eq!(wrapper.uid(), Some("abc"));
    assert_eq!(wrapper.title(), Some("Sales"));
    assert_eq!(wrapper.meta.folder_id, 7);
    assert_eq!(wrapper.meta.folder_uid, "team-x");
    assert_eq!(wrapper.meta.folder_url, "/dashboards/f/team-x/team-x");
}

#[tokio::test]
async fn test_fetch_sends_bearer_token() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(dashboard_body("abc", "Sales", "", 0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    gateway.fetch_by_uid("abc").await.unwrap();
}

#[tokio::test]
async fn test_fetch_missing_dashboard_is_not_found() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "GET", "/api/dashboards/uid/missing", 404, "Dashboard not found").await;

    let err = gateway.fetch_by_uid("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err, RemoteError::NotFound("dashboard missing".into()));
}

#[tokio::test]
async fn test_fetch_unauthorized_is_transport() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "GET", "/api/dashboards/uid/abc", 401, "Invalid API key").await;

    let err = gateway.fetch_by_uid("abc").await.unwrap_err();

    assert!(matches!(err, RemoteError::Transport(ref m) if m.contains("Invalid API key")));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let err = gateway.fetch_by_uid("abc").await.unwrap_err();
    assert!(matches!(err, RemoteError::MalformedResponse(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_server_error_is_transient_rejection() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "GET", "/api/dashboards/uid/abc", 503, "database locked").await;

    let err = gateway.fetch_by_uid("abc").await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Rejected {
            status: 503,
            message: "database locked".into()
        }
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_list_uids_single_page() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-db"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uid": "abc", "title": "Sales", "type": "dash-db"},
            {"uid": "team-x", "title": "Team X", "type": "dash-folder"},
            {"uid": "xyz", "title": "Ops", "type": "dash-db"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let uids = gateway.list_uids().await.unwrap();
    assert_eq!(uids, vec!["abc".to_string(), "xyz".to_string()]);
}

#[tokio::test]
async fn test_list_uids_follows_pages() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hits("p1", 1000)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hits("p2", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let uids = gateway.list_uids().await.unwrap();
    assert_eq!(uids.len(), 1002);
    assert_eq!(uids[0], "p1-0");
    assert_eq!(uids[1001], "p2-1");
}

#[tokio::test]
async fn test_list_uids_empty_instance() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(gateway.list_uids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_or_replace_posts_folder_uid() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/dashboards/db"))
        .and(body_partial_json(json!({
            "dashboard": {"uid": "abc", "title": "Sales"},
            "folderUid": "team-x",
            "overwrite": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "uid": "abc",
            "url": "/d/abc/sales",
            "status": "success",
            "version": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = json!({"uid": "abc", "title": "Sales"});
    let mut resource = Resource::dashboard("abc", spec.as_object().cloned().unwrap());
    resource.set_folder("team-x");

    gateway.create_or_replace(&resource).await.unwrap();
}

#[tokio::test]
async fn test_create_or_replace_general_sends_empty_folder() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/dashboards/db"))
        .and(body_partial_json(json!({"folderUid": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uid": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = json!({"uid": "abc", "title": "Sales"});
    let mut resource = Resource::dashboard("abc", spec.as_object().cloned().unwrap());
    resource.set_folder("General");

    gateway.create_or_replace(&resource).await.unwrap();
}

#[tokio::test]
async fn test_create_or_replace_rejected() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(
        &server,
        "POST",
        "/api/dashboards/db",
        412,
        "A dashboard with the same name in the folder already exists",
    )
    .await;

    let spec = json!({"uid": "abc", "title": "Sales"});
    let resource = Resource::dashboard("abc", spec.as_object().cloned().unwrap());

    let err = gateway.create_or_replace(&resource).await.unwrap_err();
    assert!(matches!(err, RemoteError::Rejected { status: 412, ref message } if message.contains("same name")));
}

#[tokio::test]
async fn test_delete_by_uid() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("DELETE"))
        .and(path("/api/dashboards/uid/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Sales",
            "message": "Dashboard Sales deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    gateway.delete_by_uid("abc").await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_dashboard_is_not_found() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "DELETE", "/api/dashboards/uid/gone", 404, "Dashboard not found").await;

    let err = gateway.delete_by_uid("gone").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_health_uses_home_dashboard() {
    let (_server, gateway) = setup_grafana_mock().await;
    gateway.health().await.unwrap();
}
