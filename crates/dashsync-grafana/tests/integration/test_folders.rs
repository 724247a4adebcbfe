//! Integration tests for folder lookup and creation

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use dashsync_core::domain::Folder;
use dashsync_core::ports::RemoteGateway;

use crate::common::{mount_error, setup_grafana_mock};

#[tokio::test]
async fn test_fetch_folder_by_numeric_id() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/folders/id/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "uid": "team-x",
            "title": "Team X",
            "url": "/dashboards/f/team-x/team-x"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folder = gateway.fetch_folder_by_numeric_id(7).await.unwrap();
    assert_eq!(folder.uid, "team-x");
    assert_eq!(folder.title, "Team X");
    assert_eq!(folder.id, Some(7));
}

#[tokio::test]
async fn test_fetch_folder_by_numeric_id_not_found() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "GET", "/api/folders/id/99", 404, "folder not found").await;

    let err = gateway.fetch_folder_by_numeric_id(99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fetch_folder_by_uid() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("GET"))
        .and(path("/api/folders/team-x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "uid": "team-x",
            "title": "Team X"
        })))
        .mount(&server)
        .await;

    let folder = gateway.fetch_folder_by_uid("team-x").await.unwrap();
    assert_eq!(folder, Folder { uid: "team-x".into(), title: "Team X".into(), id: Some(7) });
}

#[tokio::test]
async fn test_create_folder() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/folders"))
        .and(body_json(json!({"uid": "team-x", "title": "team-x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8,
            "uid": "team-x",
            "title": "team-x"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway
        .create_folder(&Folder::new("team-x", "team-x"))
        .await
        .unwrap();
    assert_eq!(created.id, Some(8));
}

#[tokio::test]
async fn test_create_existing_folder_is_rejected() {
    let (server, gateway) = setup_grafana_mock().await;
    mount_error(&server, "POST", "/api/folders", 409, "a folder with the same uid already exists").await;

    let err = gateway
        .create_folder(&Folder::new("team-x", "team-x"))
        .await
        .unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("409"));
}
