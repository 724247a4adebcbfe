//! Integration tests for snapshot previews

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use dashsync_core::domain::{RemoteError, Resource};
use dashsync_core::ports::{RemoteGateway, SnapshotOptions};

use crate::common::setup_grafana_mock;

fn sales_dashboard() -> Resource {
    let spec = json!({"uid": "abc", "title": "Sales", "panels": []});
    Resource::dashboard("abc", spec.as_object().cloned().unwrap())
}

#[tokio::test]
async fn test_create_snapshot_returns_urls() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/snapshots"))
        .and(body_partial_json(json!({
            "dashboard": {"uid": "abc", "title": "Sales"},
            "expires": 3600
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleteKey": "dk",
            "deleteUrl": "http://grafana.local/api/snapshots-delete/dk",
            "key": "k1",
            "url": "http://grafana.local/dashboard/snapshot/k1",
            "id": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = gateway
        .create_snapshot(&sales_dashboard(), SnapshotOptions { expires_seconds: 3600 })
        .await
        .unwrap();

    assert_eq!(snapshot.url, "http://grafana.local/dashboard/snapshot/k1");
    assert_eq!(snapshot.delete_url, "http://grafana.local/api/snapshots-delete/dk");
}

#[tokio::test]
async fn test_create_snapshot_without_expiry() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/snapshots"))
        .and(body_partial_json(json!({"expires": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleteUrl": "http://grafana.local/api/snapshots-delete/dk",
            "url": "http://grafana.local/dashboard/snapshot/k1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    gateway
        .create_snapshot(&sales_dashboard(), SnapshotOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_snapshot_missing_urls_is_malformed() {
    let (server, gateway) = setup_grafana_mock().await;

    Mock::given(method("POST"))
        .and(path("/api/snapshots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "k1"})))
        .mount(&server)
        .await;

    let err = gateway
        .create_snapshot(&sales_dashboard(), SnapshotOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::MalformedResponse(_)));
}
