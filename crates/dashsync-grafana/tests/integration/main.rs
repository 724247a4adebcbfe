//! Integration tests for dashsync-grafana
//!
//! Uses wiremock to simulate the Grafana HTTP API and verifies end-to-end
//! behavior of the GrafanaClient and the GrafanaGateway adapter.

mod common;

mod test_dashboards;
mod test_folders;
mod test_snapshots;
