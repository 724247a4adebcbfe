//! Grafana HTTP API client
//!
//! Provides a typed HTTP client for the subset of the Grafana HTTP API that
//! dashsync needs. Handles authentication headers, endpoint construction
//! (including Grafana instances served under a sub-path), status mapping and
//! JSON deserialization.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync_grafana::client::{Auth, GrafanaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GrafanaClient::new("https://grafana.example.com", Auth::Bearer("token".into()))?;
//! let wrapper = client.get_dashboard("abc").await?;
//! println!("{:?}", wrapper.title());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use dashsync_core::config::GrafanaConfig;
use dashsync_core::domain::{DashboardWrapper, Folder};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::GrafanaError;

/// User agent sent with every request
const USER_AGENT: &str = concat!("dashsync/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size used when listing dashboards through `/api/search`
pub const SEARCH_PAGE_SIZE: usize = 1000;

// ============================================================================
// Authentication
// ============================================================================

/// Credentials attached to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// No credentials (anonymous access enabled on the instance)
    Anonymous,
    /// API key or service-account token sent as a bearer token
    Bearer(String),
    /// HTTP basic authentication
    Basic { user: String, password: String },
}

impl Auth {
    /// Token plus user means basic auth, token alone means bearer
    pub fn from_config(config: &GrafanaConfig) -> Self {
        match (&config.user, &config.token) {
            (Some(user), Some(token)) => Auth::Basic {
                user: user.clone(),
                password: token.clone(),
            },
            (None, Some(token)) => Auth::Bearer(token.clone()),
            _ => Auth::Anonymous,
        }
    }
}

// ============================================================================
// Grafana API payload types
// ============================================================================

/// One entry of a `/api/search` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub hit_type: String,
    #[serde(default)]
    pub folder_uid: Option<String>,
}

/// Folder as returned by the folder endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderResponse {
    id: Option<i64>,
    uid: String,
    title: String,
}

impl From<FolderResponse> for Folder {
    fn from(r: FolderResponse) -> Self {
        Folder {
            uid: r.uid,
            title: r.title,
            id: r.id,
        }
    }
}

/// Body of `POST /api/dashboards/db`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveDashboardRequest<'a> {
    dashboard: &'a Map<String, Value>,
    folder_uid: &'a str,
    overwrite: bool,
}

/// Response of `POST /api/dashboards/db`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDashboardResponse {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /api/folders`
#[derive(Debug, Serialize)]
struct CreateFolderRequest<'a> {
    uid: &'a str,
    title: &'a str,
}

/// Body of `POST /api/snapshots`
#[derive(Debug, Serialize)]
struct SnapshotRequest<'a> {
    dashboard: &'a Map<String, Value>,
    expires: u64,
}

/// Response of `POST /api/snapshots`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub url: String,
    pub delete_url: String,
    #[serde(default)]
    pub key: Option<String>,
}

// ============================================================================
// GrafanaClient
// ============================================================================

/// HTTP client for Grafana API calls
///
/// Wraps `reqwest::Client` with authentication and base URL construction.
/// All endpoint paths are resolved below `<url>/api`.
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    /// The underlying HTTP client
    client: Client,
    /// API root, e.g. `https://grafana.example.com/sub/api`
    api_base: Url,
    /// Credentials attached to each request
    auth: Auth,
}

impl GrafanaClient {
    /// Creates a client for the Grafana instance at `url`
    ///
    /// # Errors
    /// [`GrafanaError::InvalidUrl`] when `url` is not an http(s) URL
    pub fn new(url: &str, auth: Auth) -> Result<Self, GrafanaError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(client, url, auth)
    }

    /// Creates a client from the `grafana` configuration section
    ///
    /// Certificate verification is disabled only for https URLs with
    /// `insecure_skip_verify` set.
    pub fn from_config(config: &GrafanaConfig) -> Result<Self, GrafanaError> {
        let insecure = config.insecure_skip_verify && config.url.starts_with("https://");
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Self::with_client(client, &config.url, Auth::from_config(config))
    }

    fn with_client(client: Client, url: &str, auth: Auth) -> Result<Self, GrafanaError> {
        let api_base = api_base(url)?;
        debug!(api_base = %api_base, "Created Grafana client");
        Ok(Self {
            client,
            api_base,
            auth,
        })
    }

    /// Returns the API root URL
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Resolves path segments below the API root, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Creates an authenticated request builder for the given method and path segments
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint(segments));
        match &self.auth {
            Auth::Anonymous => builder,
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::Basic { user, password } => builder.basic_auth(user, Some(password)),
        }
    }

    /// Sends a request and maps non-success statuses to [`GrafanaError`]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, GrafanaError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Grafana returned error status");
        Err(GrafanaError::from_status(status, &body))
    }

    /// Retrieves a dashboard and its metadata
    ///
    /// Makes `GET /api/dashboards/uid/{uid}`.
    pub async fn get_dashboard(&self, uid: &str) -> Result<DashboardWrapper, GrafanaError> {
        debug!(uid, "Fetching dashboard");
        let response = self
            .execute(self.request(Method::GET, &["dashboards", "uid", uid]))
            .await?;
        decode(response).await
    }

    /// Retrieves one page of dashboards from the search endpoint (pages start at 1)
    pub async fn search_dashboards(&self, page: usize) -> Result<Vec<SearchHit>, GrafanaError> {
        debug!(page, "Searching dashboards");
        let request = self.request(Method::GET, &["search"]).query(&[
            ("type", "dash-db".to_string()),
            ("limit", SEARCH_PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ]);
        let response = self.execute(request).await?;
        decode(response).await
    }

    /// Creates or overwrites a dashboard in the given folder (`""` is General)
    ///
    /// Makes `POST /api/dashboards/db` with `overwrite: true`.
    pub async fn save_dashboard(
        &self,
        dashboard: &Map<String, Value>,
        folder_uid: &str,
    ) -> Result<SaveDashboardResponse, GrafanaError> {
        let body = SaveDashboardRequest {
            dashboard,
            folder_uid,
            overwrite: true,
        };
        let response = self
            .execute(self.request(Method::POST, &["dashboards", "db"]).json(&body))
            .await?;
        decode(response).await
    }

    /// Deletes a dashboard by UID
    pub async fn delete_dashboard(&self, uid: &str) -> Result<(), GrafanaError> {
        debug!(uid, "Deleting dashboard");
        self.execute(self.request(Method::DELETE, &["dashboards", "uid", uid]))
            .await?;
        Ok(())
    }

    /// Retrieves a folder by its legacy numeric id
    pub async fn get_folder_by_id(&self, id: i64) -> Result<Folder, GrafanaError> {
        let id = id.to_string();
        let response = self
            .execute(self.request(Method::GET, &["folders", "id", &id]))
            .await?;
        decode::<FolderResponse>(response).await.map(Folder::from)
    }

    /// Retrieves a folder by UID
    pub async fn get_folder(&self, uid: &str) -> Result<Folder, GrafanaError> {
        let response = self
            .execute(self.request(Method::GET, &["folders", uid]))
            .await?;
        decode::<FolderResponse>(response).await.map(Folder::from)
    }

    /// Creates a folder
    pub async fn create_folder(&self, uid: &str, title: &str) -> Result<Folder, GrafanaError> {
        let body = CreateFolderRequest { uid, title };
        let response = self
            .execute(self.request(Method::POST, &["folders"]).json(&body))
            .await?;
        decode::<FolderResponse>(response).await.map(Folder::from)
    }

    /// Publishes a snapshot of a dashboard document
    pub async fn create_snapshot(
        &self,
        dashboard: &Map<String, Value>,
        expires: u64,
    ) -> Result<SnapshotResponse, GrafanaError> {
        let body = SnapshotRequest { dashboard, expires };
        let response = self
            .execute(self.request(Method::POST, &["snapshots"]).json(&body))
            .await?;
        decode(response).await
    }

    /// Fetches the home dashboard, used as a reachability and credentials check
    pub async fn get_home_dashboard(&self) -> Result<(), GrafanaError> {
        self.execute(self.request(Method::GET, &["dashboards", "home"]))
            .await?;
        Ok(())
    }
}

/// Builds the `<url>/api` root, keeping any sub-path the instance is served under
fn api_base(url: &str) -> Result<Url, GrafanaError> {
    let mut parsed = Url::parse(url).map_err(|e| GrafanaError::InvalidUrl(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GrafanaError::InvalidUrl(format!(
            "{url}: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    parsed
        .path_segments_mut()
        .map_err(|_| GrafanaError::InvalidUrl(url.to_string()))?
        .pop_if_empty()
        .push("api");
    parsed.set_query(None);
    Ok(parsed)
}

/// Reads a JSON body, reporting shape mismatches as [`GrafanaError::InvalidResponse`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GrafanaError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GrafanaError::InvalidResponse(e.to_string()))
}
