// API client module: a small blocking HTTP client that talks to the
// Prowlarr v1 API. Every call is a single request with a fixed timeout;
// nothing is retried, failures surface directly to the caller.

use std::cmp::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, RequestFailure};

/// Status and listing calls are cheap on the server side.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
pub const LIST_TIMEOUT: Duration = Duration::from_secs(10);
/// Searches fan out to every indexer and can take a while.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
pub const GRAB_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-Api-Key";

/// Blocking client for one Prowlarr instance. Holds the reqwest client
/// (with the API key installed as a default header) and the base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Response of `GET /api/v1/system/status`. Only the fields we show.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: Option<String>,
    pub instance_name: Option<String>,
}

/// A search result. Indexers report very different subsets of fields, so
/// everything but the grab key (`indexerId` + `guid`) is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub indexer: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub seeders: Option<i32>,
    #[serde(default)]
    pub leechers: Option<i32>,
    #[serde(default)]
    pub publish_date: Option<String>,
    pub indexer_id: i32,
    pub guid: String,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// A configured indexer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Indexer {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// A download client configured on the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadClient {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// Reply to a successful grab. Only the title is shown to the operator.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GrabConfirmation {
    pub title: Option<String>,
}

/// Body of `POST /api/v1/search`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrabRequest {
    pub indexer_id: i32,
    pub guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client_id: Option<i32>,
}

/// Newznab category filters offered by the search menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Movies,
    Tv,
    Audio,
}

impl Category {
    pub fn id(self) -> u32 {
        match self {
            Category::Movies => 2000,
            Category::Tv => 5000,
            Category::Audio => 3000,
        }
    }
}

/// Client-side ordering for search results (the API has no server-side sort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Seeders,
    Size,
    PublishDate,
}

/// Sort `releases` in descending order of `sort_by`. Missing or negative
/// numbers count as zero and missing dates as the empty string, so they
/// end up last. Dates compare as ISO strings. The sort is stable.
pub fn sort_releases(releases: &mut [Release], sort_by: SortBy) {
    let key_order = |a: &Release, b: &Release| -> Ordering {
        match sort_by {
            SortBy::Seeders => seeder_key(a).cmp(&seeder_key(b)),
            SortBy::Size => a.size.unwrap_or(0).cmp(&b.size.unwrap_or(0)),
            SortBy::PublishDate => a
                .publish_date
                .as_deref()
                .unwrap_or("")
                .cmp(b.publish_date.as_deref().unwrap_or("")),
        }
    };
    releases.sort_by(|a, b| key_order(b, a));
}

fn seeder_key(release: &Release) -> i32 {
    release.seeders.unwrap_or(0).max(0)
}

/// Decode search rows one by one. A row that is not a usable release is
/// logged and skipped instead of failing the whole search.
fn decode_releases(rows: Vec<Value>) -> Vec<Release> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(row, value)| match serde_json::from_value::<Release>(value) {
            Ok(release) => Some(release),
            Err(e) => {
                tracing::warn!(row, error = %e, "skipping malformed search result");
                None
            }
        })
        .collect()
}

impl ApiClient {
    /// Create a client for the server described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(config.api_key()).context("API key is not a valid header value")?;
        headers.insert(API_KEY_HEADER, key);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Check the server is reachable and the key is accepted.
    pub fn test_connection(&self) -> Result<SystemStatus, ApiError> {
        let req = self.client.get(self.url("system/status")).timeout(STATUS_TIMEOUT);
        send_json(req, "system/status").map_err(ApiError::Connection)
    }

    /// List the indexers configured on the server.
    pub fn list_indexers(&self) -> Result<Vec<Indexer>, ApiError> {
        let req = self.client.get(self.url("indexer")).timeout(LIST_TIMEOUT);
        send_json(req, "indexer").map_err(ApiError::List)
    }

    /// List the download clients configured on the server.
    pub fn list_download_clients(&self) -> Result<Vec<DownloadClient>, ApiError> {
        let req = self.client.get(self.url("downloadclient")).timeout(LIST_TIMEOUT);
        send_json(req, "downloadclient").map_err(ApiError::List)
    }

    /// Search across all indexers. An empty `categories` slice searches
    /// every category. Results come back sorted by `sort_by`, descending.
    pub fn search(
        &self,
        query: &str,
        categories: &[Category],
        limit: u32,
        sort_by: SortBy,
    ) -> Result<Vec<Release>, ApiError> {
        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("type", "search".to_string()),
        ];
        if !categories.is_empty() {
            let ids: Vec<String> = categories.iter().map(|c| c.id().to_string()).collect();
            params.push(("categories", ids.join(",")));
        }
        let req = self
            .client
            .get(self.url("search"))
            .query(&params)
            .timeout(SEARCH_TIMEOUT);
        let rows: Vec<Value> = send_json(req, "search").map_err(ApiError::Search)?;
        let mut releases = decode_releases(rows);
        sort_releases(&mut releases, sort_by);
        tracing::debug!(query, count = releases.len(), "search finished");
        Ok(releases)
    }

    /// Ask the server to send a release to a download client. Without
    /// `download_client_id` the server picks its default client.
    pub fn grab_release(
        &self,
        indexer_id: i32,
        guid: &str,
        download_client_id: Option<i32>,
    ) -> Result<GrabConfirmation, ApiError> {
        let body = GrabRequest {
            indexer_id,
            guid: guid.to_string(),
            download_client_id,
        };
        let req = self
            .client
            .post(self.url("search"))
            .json(&body)
            .timeout(GRAB_TIMEOUT);
        send_json(req, "search (grab)").map_err(ApiError::Grab)
    }
}

/// Send `req` and decode a JSON body, turning non-success statuses into
/// [`RequestFailure::Status`] with the response text attached.
fn send_json<T: DeserializeOwned>(req: RequestBuilder, what: &str) -> Result<T, RequestFailure> {
    tracing::debug!(endpoint = what, "sending request");
    let res = req.send().map_err(|e| {
        tracing::warn!(endpoint = what, error = %e, "request failed");
        RequestFailure::from(e)
    })?;
    let res = check_status(res, what)?;
    Ok(res.json()?)
}

fn check_status(res: Response, what: &str) -> Result<Response, RequestFailure> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    tracing::warn!(endpoint = what, %status, "server rejected request");
    Err(RequestFailure::Status { status, body })
}
