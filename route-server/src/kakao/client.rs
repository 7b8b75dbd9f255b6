//! Kakao HTTP client.
//!
//! One `reqwest` client serves both the mobility (routing) and the local
//! (search) APIs. Both authenticate with `Authorization: KakaoAK <key>`.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::RouteMode;

use super::error::KakaoError;
use super::types::{DirectionsResponse, ErrorBody, LocalSearchResponse};

/// Default base URL for the Kakao Mobility directions API.
pub const DEFAULT_MOBILITY_BASE_URL: &str = "https://apis-navi.kakaomobility.com";

/// Default base URL for the Kakao Local search API.
pub const DEFAULT_LOCAL_BASE_URL: &str = "https://dapi.kakao.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How much of an unparseable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the Kakao client.
#[derive(Clone)]
pub struct KakaoConfig {
    /// REST API key
    pub api_key: String,
    /// Base URL for routing requests
    pub mobility_base_url: String,
    /// Base URL for search requests
    pub local_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for KakaoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KakaoConfig")
            .field("api_key", &"<redacted>")
            .field("mobility_base_url", &self.mobility_base_url)
            .field("local_base_url", &self.local_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl KakaoConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            mobility_base_url: DEFAULT_MOBILITY_BASE_URL.to_string(),
            local_base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom routing base URL (for testing).
    pub fn with_mobility_base_url(mut self, url: impl Into<String>) -> Self {
        self.mobility_base_url = url.into();
        self
    }

    /// Set a custom search base URL (for testing).
    pub fn with_local_base_url(mut self, url: impl Into<String>) -> Self {
        self.local_base_url = url.into();
        self
    }

    /// Point both APIs at the same server.
    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.with_mobility_base_url(url.clone())
            .with_local_base_url(url)
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Kakao API client.
#[derive(Debug, Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    mobility_base_url: String,
    local_base_url: String,
}

impl KakaoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KakaoConfig) -> Result<Self, KakaoError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(KakaoError::InvalidApiKey("must not be empty"));
        }

        let mut auth = HeaderValue::from_str(&format!("KakaoAK {api_key}"))
            .map_err(|_| KakaoError::InvalidApiKey("contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            mobility_base_url: config.mobility_base_url.trim_end_matches('/').to_string(),
            local_base_url: config.local_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search by postal or road address (`/v2/local/search/address.json`).
    pub async fn search_address(&self, query: &str) -> Result<LocalSearchResponse, KakaoError> {
        self.search("/v2/local/search/address.json", query).await
    }

    /// Search by keyword, e.g. a place name (`/v2/local/search/keyword.json`).
    pub async fn search_keyword(&self, query: &str) -> Result<LocalSearchResponse, KakaoError> {
        self.search("/v2/local/search/keyword.json", query).await
    }

    async fn search(&self, path: &str, query: &str) -> Result<LocalSearchResponse, KakaoError> {
        let url = format!("{}{}", self.local_base_url, path);
        let started = Instant::now();

        let response = self.http.get(&url).query(&[("query", query)]).send().await?;

        debug!(
            path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Kakao local search"
        );

        read_json(response).await
    }

    /// Issue a GET against a routing endpoint, with `params` URL-encoded as
    /// the query string.
    pub async fn get_route<P: Serialize + ?Sized>(
        &self,
        mode: RouteMode,
        params: &P,
    ) -> Result<DirectionsResponse, KakaoError> {
        let url = format!("{}{}", self.mobility_base_url, mode.path());
        let started = Instant::now();

        let response = self.http.get(&url).query(params).send().await?;

        debug!(
            %mode,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Kakao directions"
        );

        read_json(response).await
    }

    /// Issue a JSON POST against a routing endpoint.
    pub async fn post_route<B: Serialize + ?Sized>(
        &self,
        mode: RouteMode,
        body: &B,
    ) -> Result<DirectionsResponse, KakaoError> {
        let url = format!("{}{}", self.mobility_base_url, mode.path());
        let started = Instant::now();

        let response = self.http.post(&url).json(body).send().await?;

        debug!(
            %mode,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Kakao directions"
        );

        read_json(response).await
    }
}

/// Check the status and decode the body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, KakaoError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let error: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let code = error.code;
        let message = error
            .into_message()
            .unwrap_or_else(|| format!("upstream request failed with status {}", status.as_u16()));

        warn!(status = status.as_u16(), ?code, %message, "Kakao API returned an error");

        return Err(KakaoError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| KakaoError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
    })
}
