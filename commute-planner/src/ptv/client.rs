//! PTV Timetable API HTTP client.
//!
//! Provides async methods for stop search and departure boards. Handles
//! request signing, concurrency limiting and conversion to domain types.

use std::sync::Arc;

use futures::future::BoxFuture;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{DeparturesResult, RouteType, StopId};

use super::convert::{convert_departures_response, convert_search_response};
use super::error::PtvError;
use super::signing::RequestSigner;
use super::source::{DataSource, SearchResults};
use super::types::{DeparturesResponse, SearchResponse};

/// Default base URL for the PTV Timetable API.
const DEFAULT_BASE_URL: &str = "https://timetableapi.ptv.vic.gov.au";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Expansions requested alongside departures so names resolve without
/// further calls.
const DEPARTURE_EXPAND: &str = "run,stop,route,direction,disruption";

/// Characters left unescaped in a path segment, matching JavaScript's
/// `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Configuration for the PTV client.
#[derive(Debug, Clone)]
pub struct PtvConfig {
    /// Developer id issued with the key
    pub dev_id: String,
    /// Signing key
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PtvConfig {
    /// Create a new config with the given credentials.
    pub fn new(dev_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            dev_id: dev_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// PTV Timetable API client.
#[derive(Debug, Clone)]
pub struct PtvClient {
    http: reqwest::Client,
    base_url: String,
    signer: RequestSigner,
    semaphore: Arc<Semaphore>,
}

impl PtvClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PtvConfig) -> Result<Self, PtvError> {
        if config.dev_id.is_empty() || config.api_key.is_empty() {
            return Err(PtvError::NotConfigured(
                "developer id and API key are required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer: RequestSigner::new(config.dev_id, config.api_key),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search for stops by name.
    pub async fn search_stops(
        &self,
        term: &str,
        route_types: &[RouteType],
    ) -> Result<SearchResults, PtvError> {
        let response: SearchResponse = self.get_json(&search_path(term, route_types)).await?;
        Ok(SearchResults {
            stops: convert_search_response(&response),
        })
    }

    /// Get upcoming departures from a stop.
    ///
    /// # Arguments
    ///
    /// * `stop_id` - Stop to query
    /// * `route_type` - Transport mode (0 for trains)
    /// * `max_results` - Departures to return per route/direction
    pub async fn get_departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        max_results: u32,
    ) -> Result<DeparturesResult, PtvError> {
        let response: DeparturesResponse = self
            .get_json(&departures_path(stop_id, route_type, max_results))
            .await?;
        Ok(convert_departures_response(&response))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PtvError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PtvError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.signer.signed_url(&self.base_url, path)?;
        debug!(path, "PTV request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PtvError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PtvError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| PtvError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl DataSource for PtvClient {
    fn search<'a>(
        &'a self,
        term: &'a str,
        route_types: &'a [RouteType],
    ) -> BoxFuture<'a, Result<SearchResults, PtvError>> {
        Box::pin(self.search_stops(term, route_types))
    }

    fn departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        limit: u32,
    ) -> BoxFuture<'_, Result<DeparturesResult, PtvError>> {
        Box::pin(self.get_departures(stop_id, route_type, limit))
    }
}

/// Unsigned path for a stop search.
pub fn search_path(term: &str, route_types: &[RouteType]) -> String {
    let mut path = format!("/v3/search/{}?", utf8_percent_encode(term, PATH_SEGMENT));
    if !route_types.is_empty() {
        let types: Vec<String> = route_types.iter().map(|t| t.to_string()).collect();
        path.push_str(&format!("route_types={}&", types.join(",")));
    }
    path.push_str("include_addresses=false&include_outlets=false");
    path
}

/// Unsigned path for a departures board.
pub fn departures_path(stop_id: StopId, route_type: RouteType, max_results: u32) -> String {
    format!(
        "/v3/departures/route_type/{route_type}/stop/{stop_id}?max_results={max_results}&expand={DEPARTURE_EXPAND}"
    )
}
