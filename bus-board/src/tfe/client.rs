//! TfE HTTP client.
//!
//! Fetches stop times and stop route details from the Transport for
//! Edinburgh website API and converts them to domain types.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RawDeparture, RouteMeta, StopId};
use crate::source::{DepartureSource, SourceError};

use super::convert::{convert_stop_routes, convert_stop_times};
use super::error::TfeError;
use super::types::{StopResponse, StopTimesResponse};

/// Default base URL for the TfE website API.
const DEFAULT_BASE_URL: &str = "https://tfeapp.com/api/website";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the TfE client.
#[derive(Debug, Clone)]
pub struct TfeConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TfeConfig {
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

impl Default for TfeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

/// TfE API client.
///
/// Uses a semaphore to limit concurrent requests so a board with many
/// stops does not hammer the upstream.
#[derive(Debug, Clone)]
pub struct TfeClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TfeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TfeConfig) -> Result<Self, TfeError> {
        if config.max_concurrent == 0 {
            return Err(TfeError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Upcoming departures at a stop, flattened across services.
    ///
    /// Malformed departures are dropped (and logged) rather than failing
    /// the whole stop.
    pub async fn get_stop_times(&self, stop: &StopId) -> Result<Vec<RawDeparture>, TfeError> {
        let resp: StopTimesResponse = self
            .get_json("stop_times.php", &[("stop_id", stop.as_str())])
            .await?;

        let departures = convert_stop_times(&resp);
        debug!(stop = %stop, count = departures.len(), "Fetched stop times");
        Ok(departures)
    }

    /// Route colours for the services at a stop.
    pub async fn get_stop_routes(&self, stop: &StopId) -> Result<RouteMeta, TfeError> {
        let resp: StopResponse = self.get_json("stop.php", &[("id", stop.as_str())]).await?;

        let meta = convert_stop_routes(&resp);
        debug!(stop = %stop, routes = meta.len(), "Fetched stop routes");
        Ok(meta)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TfeError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TfeError::NotConfigured("semaphore closed".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TfeError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TfeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TfeError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl DepartureSource for TfeClient {
    async fn departures(&self, stop: &StopId) -> Result<Arc<Vec<RawDeparture>>, SourceError> {
        self.get_stop_times(stop)
            .await
            .map(Arc::new)
            .map_err(|e| SourceError::Upstream {
                stop: stop.clone(),
                message: e.to_string(),
            })
    }

    async fn route_meta(&self, stop: &StopId) -> Result<Arc<RouteMeta>, SourceError> {
        self.get_stop_routes(stop)
            .await
            .map(Arc::new)
            .map_err(|e| SourceError::Upstream {
                stop: stop.clone(),
                message: e.to_string(),
            })
    }
}
