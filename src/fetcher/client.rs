// client.rs - the HTTP ratings transport
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::error::FetchError;
use super::types::{ActivityMode, FetchRequest, FetchResponse, Platform};

pub const DEFAULT_ENDPOINT: &str = "https://db-api.destinytracker.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const FETCH_PATH: &str = "/api/external/reviews/fetch";

/// A single network call for one batch of requests.
///
/// Implementations map every failure (connection, status, payload) to a
/// `FetchError`; the bulk fetcher decides what to do with it.
#[async_trait]
pub trait RatingsTransport: Send + Sync {
    async fn fetch_batch(
        &self,
        batch: &[FetchRequest],
        platform: Platform,
        mode: ActivityMode,
    ) -> Result<Vec<FetchResponse>, FetchError>;
}

pub struct HttpTransport {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Send `X-API-Key` with every request
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch_url(&self, platform: Platform, mode: ActivityMode) -> String {
        format!(
            "{}{}?platform={}&mode={}",
            self.endpoint,
            FETCH_PATH,
            platform.wire_value(),
            mode.wire_value()
        )
    }
}

#[async_trait]
impl RatingsTransport for HttpTransport {
    async fn fetch_batch(
        &self,
        batch: &[FetchRequest],
        platform: Platform,
        mode: ActivityMode,
    ) -> Result<Vec<FetchResponse>, FetchError> {
        let url = self.fetch_url(platform, mode);
        debug!(%url, items = batch.len(), "posting ratings batch");

        let mut request = self.http.post(&url).json(batch);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        // Decode separately so a bad payload is reported as such, not as a transport error
        let bytes = response.bytes().await?;
        let items: Vec<FetchResponse> = serde_json::from_slice(&bytes)?;
        Ok(items)
    }
}
