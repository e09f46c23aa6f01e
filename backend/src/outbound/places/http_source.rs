//! HTTP client for the places-lookup service.
//!
//! Payloads stay raw `serde_json::Value`; the identity resolver owns shaping.
//! Failures are classified into [`PlacesSourceError`] variants by HTTP status
//! first, then by the `status` field the service embeds in its payloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::domain::PlaceId;
use crate::domain::ports::{PlacesSource, PlacesSourceError};

const BODY_PREVIEW_LIMIT: usize = 256;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the places service.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base endpoint, e.g. `https://maps.googleapis.com/maps/api/place/`.
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl PlacesConfig {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`PlacesSource`] backed by the service's REST endpoints.
pub struct PlacesHttpSource {
    client: Client,
    config: PlacesConfig,
}

impl PlacesHttpSource {
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesSourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| PlacesSourceError::Transport(error.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PlacesSourceError> {
        self.config
            .base_url
            .join(path)
            .map_err(|error| PlacesSourceError::InvalidRequest(error.to_string()))
    }

    async fn fetch(&self, url: Url, params: &[(&str, &str)]) -> Result<Value, PlacesSourceError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    PlacesSourceError::Timeout(error.to_string())
                } else {
                    PlacesSourceError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        let payload: Value = response
            .json()
            .await
            .map_err(|error| PlacesSourceError::Decode(error.to_string()))?;
        check_payload_status(&payload)?;
        Ok(payload)
    }
}

fn classify_status(status: StatusCode, body: &str) -> PlacesSourceError {
    let preview = body_preview(body);
    let message = format!("{status}: {preview}");
    match status {
        StatusCode::TOO_MANY_REQUESTS => PlacesSourceError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PlacesSourceError::Timeout(message)
        }
        status if status.is_client_error() => PlacesSourceError::InvalidRequest(message),
        _ => PlacesSourceError::Transport(message),
    }
}

/// The service reports most failures as a `status` string inside an HTTP 200.
fn check_payload_status(payload: &Value) -> Result<(), PlacesSourceError> {
    let Some(status) = payload.get("status").and_then(Value::as_str) else {
        return Ok(());
    };
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesSourceError::RateLimited(status.to_owned())),
        "REQUEST_DENIED" | "INVALID_REQUEST" => {
            let detail = payload
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or(status);
            Err(PlacesSourceError::InvalidRequest(detail.to_owned()))
        }
        other => Err(PlacesSourceError::Transport(format!(
            "unexpected upstream status {other}"
        ))),
    }
}

fn body_preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .map(|(index, _)| index)
        .find(|index| *index > BODY_PREVIEW_LIMIT)
        .unwrap_or(body.len());
    &body[..end]
}

#[async_trait]
impl PlacesSource for PlacesHttpSource {
    async fn search(&self, query: &str) -> Result<Vec<Value>, PlacesSourceError> {
        let url = self.endpoint("textsearch/json")?;
        let payload = self.fetch(url, &[("query", query)]).await?;
        let results = payload
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        debug!(query, count = results.len(), "places text search completed");
        Ok(results)
    }

    async fn details(&self, place_id: &PlaceId) -> Result<Option<Value>, PlacesSourceError> {
        let url = self.endpoint("details/json")?;
        let payload = self.fetch(url, &[("place_id", place_id.as_str())]).await?;
        Ok(payload.get("result").filter(|v| !v.is_null()).cloned())
    }
}
