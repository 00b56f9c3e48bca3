//! HTTP client for the study platform's monitoring endpoints.
//!
//! ```text
//! POST {api_url}/monitoring/start_session/       {"content_id": ...}  -> {"id": ...}
//! POST {api_url}/session-monitoring/             {"session_id", "event_type", "event_data"}
//! POST {api_url}/monitoring/{id}/track_event/    {"event_type", "data"}
//! POST {api_url}/monitoring/{id}/end_session/
//! ```
//!
//! `session-monitoring/` files events under a study session id. The
//! `monitoring/{id}/...` endpoints take the id returned by `start_session`;
//! the two id spaces are unrelated.

use crate::libs::config::ServerConfig;
use crate::libs::data_storage::{APP_NAME, APP_VERSION};
use crate::libs::event::MonitorEvent;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for a single request. Recording is best effort, so keep it short.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid auth token header")]
    InvalidToken,

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} returned no session id")]
    MissingSessionId { url: String },
}

/// Body of a recorded monitoring event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub session_id: String,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub event_data: serde_json::Value,
}

impl EventRecord {
    pub fn new(session_id: impl Into<String>, event_type: impl Into<String>, event_data: serde_json::Value) -> Self {
        Self {
            session_id: session_id.into(),
            event_type: event_type.into(),
            event_data,
        }
    }

    pub fn from_event(session_id: impl Into<String>, event: &MonitorEvent) -> Self {
        Self::new(session_id, event.kind.name(), event.data())
    }
}

#[derive(Deserialize)]
struct StartSessionResponse {
    id: Option<serde_json::Value>,
}

#[derive(Clone, Debug)]
pub struct MonitoringApi {
    client: Client,
    base_url: String,
}

impl MonitoringApi {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if !config.auth_token.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {}", config.auth_token)).map_err(|_| ApiError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post<T: Serialize + ?Sized>(&self, url: String, body: Option<&T>) -> Result<reqwest::Response, ApiError> {
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|source| ApiError::Request { url: url.clone(), source })?;
        if !response.status().is_success() {
            return Err(ApiError::Status { url, status: response.status() });
        }
        Ok(response)
    }

    /// Persists one monitoring event.
    pub async fn record_event(&self, record: &EventRecord) -> Result<StatusCode, ApiError> {
        let response = self.post(self.url("session-monitoring/"), Some(record)).await?;
        Ok(response.status())
    }

    /// Opens a server-side monitoring session for `content_id` and returns its id.
    pub async fn start_session(&self, content_id: &str) -> Result<String, ApiError> {
        let url = self.url("monitoring/start_session/");
        let response = self.post(url.clone(), Some(&serde_json::json!({ "content_id": content_id }))).await?;
        let body: StartSessionResponse = response.json().await.map_err(|source| ApiError::Request { url: url.clone(), source })?;

        match body.id {
            Some(serde_json::Value::String(id)) => Ok(id),
            Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
            _ => Err(ApiError::MissingSessionId { url }),
        }
    }

    /// Appends one event to a monitoring session opened with [`Self::start_session`].
    pub async fn track_event(&self, monitoring_id: &str, event_type: &str, data: &serde_json::Value) -> Result<StatusCode, ApiError> {
        let data = if data.is_null() { serde_json::json!({}) } else { data.clone() };
        let body = serde_json::json!({ "event_type": event_type, "data": data });
        let response = self.post(self.url(&format!("monitoring/{}/track_event/", monitoring_id)), Some(&body)).await?;
        Ok(response.status())
    }

    pub async fn end_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.post::<serde_json::Value>(self.url(&format!("monitoring/{}/end_session/", session_id)), None).await?;
        Ok(())
    }
}
