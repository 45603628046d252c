//! HTTP inference service - implementation of InferenceService over JSON POSTs.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpInferenceConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_api_key(key);
//!
//! let service = HttpInferenceService::new(config)?;
//! ```
//!
//! # Error mapping
//!
//! A body carrying an `error` field is a service error whatever the status.
//! Other non-success statuses are `Unavailable`; connection failures are
//! `Network`; client timeouts are `Timeout`; undecodable bodies are `Parse`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::dto::{diagnosis_from_value, RawStartResponse, RawStopResponse, RawTurnResponse};
use crate::config::ServiceConfig;
use crate::domain::foundation::SessionToken;
use crate::domain::interview::{StartResponse, StopResponse, TurnRequest, TurnResponse};
use crate::ports::{
    DiagnoseRequest, DiagnosisOutcome, InferenceError, InferenceService, StartRequest,
};

const DIAGNOSE: &str = "diagnose";
const START: &str = "start-detective";
const CONTINUE: &str = "continue-detective";
const STOP: &str = "stop-detective";

/// Configuration for the HTTP inference service.
#[derive(Debug, Clone)]
pub struct HttpInferenceConfig {
    /// Base URL (default: http://localhost:5000).
    pub base_url: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Client-level request timeout.
    pub timeout: Duration,
}

impl Default for HttpInferenceConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

impl HttpInferenceConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl From<&ServiceConfig> for HttpInferenceConfig {
    fn from(config: &ServiceConfig) -> Self {
        let http = Self::new(config.base_url.clone()).with_timeout(config.request_timeout());
        match &config.api_key {
            Some(key) => http.with_api_key(key.clone()),
            None => http,
        }
    }
}

/// Inference service reached over HTTP.
pub struct HttpInferenceService {
    config: HttpInferenceConfig,
    client: Client,
}

impl HttpInferenceService {
    /// Creates the service with a pooled client.
    pub fn new(config: HttpInferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// POSTs `body` and decodes the response into `R`.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, InferenceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(endpoint = path, "inference request");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| self.transport_error(path, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(path, e))?;

        if !status.is_success() {
            let err = classify_failure(status, &text);
            tracing::warn!(endpoint = path, status = status.as_u16(), error = %err, "inference request failed");
            return Err(err);
        }

        decode_success(path, &text)
    }

    fn transport_error(&self, path: &str, e: reqwest::Error) -> InferenceError {
        let err = if e.is_timeout() {
            InferenceError::timeout(self.config.timeout.as_secs())
        } else if e.is_connect() {
            InferenceError::network(format!("Connection failed: {}", e))
        } else {
            InferenceError::network(e.to_string())
        };
        tracing::error!(endpoint = path, error = %err, "inference transport failure");
        err
    }
}

/// Maps a non-success status and body to an error.
fn classify_failure(status: StatusCode, body: &str) -> InferenceError {
    let reported = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|s| !s.trim().is_empty());
    match reported {
        Some(message) => InferenceError::service(message),
        None => InferenceError::unavailable(status.as_u16(), body.trim()),
    }
}

/// Decodes a success body; anything undecodable is a `Parse` error.
fn decode_success<R: DeserializeOwned>(path: &str, body: &str) -> Result<R, InferenceError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(endpoint = path, error = %e, "undecodable inference response");
        InferenceError::parse(format!("Failed to parse {} response: {}", path, e))
    })
}

#[derive(Serialize)]
struct StopRequest<'a> {
    session_id: &'a SessionToken,
}

#[async_trait]
impl InferenceService for HttpInferenceService {
    async fn diagnose(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome, InferenceError> {
        let payload: Value = self.post(DIAGNOSE, &request).await?;
        diagnosis_from_value(payload)
    }

    async fn start_interview(&self, request: StartRequest) -> Result<StartResponse, InferenceError> {
        let raw: RawStartResponse = self.post(START, &request).await?;
        let start = raw.into_domain()?;
        tracing::debug!(session_id = %start.session_id, condition = %start.first.condition, "interview session opened");
        Ok(start)
    }

    async fn continue_interview(&self, request: TurnRequest) -> Result<TurnResponse, InferenceError> {
        let raw: RawTurnResponse = self.post(CONTINUE, &request).await?;
        raw.into_domain()
    }

    async fn stop_interview(&self, session_id: &SessionToken) -> Result<StopResponse, InferenceError> {
        let raw: RawStopResponse = self.post(STOP, &StopRequest { session_id }).await?;
        raw.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = HttpInferenceConfig::new("http://localhost:5000/");
        assert_eq!(config.endpoint(START), "http://localhost:5000/start-detective");
    }

    #[test]
    fn default_points_at_local_service() {
        let config = HttpInferenceConfig::default();
        assert_eq!(config.endpoint(DIAGNOSE), "http://localhost:5000/diagnose");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn error_body_is_service_error() {
        let err = classify_failure(StatusCode::BAD_REQUEST, r#"{"error": "Invalid session"}"#);
        assert_eq!(err, InferenceError::service("Invalid session"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn bare_failure_is_unavailable() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err, InferenceError::unavailable(502, "upstream down"));
        assert!(err.is_retryable());
    }

    #[test]
    fn undecodable_success_body_is_parse_error() {
        let err = decode_success::<RawTurnResponse>(CONTINUE, "<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, InferenceError::Parse(ref m) if m.starts_with("Failed to parse continue-detective response")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn truncated_success_body_is_parse_error() {
        let err = decode_success::<Value>(START, r#"{"session_id": "s1", "#).unwrap_err();
        assert!(matches!(err, InferenceError::Parse(_)));
    }

    #[test]
    fn decodable_success_body_passes_through() {
        let value: Value = decode_success(STOP, r#"{"total_questions": 3}"#).unwrap();
        assert_eq!(value["total_questions"], 3);
    }

    #[test]
    fn stop_request_serializes_session_id() {
        let token = SessionToken::new("s1").unwrap();
        let json = serde_json::to_value(StopRequest { session_id: &token }).unwrap();
        assert_eq!(json, serde_json::json!({"session_id": "s1"}));
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = HttpInferenceConfig::new("http://localhost:5000")
            .with_api_key(Secret::new("sk-live-123".to_string()));
        assert!(!format!("{:?}", config).contains("sk-live-123"));
    }

    #[test]
    fn converts_from_service_config() {
        let service = ServiceConfig {
            base_url: "https://scoring.example.com".to_string(),
            api_key: None,
            request_timeout_secs: 12,
        };
        let config = HttpInferenceConfig::from(&service);
        assert_eq!(config.endpoint(STOP), "https://scoring.example.com/stop-detective");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn service_builds_with_default_config() {
        assert!(HttpInferenceService::new(HttpInferenceConfig::default()).is_ok());
    }
}
