//! HTTP decision client
//!
//! Posts the application to an external decisioning service and reads the
//! decision payload back.
//!
//! # Wire formats
//!
//! ## plain
//!
//! Request body is the application object; the response body is the decision
//! object:
//!
//! ```json
//! {"decision": "approved", "approved_amount": 200000, "interest_rate": 5.5,
//!  "risk_score": 420, "reasoning": "...", "processing_time": 1.3}
//! ```
//!
//! ## serving
//!
//! For model-serving endpoints the application is wrapped as
//! `{"dataframe_records": [<application>]}` and the decision is read from
//! `predictions[0]` (or from the top-level object if `predictions` is absent).
//!
//! # Authentication
//!
//! The configured key is sent as `Authorization: Bearer {api_key}`, or raw in
//! a custom header when `api_key_header` is set.

use super::DecisionBackend;
use crate::config::{HttpBackendConfig, WireFormat};
use crate::error::{BackendError, BackendResult};
use async_trait::async_trait;
use reqwest::header::HeaderName;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use underwriter_core::{DecisionPayload, LoanApplication};

/// Longest error body kept in a status failure
const MAX_ERROR_BODY: usize = 512;

/// Client for an external decisioning service
pub struct HttpDecisionClient {
    /// HTTP client for making requests
    client: Client,

    endpoint: String,

    api_key: Option<String>,

    /// Custom header for the raw key; bearer auth when unset
    api_key_header: Option<HeaderName>,

    timeout: Duration,

    format: WireFormat,
}

impl HttpDecisionClient {
    /// Create a client for an endpoint with the default 30s timeout
    pub fn new(endpoint: impl Into<String>) -> BackendResult<Self> {
        Self::from_config(&HttpBackendConfig {
            endpoint: Some(endpoint.into()),
            ..HttpBackendConfig::default()
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotConfigured`] when no endpoint is set or the
    /// key header is not a valid header name, and [`BackendError::Transport`]
    /// if the HTTP client cannot be built.
    pub fn from_config(config: &HttpBackendConfig) -> BackendResult<Self> {
        let endpoint = config
            .endpoint()
            .ok_or_else(|| BackendError::NotConfigured("no HTTP endpoint configured".to_string()))?
            .to_string();
        let timeout = config.timeout();

        let api_key_header = match config.api_key_header.as_deref() {
            Some(name) => Some(HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                BackendError::NotConfigured(format!("invalid API key header '{}': {}", name, e))
            })?),
            None => None,
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            api_key_header,
            timeout,
            format: config.format,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request body for the configured wire format
    fn request_body(&self, application: &LoanApplication) -> BackendResult<Value> {
        let record = serde_json::to_value(application)
            .map_err(|e| BackendError::Transport(format!("Failed to encode application: {}", e)))?;

        Ok(match self.format {
            WireFormat::Plain => record,
            WireFormat::Serving => json!({ "dataframe_records": [record] }),
        })
    }

    /// Pull the decision payload out of a response body
    fn extract_payload(&self, body: Value) -> BackendResult<DecisionPayload> {
        let decision = match (self.format, body) {
            (WireFormat::Serving, Value::Object(mut fields)) if fields.contains_key("predictions") => {
                match fields.remove("predictions") {
                    Some(Value::Array(predictions)) => predictions.into_iter().next().ok_or_else(|| {
                        BackendError::Decode("response contained no predictions".to_string())
                    })?,
                    Some(other) => other,
                    None => Value::Null,
                }
            }
            (_, body) => body,
        };

        DecisionPayload::from_value(decision).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn send_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl DecisionBackend for HttpDecisionClient {
    async fn evaluate(&self, application: &LoanApplication) -> BackendResult<DecisionPayload> {
        let body = self.request_body(application)?;

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = match self.api_key_header {
                Some(ref header) => request.header(header.clone(), key.as_str()),
                None => request.bearer_auth(key),
            };
        }

        tracing::debug!("Calling decision endpoint: {}", self.endpoint);

        let response = request.send().await.map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY) {
                body.truncate(cut);
            }
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout)
            } else {
                BackendError::Decode(e.to_string())
            }
        })?;

        self.extract_payload(json)
    }

    fn name(&self) -> &str {
        "http"
    }
}
