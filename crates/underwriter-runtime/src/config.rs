//! Decision router configuration
//!
//! Built once at process start and handed to the router by reference.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which decisioning backend the router should try first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// In-process underwriter supplied by the integrator
    Direct,
    /// External decisioning service over HTTP
    Http,
    /// Mock generator only
    #[default]
    Mock,
}

/// Request/response envelope spoken by the HTTP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Application object in, decision object out
    #[default]
    Plain,
    /// Model-serving envelope: `{"dataframe_records": [...]}` in,
    /// `{"predictions": [...]}` out
    Serving,
}

/// HTTP backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    /// Endpoint URL; the router falls back to the mock when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Header carrying the raw key; when unset the key is sent as
    /// `Authorization: Bearer <key>`
    #[serde(default)]
    pub api_key_header: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub format: WireFormat,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_key_header: None,
            timeout_secs: default_timeout_secs(),
            format: WireFormat::default(),
        }
    }
}

impl HttpBackendConfig {
    /// Request timeout; never shorter than one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Endpoint, ignoring blank values
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub mode: BackendMode,

    #[serde(default)]
    pub http: HttpBackendConfig,

    /// Upper bound for in-process underwriters, in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub direct_timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            http: HttpBackendConfig::default(),
            direct_timeout_secs: default_timeout_secs(),
        }
    }
}

impl RouterConfig {
    /// Mock-only configuration
    pub fn mock() -> Self {
        Self {
            mode: BackendMode::Mock,
            ..Self::default()
        }
    }

    /// In-process underwriter configuration
    pub fn direct() -> Self {
        Self {
            mode: BackendMode::Direct,
            ..Self::default()
        }
    }

    /// HTTP configuration for the given endpoint
    pub fn http(endpoint: impl Into<String>) -> Self {
        Self {
            mode: BackendMode::Http,
            http: HttpBackendConfig {
                endpoint: Some(endpoint.into()),
                ..HttpBackendConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.http.api_key = Some(api_key.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_direct_timeout(mut self, timeout: Duration) -> Self {
        self.direct_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_format(mut self, format: WireFormat) -> Self {
        self.http.format = format;
        self
    }

    /// In-process timeout; never shorter than one second
    pub fn direct_timeout(&self) -> Duration {
        Duration::from_secs(self.direct_timeout_secs.max(1))
    }
}
