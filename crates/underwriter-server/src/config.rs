//! Server configuration

use serde::{Deserialize, Serialize};
use underwriter_core::ApplicationLimits;
use underwriter_runtime::RouterConfig;

/// Where underwriting results are persisted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process-local store (default)
    #[default]
    Memory,
    /// SQLite database
    Sql {
        /// Connection URL, e.g. `sqlite:underwriting.db`
        url: String,
    },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Log level
    pub log_level: String,

    /// Decisioning backend selection
    pub router: RouterConfig,

    /// Input limits checked before routing
    pub limits: ApplicationLimits,

    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            router: RouterConfig::default(),
            limits: ApplicationLimits::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Sources, later ones winning: defaults, `config/server.{yaml,toml,json}`,
    /// `UNDERWRITER_*` variables (`__` separates nested keys, e.g.
    /// `UNDERWRITER_ROUTER__MODE=http`). The legacy `AGENT_BRICKS_ENDPOINT`,
    /// `AGENT_BRICKS_API_KEY` and `DEBUG` variables are honoured last.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config = Self::load_from("config/server")?;
        Ok(config.with_legacy_env(|key| std::env::var(key).ok()))
    }

    /// Load from an optional config file (name without extension) layered
    /// under the `UNDERWRITER_*` variables
    ///
    /// A missing file falls back to defaults; a malformed one is an error.
    pub fn load_from(file: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("UNDERWRITER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// Apply the legacy environment variables
    ///
    /// The endpoint and key only fill values that are still unset.
    pub fn with_legacy_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.router.http.endpoint().is_none() {
            if let Some(endpoint) = non_empty("AGENT_BRICKS_ENDPOINT") {
                self.router.http.endpoint = Some(endpoint);
            }
        }
        if self.router.http.api_key.is_none() {
            if let Some(key) = non_empty("AGENT_BRICKS_API_KEY") {
                self.router.http.api_key = Some(key);
            }
        }
        if non_empty("DEBUG").map_or(false, |v| v.eq_ignore_ascii_case("true")) {
            self.log_level = "debug".to_string();
        }

        self
    }
}
