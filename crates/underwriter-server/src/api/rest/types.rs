//! REST API type definitions

use crate::engine::UnderwritingEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use underwriter_core::DecisionResult;
use underwriter_runtime::{DecisionSource, FallbackReason};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<UnderwritingEngine>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Configured decisioning backend
    pub mode: String,
}

/// Response to `POST /v1/underwrite`
#[derive(Debug, Serialize, Deserialize)]
pub struct UnderwriteResponse {
    pub application_id: String,

    pub decision: DecisionResult,

    pub source: DecisionSource,

    /// True when the mock stood in for the configured backend
    pub degraded: bool,

    #[serde(default)]
    pub fallback_reasons: Vec<FallbackReason>,

    pub elapsed_ms: u64,
}

/// Query for `GET /v1/analytics/trends`
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Number of days to cover (default: 30)
    #[serde(default = "default_trend_days")]
    pub days: u32,
}

pub(crate) const MAX_TREND_DAYS: u32 = 365;

fn default_trend_days() -> u32 {
    30
}
