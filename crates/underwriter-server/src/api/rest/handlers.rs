//! API endpoint handlers

use super::extractors::JsonExtractor;
use super::types::*;
use crate::error::ServerError;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;
use underwriter_core::LoanApplication;
use underwriter_runtime::{AnalyticsSummary, ApplicationStore, BackendMode, DailyTrend, StoredApplication};

/// Health check endpoint
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mode = match state.engine.router().mode() {
        BackendMode::Direct => "direct",
        BackendMode::Http => "http",
        BackendMode::Mock => "mock",
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: mode.to_string(),
    })
}

/// Underwriting endpoint
#[axum::debug_handler]
pub(super) async fn underwrite(
    State(state): State<AppState>,
    JsonExtractor(application): JsonExtractor<LoanApplication>,
) -> Result<Json<UnderwriteResponse>, ServerError> {
    info!(
        "Received application: credit_score={}, loan_amount={}, purpose={}",
        application.credit_score, application.loan_amount, application.loan_purpose
    );

    let submission = state.engine.submit(&application).await?;
    let routed = submission.routed;

    Ok(Json(UnderwriteResponse {
        application_id: submission.application_id,
        decision: routed.result,
        source: routed.source,
        degraded: routed.degraded,
        fallback_reasons: routed.fallback_reasons,
        elapsed_ms: routed.elapsed.as_millis() as u64,
    }))
}

/// Stored application lookup
pub(super) async fn get_application(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<StoredApplication>, ServerError> {
    state
        .engine
        .store()
        .get(&application_id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("application {}", application_id)))
}

/// Dashboard summary
pub(super) async fn analytics(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>, ServerError> {
    let summary = state.engine.store().analytics(Utc::now()).await?;
    Ok(Json(summary))
}

/// Per-day application trends
pub(super) async fn trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Vec<DailyTrend>>, ServerError> {
    if query.days == 0 || query.days > MAX_TREND_DAYS {
        return Err(ServerError::InvalidRequest(format!(
            "days must be between 1 and {}",
            MAX_TREND_DAYS
        )));
    }

    let trends = state.engine.store().trends(query.days, Utc::now()).await?;
    Ok(Json(trends))
}
