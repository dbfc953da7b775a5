//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use crate::engine::UnderwritingEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(engine: Arc<UnderwritingEngine>) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/health", get(health))
        .route("/v1/underwrite", post(underwrite))
        .route("/v1/applications/:id", get(get_application))
        .route("/v1/analytics", get(analytics))
        .route("/v1/analytics/trends", get(trends))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
