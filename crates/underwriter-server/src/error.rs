//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use underwriter_core::{CoreError, FieldIssue};
use underwriter_runtime::StoreError;

/// Server error type
#[derive(Error, Debug)]
pub enum ServerError {
    /// Malformed request (bad query, bad path parameter)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Application outside the accepted limits
    #[error("{0}")]
    InvalidApplication(#[from] CoreError),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Application store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) | ServerError::InvalidApplication(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Store(_) | ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn issues(&self) -> &[FieldIssue] {
        match self {
            ServerError::InvalidApplication(err) => err.issues(),
            _ => &[],
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let mut body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        if !self.issues().is_empty() {
            body["issues"] = json!(self.issues());
        }

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServerError::NotFound(format!("application {}", id)),
            other => ServerError::Store(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(err: ServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_invalid_request_display() {
        let err = ServerError::InvalidRequest("days must be between 1 and 365".to_string());
        assert_eq!(err.to_string(), "Invalid request: days must be between 1 and 365");
    }

    #[test]
    fn test_not_found_display() {
        let err = ServerError::NotFound("application abc".to_string());
        assert_eq!(err.to_string(), "Not found: application abc");
    }

    #[test]
    fn test_store_not_found_conversion() {
        let err: ServerError = StoreError::NotFound("abc".to_string()).into();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ServerError = StoreError::Serialization("bad row".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_error_conversion() {
        let err: ServerError = anyhow::anyhow!("something went wrong").into();
        assert!(err.to_string().contains("Internal error"));
        assert!(err.to_string().contains("something went wrong"));
    }

    #[tokio::test]
    async fn test_invalid_application_response_lists_issues() {
        let err = ServerError::from(CoreError::InvalidApplication(vec![FieldIssue::InvalidValue {
            field: "credit_score".to_string(),
            reason: "must be between 300 and 850".to_string(),
        }]));

        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(body["issues"][0]["field"], "credit_score");
        assert!(body["error"].as_str().unwrap().contains("credit_score"));
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let (status, body) = body_json(ServerError::NotFound("application x".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert!(body.get("issues").is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServerError>();
    }
}
