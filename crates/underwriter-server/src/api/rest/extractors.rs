//! Custom extractors
//!
//! JSON body extraction that answers every rejection with the server's
//! `{error, status}` body and a 400.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::json;

/// Custom JSON extractor with better error messages
pub struct JsonExtractor<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonExtractor<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let message = match rejection {
                    JsonRejection::JsonDataError(err) => format!("Invalid application: {}", err.body_text()),
                    JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err.body_text()),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing 'Content-Type: application/json' header".to_string()
                    }
                    other => format!("Failed to parse JSON: {}", other.body_text()),
                };
                tracing::debug!("Rejected request body: {}", message);

                Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": message,
                        "status": 400,
                    })),
                ))
            }
        }
    }
}
