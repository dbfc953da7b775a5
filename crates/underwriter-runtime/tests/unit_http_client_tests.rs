//! Unit tests for HttpDecisionClient
//!
//! These tests use mockito to mock the external decisioning service.

mod common;

use common::{application, approved_body, closed_port_url};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use underwriter_runtime::{BackendError, DecisionBackend, HttpBackendConfig, HttpDecisionClient, WireFormat};

fn config(endpoint: String) -> HttpBackendConfig {
    HttpBackendConfig {
        endpoint: Some(endpoint),
        timeout_secs: 2,
        ..HttpBackendConfig::default()
    }
}

#[tokio::test]
async fn test_posts_application_and_reads_decision() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/decide")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "applicant_name": "Jordan Rivera",
            "credit_score": 750,
            "employment_type": "Full-time",
            "loan_purpose": "Home Purchase"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(approved_body().to_string())
        .create_async()
        .await;

    let client = HttpDecisionClient::new(format!("{}/decide", server.url())).unwrap();
    let payload = client.evaluate(&application(750, 25.0, 200_000.0)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload.get_str("decision"), Some("approved"));
    assert_eq!(payload.get_f64("approved_amount"), Some(200_000.0));
    assert_eq!(client.name(), "http");
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/decide")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(approved_body().to_string())
        .create_async()
        .await;

    let client = HttpDecisionClient::new(format!("{}/decide", server.url()))
        .unwrap()
        .with_api_key("secret-token");
    client.evaluate(&application(750, 25.0, 200_000.0)).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_sends_key_in_custom_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/decide")
        .match_header("x-api-key", "raw-key")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(approved_body().to_string())
        .create_async()
        .await;

    let client = HttpDecisionClient::from_config(&HttpBackendConfig {
        api_key: Some("raw-key".to_string()),
        api_key_header: Some("X-Api-Key".to_string()),
        ..config(format!("{}/decide", server.url()))
    })
    .unwrap();
    client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_typed_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/decide")
        .with_status(503)
        .with_body("model warming up")
        .create_async()
        .await;

    let client = HttpDecisionClient::from_config(&config(format!("{}/decide", server.url()))).unwrap();
    let err = client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap_err();

    assert_eq!(
        err,
        BackendError::Status {
            status: 503,
            body: "model warming up".to_string()
        }
    );
}

#[tokio::test]
async fn test_client_error_status_is_typed_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/decide")
        .with_status(401)
        .create_async()
        .await;

    let client = HttpDecisionClient::from_config(&config(format!("{}/decide", server.url()))).unwrap();
    let err = client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap_err();

    assert!(matches!(err, BackendError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/decide")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"decision\": \"approved\",")
        .create_async()
        .await;

    let client = HttpDecisionClient::from_config(&config(format!("{}/decide", server.url()))).unwrap();
    let err = client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap_err();

    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_serving_format_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/serving-endpoints/underwriter/invocations")
        .match_body(Matcher::PartialJson(json!({
            "dataframe_records": [{"credit_score": 720}]
        })))
        .with_status(200)
        .with_body(json!({"predictions": [approved_body()]}).to_string())
        .create_async()
        .await;

    let client = HttpDecisionClient::from_config(&HttpBackendConfig {
        format: WireFormat::Serving,
        ..config(format!("{}/serving-endpoints/underwriter/invocations", server.url()))
    })
    .unwrap();
    let payload = client.evaluate(&application(720, 28.0, 200_000.0)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload.get_str("reasoning"), Some("Strong credit history and low debt burden"));
}

#[tokio::test]
async fn test_connection_refused_is_typed_failure() {
    let client = HttpDecisionClient::from_config(&config(closed_port_url())).unwrap();
    let err = client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap_err();

    assert!(
        matches!(err, BackendError::Connect(_) | BackendError::Transport(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_unresponsive_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = HttpDecisionClient::from_config(&HttpBackendConfig {
        timeout_secs: 1,
        ..config(format!("http://{}/decide", addr))
    })
    .unwrap();

    let started = std::time::Instant::now();
    let err = client.evaluate(&application(700, 30.0, 50_000.0)).await.unwrap_err();

    assert_eq!(err, BackendError::Timeout(Duration::from_secs(1)));
    assert!(started.elapsed() < Duration::from_secs(5));
}
