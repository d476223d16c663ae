//! Router-level tests exercised with `tower::ServiceExt::oneshot`.
//!
//! These cover request validation and the static root endpoint, none of
//! which touch MongoDB or the AI backend.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use diagnosis_service::config::{
    AiConfig, DiagnosisConfig, GoogleConfig, ModelConfig, MongoConfig, ProviderBackend,
};
use diagnosis_service::services::providers::mock::MockTextProvider;
use diagnosis_service::services::{DiagnosisDb, DiagnosisService};
use diagnosis_service::startup::{router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

/// Build app state without requiring a reachable MongoDB: the driver only
/// parses the URI until the first operation, and none of these requests
/// reach the database.
async fn test_state() -> AppState {
    let config = DiagnosisConfig {
        common: service_core::config::Config { port: 0 },
        mongodb: MongoConfig {
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "diagnosis_router_test".to_string(),
        },
        models: ModelConfig {
            text_model: "gemini-2.0-flash".to_string(),
        },
        google: GoogleConfig {
            api_key: "test-key".to_string(),
        },
        ai: AiConfig {
            provider: ProviderBackend::Mock,
        },
    };

    let db = DiagnosisDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Failed to create lazy MongoDB handle");

    AppState {
        config,
        db,
        diagnosis: DiagnosisService::new(Arc::new(MockTextProvider::new(true))),
    }
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = router(test_state().await);

    let response = app
        .oneshot(Request::builder().uri("/api/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Remote Diagnosis App API");
}

#[tokio::test]
async fn missing_symptoms_is_rejected_with_422() {
    let app = router(test_state().await);

    let response = app
        .oneshot(json_post(
            "/api/diagnose",
            r#"{"patient_age": 45, "patient_gender": "female"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn wrong_type_symptoms_is_rejected_with_422() {
    let app = router(test_state().await);

    let response = app
        .oneshot(json_post("/api/diagnose", r#"{"symptoms": 42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_symptoms_is_rejected_with_422() {
    let app = router(test_state().await);

    let response = app
        .oneshot(json_post("/api/diagnose", r#"{"symptoms": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invalid_base64_image_is_rejected_with_400() {
    let app = router(test_state().await);

    let response = app
        .oneshot(json_post(
            "/api/diagnose",
            r#"{"symptoms": "rash on arm", "image_base64": "not base64!!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
