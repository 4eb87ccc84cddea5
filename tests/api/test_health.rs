// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for GET /health and route registration

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use fabstir_image_relay::{
    api::{create_app, AppState, HealthResponse},
    config::RelayConfig,
};
use tower::util::ServiceExt;

#[tokio::test]
async fn test_health_lists_provider_chains() {
    let mut config = RelayConfig::default();
    config.huggingface.api_key = Some("hf_test".to_string());
    let app = create_app(AppState::from_config(config).unwrap());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(
        health.text_to_image_providers,
        vec!["pollinations", "pollinations-backup", "huggingface"]
    );
    assert_eq!(
        health.image_editing_providers,
        vec!["pollinations-edit", "pollinations-artistic"]
    );
    assert!(!health.version.is_empty());
    assert!(health.features.iter().any(|f| f == "text-to-image"));
    assert!(health.features.iter().any(|f| f == "image-editing"));
}

#[tokio::test]
async fn test_health_hides_editing_when_disabled() {
    let config = RelayConfig {
        editing_enabled: false,
        ..RelayConfig::default()
    };
    let app = create_app(AppState::from_config(config).unwrap());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["imageEditingProviders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_route_rejects_get() {
    let app = create_app(AppState::from_config(RelayConfig::default()).unwrap());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/generate-image")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
