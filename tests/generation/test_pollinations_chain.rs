// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the configured Pollinations chains against a simulated provider

use fabstir_image_relay::config::{RelayConfig, SettlingDelays};
use fabstir_image_relay::generation::{
    GenerationMode, ProviderChain, ProviderRejection, ProviderRequest,
};
use httpmock::{Method::GET, MockServer};
use reqwest::Client;

fn config_for(server: &MockServer) -> RelayConfig {
    RelayConfig {
        pollinations_base_url: server.base_url(),
        settling_delays: SettlingDelays::none(),
        ..RelayConfig::default()
    }
}

fn request(mode: GenerationMode, prompt: &str, reference: Option<&str>) -> ProviderRequest {
    ProviderRequest {
        mode,
        original_prompt: prompt.to_string(),
        prompt: prompt.to_string(),
        base_reference: reference.map(str::to_string),
    }
}

#[tokio::test]
async fn test_primary_probe_success() {
    let server = MockServer::start_async().await;
    let primary = server
        .mock_async(|when, then| {
            when.method(GET)
                .query_param("width", "768")
                .query_param("model", "flux")
                .header("user-agent", fabstir_image_relay::config::DEFAULT_USER_AGENT);
            then.status(200).header("content-type", "image/jpeg").body("jpeg");
        })
        .await;
    let backup = server
        .mock_async(|when, then| {
            when.method(GET).query_param("width", "512");
            then.status(200).header("content-type", "image/jpeg").body("jpeg");
        })
        .await;

    let chain = ProviderChain::text_to_image(Client::new(), &config_for(&server));
    let result = chain
        .run(&request(GenerationMode::TextToImage, "a cat", None))
        .await
        .unwrap();

    assert!(result.url.starts_with(&server.base_url()));
    assert!(result.url.contains("/prompt/a%20cat?"));
    assert_eq!(result.description, "AI generated image: a cat");
    assert!(result.note.is_none());
    primary.assert_calls(1);
    backup.assert_calls(0);
}

#[tokio::test]
async fn test_non_image_primary_falls_back_to_backup() {
    let server = MockServer::start_async().await;
    let primary = server
        .mock_async(|when, then| {
            when.method(GET).query_param("width", "768");
            then.status(200).header("content-type", "text/html").body("<html/>");
        })
        .await;
    let backup = server
        .mock_async(|when, then| {
            when.method(GET).query_param("width", "512");
            then.status(200).header("content-type", "image/png").body("png");
        })
        .await;

    let chain = ProviderChain::text_to_image(Client::new(), &config_for(&server));
    let result = chain
        .run(&request(GenerationMode::TextToImage, "sunset", None))
        .await
        .unwrap();

    assert!(result.url.contains("width=512&height=512&nologo=true"));
    primary.assert_calls(1);
    backup.assert_calls(1);
}

#[tokio::test]
async fn test_all_pollinations_slots_failing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("width", "768");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).query_param("width", "512");
            then.status(200).header("content-type", "application/json").body("{}");
        })
        .await;

    let chain = ProviderChain::text_to_image(Client::new(), &config_for(&server));
    let exhausted = chain
        .run(&request(GenerationMode::TextToImage, "sunset", None))
        .await
        .unwrap_err();

    let reasons: Vec<_> = exhausted.attempts.iter().map(|a| a.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            ProviderRejection::BadStatus(500),
            ProviderRejection::BadContentType(Some("application/json".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_provider_is_connection_failure() {
    let config = RelayConfig {
        pollinations_base_url: "http://127.0.0.1:1".to_string(),
        settling_delays: SettlingDelays::none(),
        ..RelayConfig::default()
    };

    let chain = ProviderChain::text_to_image(Client::new(), &config);
    let exhausted = chain
        .run(&request(GenerationMode::TextToImage, "sunset", None))
        .await
        .unwrap_err();

    assert_eq!(exhausted.attempts.len(), 2);
    assert!(exhausted
        .attempts
        .iter()
        .all(|a| matches!(a.reason, ProviderRejection::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_edit_transform_success() {
    let server = MockServer::start_async().await;
    let edit = server
        .mock_async(|when, then| {
            when.method(GET)
                .query_param("model", "flux")
                .query_param("image", "https://x.test/a.png");
            then.status(200).header("content-type", "image/jpeg").body("jpeg");
        })
        .await;

    let chain = ProviderChain::image_editing(Client::new(), &config_for(&server));
    let result = chain
        .run(&request(
            GenerationMode::ImageEditing,
            "merge them",
            Some("https://x.test/a.png"),
        ))
        .await
        .unwrap();

    assert!(result.url.contains("Transform%20and%20edit%20this%20image"));
    assert_eq!(result.description, "AI edited image based on: merge them");
    assert!(result.note.is_none());
    edit.assert_calls(1);
}

#[tokio::test]
async fn test_failed_edit_degrades_to_artistic_composition() {
    let server = MockServer::start_async().await;
    let edit = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(503);
        })
        .await;

    let chain = ProviderChain::image_editing(Client::new(), &config_for(&server));
    let result = chain
        .run(&request(
            GenerationMode::ImageEditing,
            "merge them",
            Some("data:image/png;base64,AAAA"),
        ))
        .await
        .unwrap();

    assert!(result
        .url
        .contains("/prompt/Artistic%20composition%3A%20merge%20them?"));
    assert_eq!(
        result.description,
        "AI generated artistic composition: merge them"
    );
    assert!(result.note.unwrap().contains("artistic interpretation"));
    // Only the transform is probed; the fallback URL is returned unchecked
    edit.assert_calls(1);
}
