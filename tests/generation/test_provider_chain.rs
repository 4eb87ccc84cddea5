// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for ordered provider fallback

use async_trait::async_trait;
use fabstir_image_relay::generation::{
    GenerationMode, GenerationResult, ImageProvider, ProviderChain, ProviderRejection,
    ProviderRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct ScriptedProvider {
    name: &'static str,
    outcome: Result<String, ProviderRejection>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn ok(name: &'static str, url: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Ok(url.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(name: &'static str, reason: ProviderRejection) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome: Err(reason),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    async fn attempt_generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<GenerationResult, ProviderRejection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|url| GenerationResult {
            url,
            prompt: request.original_prompt.clone(),
            description: format!("from {}", self.name),
            note: None,
        })
    }

    fn name(&self) -> &str {
        self.name
    }
}

fn request() -> ProviderRequest {
    ProviderRequest {
        mode: GenerationMode::TextToImage,
        original_prompt: "a cat ".to_string(),
        prompt: "a cat".to_string(),
        base_reference: None,
    }
}

#[tokio::test]
async fn test_primary_success_short_circuits() {
    let primary = ScriptedProvider::ok("primary", "https://primary.test/a");
    let backup = ScriptedProvider::ok("backup", "https://backup.test/a");
    let chain = ProviderChain::new(vec![primary.clone(), backup.clone()]);

    let result = chain.run(&request()).await.unwrap();

    assert_eq!(result.url, "https://primary.test/a");
    assert_eq!(result.prompt, "a cat ");
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 0);
}

#[tokio::test]
async fn test_falls_through_to_first_success() {
    let primary = ScriptedProvider::failing("primary", ProviderRejection::BadStatus(500));
    let backup = ScriptedProvider::failing("backup", ProviderRejection::Timeout);
    let tertiary = ScriptedProvider::ok("tertiary", "https://tertiary.test/a");
    let last = ScriptedProvider::ok("last", "https://last.test/a");
    let chain = ProviderChain::new(vec![
        primary.clone(),
        backup.clone(),
        tertiary.clone(),
        last.clone(),
    ]);

    let result = chain.run(&request()).await.unwrap();

    assert_eq!(result.description, "from tertiary");
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 1);
    assert_eq!(tertiary.calls(), 1);
    assert_eq!(last.calls(), 0);
}

#[tokio::test]
async fn test_exhaustion_keeps_tagged_reasons_in_order() {
    let chain = ProviderChain::new(vec![
        ScriptedProvider::failing("primary", ProviderRejection::BadStatus(502)),
        ScriptedProvider::failing(
            "backup",
            ProviderRejection::BadContentType(Some("text/html".to_string())),
        ),
    ]);

    let exhausted = chain.run(&request()).await.unwrap_err();

    assert_eq!(exhausted.attempts.len(), 2);
    assert_eq!(exhausted.attempts[0].provider, "primary");
    assert_eq!(exhausted.attempts[0].reason, ProviderRejection::BadStatus(502));
    assert_eq!(exhausted.attempts[1].provider, "backup");
    assert!(matches!(
        exhausted.attempts[1].reason,
        ProviderRejection::BadContentType(_)
    ));
    assert!(exhausted.to_string().contains('2'));
}

#[tokio::test]
async fn test_empty_chain_is_exhausted() {
    let chain = ProviderChain::new(Vec::new());
    assert!(chain.is_empty());

    let exhausted = chain.run(&request()).await.unwrap_err();
    assert!(exhausted.attempts.is_empty());
}

#[tokio::test]
async fn test_each_run_restarts_from_primary() {
    let primary = ScriptedProvider::failing("primary", ProviderRejection::Timeout);
    let backup = ScriptedProvider::ok("backup", "https://backup.test/a");
    let chain = ProviderChain::new(vec![primary.clone(), backup.clone()]);

    chain.run(&request()).await.unwrap();
    chain.run(&request()).await.unwrap();

    assert_eq!(primary.calls(), 2);
    assert_eq!(backup.calls(), 2);
    assert_eq!(chain.provider_names(), vec!["primary", "backup"]);
}
