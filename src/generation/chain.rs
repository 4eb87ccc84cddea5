// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ordered provider fallback chain
//!
//! Providers are attempted strictly in insertion order. The first accepted
//! result short-circuits the chain; every rejection is logged and swallowed.
//! Each request starts again from the first provider.

use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::deepai::DeepAiProvider;
use super::huggingface::HuggingFaceProvider;
use super::pollinations::PollinationsProvider;
use super::provider::ImageProvider;
use super::types::{GenerationResult, ProviderRejection, ProviderRequest};
use crate::config::RelayConfig;

/// A rejected attempt recorded while walking the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub provider: String,
    pub reason: ProviderRejection,
}

/// Every provider in the chain rejected the request
#[derive(Debug, Clone, Error)]
#[error("all {} image providers failed", .attempts.len())]
pub struct ChainExhausted {
    pub attempts: Vec<FailedAttempt>,
}

pub struct ProviderChain {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// Pollinations primary and backup, then the keyed backends that are configured
    pub fn text_to_image(client: Client, config: &RelayConfig) -> Self {
        let mut providers: Vec<Arc<dyn ImageProvider>> = vec![
            Arc::new(PollinationsProvider::primary(client.clone(), config)),
            Arc::new(PollinationsProvider::backup(client.clone(), config)),
        ];

        if let Some(ref api_key) = config.huggingface.api_key {
            providers.push(Arc::new(
                HuggingFaceProvider::new(
                    client.clone(),
                    &config.huggingface.base_url,
                    &config.huggingface.model,
                    api_key,
                )
                .with_user_agent(&config.user_agent)
                .with_max_image_bytes(config.max_upload_bytes),
            ));
            debug!("Hugging Face provider enabled");
        }

        if let Some(ref api_key) = config.deepai.api_key {
            providers.push(Arc::new(
                DeepAiProvider::new(client, &config.deepai.base_url, api_key)
                    .with_user_agent(&config.user_agent),
            ));
            debug!("DeepAI provider enabled");
        }

        Self::new(providers)
    }

    /// Direct transform, degrading to an artistic composition of the prompt
    pub fn image_editing(client: Client, config: &RelayConfig) -> Self {
        Self::new(vec![
            Arc::new(PollinationsProvider::edit_transform(client.clone(), config)),
            Arc::new(PollinationsProvider::artistic_fallback(client, config)),
        ])
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try each provider in order and return the first accepted result
    pub async fn run(&self, request: &ProviderRequest) -> Result<GenerationResult, ChainExhausted> {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            debug!("Trying image provider: {}", provider.name());

            match provider.attempt_generate(request).await {
                Ok(result) => {
                    info!(
                        "Image provider {} succeeded for {} in {}ms ({} earlier failures)",
                        provider.name(),
                        request.mode,
                        start.elapsed().as_millis(),
                        attempts.len()
                    );
                    return Ok(result);
                }
                Err(reason) => {
                    warn!(
                        "Image provider {} failed: {}, trying next",
                        provider.name(),
                        reason
                    );
                    attempts.push(FailedAttempt {
                        provider: provider.name().to_string(),
                        reason,
                    });
                }
            }
        }

        Err(ChainExhausted { attempts })
    }
}
