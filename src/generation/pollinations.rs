// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pollinations.ai provider
//!
//! Pollinations renders an image for any `GET /prompt/{prompt}` URL, so a
//! provider attempt is: build the URL, wait for the settling delay, then
//! probe the URL to confirm an image comes back.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::probe::{probe, ProbeMethod};
use super::prompt::PromptStyle;
use super::provider::ImageProvider;
use super::types::{GenerationResult, ProviderRejection, ProviderRequest};
use crate::config::RelayConfig;

/// Query parameters appended to the prompt URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollinationsParams {
    pub width: u32,
    pub height: u32,
    pub nologo: bool,
    pub enhance: bool,
    pub model: Option<String>,
}

impl PollinationsParams {
    fn query(&self) -> String {
        let mut query = format!("width={}&height={}", self.width, self.height);
        if self.nologo {
            query.push_str("&nologo=true");
        }
        if self.enhance {
            query.push_str("&enhance=true");
        }
        if let Some(ref model) = self.model {
            query.push_str(&format!("&model={}", urlencoding::encode(model)));
        }
        query
    }
}

/// One Pollinations endpoint configuration in a provider chain
pub struct PollinationsProvider {
    name: String,
    client: Client,
    base_url: String,
    params: PollinationsParams,
    style: PromptStyle,
    settling_delay: Duration,
    probe: ProbeMethod,
    user_agent: String,
    forward_reference: bool,
}

impl PollinationsProvider {
    pub fn new(
        name: &str,
        client: Client,
        base_url: &str,
        params: PollinationsParams,
        style: PromptStyle,
    ) -> Self {
        Self {
            name: name.to_string(),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            params,
            style,
            settling_delay: Duration::ZERO,
            probe: ProbeMethod::Get,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            forward_reference: false,
        }
    }

    pub fn with_settling_delay(mut self, delay: Duration) -> Self {
        self.settling_delay = delay;
        self
    }

    pub fn with_probe(mut self, probe: ProbeMethod) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Pass a remote base reference through as the `image` parameter
    pub fn with_forwarded_reference(mut self, forward: bool) -> Self {
        self.forward_reference = forward;
        self
    }

    /// 768x768 flux render with prompt enhancement
    pub fn primary(client: Client, config: &RelayConfig) -> Self {
        Self::new(
            "pollinations",
            client,
            &config.pollinations_base_url,
            PollinationsParams {
                width: 768,
                height: 768,
                nologo: true,
                enhance: true,
                model: Some("flux".to_string()),
            },
            PromptStyle::Direct,
        )
        .with_settling_delay(config.settling_delays.primary)
        .with_user_agent(&config.user_agent)
    }

    /// Smaller default-model render
    pub fn backup(client: Client, config: &RelayConfig) -> Self {
        Self::new(
            "pollinations-backup",
            client,
            &config.pollinations_base_url,
            PollinationsParams {
                width: 512,
                height: 512,
                nologo: true,
                enhance: false,
                model: None,
            },
            PromptStyle::Direct,
        )
        .with_settling_delay(config.settling_delays.backup)
        .with_user_agent(&config.user_agent)
    }

    /// Direct image-editing transform
    pub fn edit_transform(client: Client, config: &RelayConfig) -> Self {
        Self::new(
            "pollinations-edit",
            client,
            &config.pollinations_base_url,
            PollinationsParams {
                width: 768,
                height: 768,
                nologo: true,
                enhance: true,
                model: Some("flux".to_string()),
            },
            PromptStyle::EditTransform,
        )
        .with_settling_delay(config.settling_delays.edit)
        .with_user_agent(&config.user_agent)
        .with_forwarded_reference(true)
    }

    /// Unprobed fresh generation used when an edit cannot be produced
    pub fn artistic_fallback(client: Client, config: &RelayConfig) -> Self {
        Self::new(
            "pollinations-artistic",
            client,
            &config.pollinations_base_url,
            PollinationsParams {
                width: 768,
                height: 768,
                nologo: true,
                enhance: true,
                model: None,
            },
            PromptStyle::ArtisticComposition,
        )
        .with_settling_delay(config.settling_delays.fallback)
        .with_user_agent(&config.user_agent)
        .with_probe(ProbeMethod::Skip)
    }

    /// Image URL this provider would serve for the request
    pub fn build_url(&self, request: &ProviderRequest) -> String {
        let prompt = self.style.render(&request.prompt);
        let mut url = format!(
            "{}/prompt/{}?{}",
            self.base_url,
            urlencoding::encode(&prompt),
            self.params.query()
        );
        if self.forward_reference {
            if let Some(reference) = request.remote_reference() {
                url.push_str(&format!("&image={}", urlencoding::encode(reference)));
            }
        }
        url
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn attempt_generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<GenerationResult, ProviderRejection> {
        let url = self.build_url(request);
        debug!("{}: waiting {:?} before probing {}", self.name, self.settling_delay, url);

        if !self.settling_delay.is_zero() {
            tokio::time::sleep(self.settling_delay).await;
        }

        probe(&self.client, &url, self.probe, &self.user_agent).await?;

        Ok(GenerationResult {
            url,
            prompt: request.original_prompt.clone(),
            description: self.style.describe(&request.original_prompt),
            note: self.style.note(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
