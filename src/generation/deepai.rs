// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DeepAI text2img provider

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use super::prompt::PromptStyle;
use super::provider::ImageProvider;
use super::types::{GenerationResult, ProviderRejection, ProviderRequest};

pub struct DeepAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct DeepAiResponse {
    output_url: Option<String>,
}

impl DeepAiProvider {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

#[async_trait]
impl ImageProvider for DeepAiProvider {
    async fn attempt_generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<GenerationResult, ProviderRejection> {
        let url = format!("{}/api/text2img", self.base_url);
        debug!("DeepAI generate POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header(header::USER_AGENT, &self.user_agent)
            .form(&[("text", request.prompt.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderRejection::BadStatus(status.as_u16()));
        }

        let body: DeepAiResponse = response.json().await?;
        let output_url = body
            .output_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ProviderRejection::MalformedResponse("no output_url".to_string()))?;

        Ok(GenerationResult {
            url: output_url,
            prompt: request.original_prompt.clone(),
            description: PromptStyle::Direct.describe(&request.original_prompt),
            note: None,
        })
    }

    fn name(&self) -> &str {
        "deepai"
    }
}
