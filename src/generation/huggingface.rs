// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hugging Face Inference API provider
//!
//! Authenticated text-to-image backend. The API answers with raw image bytes,
//! which are relayed to the caller as an inline data URI.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::json;
use tracing::debug;

use super::data_uri::encode_data_uri;
use super::probe::{content_type, require_image};
use super::prompt::PromptStyle;
use super::provider::ImageProvider;
use super::types::{GenerationResult, ProviderRejection, ProviderRequest};

pub struct HuggingFaceProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    user_agent: String,
    max_image_bytes: usize,
}

impl HuggingFaceProvider {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            max_image_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Largest image body relayed back as a data URI
    pub fn with_max_image_bytes(mut self, limit: usize) -> Self {
        self.max_image_bytes = limit;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceProvider {
    async fn attempt_generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<GenerationResult, ProviderRejection> {
        let url = self.endpoint();
        debug!("Hugging Face generate POST {}", url);

        let mut response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "image/*")
            .json(&json!({ "inputs": request.prompt }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderRejection::BadStatus(status.as_u16()));
        }
        require_image(&response)?;

        let mime = content_type(&response)
            .and_then(|ct| ct.split(';').next().map(|m| m.trim().to_string()));

        let limit = self.max_image_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(ProviderRejection::OversizedBody { limit });
        }

        // Content-Length may be absent on chunked responses
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(ProviderRejection::OversizedBody { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        let data_uri = encode_data_uri(&bytes, mime.as_deref())
            .map_err(|e| ProviderRejection::MalformedResponse(e.to_string()))?;

        Ok(GenerationResult {
            url: data_uri,
            prompt: request.original_prompt.clone(),
            description: PromptStyle::Direct.describe(&request.original_prompt),
            note: None,
        })
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
