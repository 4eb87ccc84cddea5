// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image provider trait definition

use async_trait::async_trait;

use super::types::{GenerationResult, ProviderRejection, ProviderRequest};

/// Trait for implementing image generation providers
///
/// Providers are tried in order by a [`ProviderChain`](super::chain::ProviderChain);
/// a rejection moves the chain on to the next provider.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Attempt to produce an image for the request
    ///
    /// # Returns
    /// The generation result, or the reason this provider could not serve it
    async fn attempt_generate(
        &self,
        request: &ProviderRequest,
    ) -> Result<GenerationResult, ProviderRejection>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
