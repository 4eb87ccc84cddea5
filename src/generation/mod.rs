// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation through third-party providers
//!
//! - Pollinations.ai URL renders (primary, backup, edit, artistic fallback)
//! - Hugging Face Inference API (when an API key is configured)
//! - DeepAI text2img (when an API key is configured)
//!
//! Providers are composed into an ordered [`ProviderChain`] per generation mode.

pub mod chain;
pub mod data_uri;
pub mod deepai;
pub mod huggingface;
pub mod pollinations;
pub mod probe;
pub mod prompt;
pub mod provider;
pub mod types;

pub use chain::{ChainExhausted, FailedAttempt, ProviderChain};
pub use data_uri::{encode_data_uri, DataUriError, DEFAULT_IMAGE_MIME};
pub use probe::ProbeMethod;
pub use prompt::{sanitize_prompt, PromptStyle, MAX_PROMPT_CHARS};
pub use provider::ImageProvider;
pub use types::{
    GenerationMode, GenerationRequest, GenerationResult, ImagePair, ImageSource,
    ProviderRejection, ProviderRequest,
};
