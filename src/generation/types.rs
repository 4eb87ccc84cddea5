// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types shared by the request handler and the provider chain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Generation mode selected by the `mode` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    TextToImage,
    ImageEditing,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 2] = [GenerationMode::TextToImage, GenerationMode::ImageEditing];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::TextToImage => "text-to-image",
            GenerationMode::ImageEditing => "image-editing",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-to-image" => Ok(GenerationMode::TextToImage),
            "image-editing" => Ok(GenerationMode::ImageEditing),
            other => Err(format!("unknown generation mode '{}'", other)),
        }
    }
}

/// One reference image, either uploaded in the form or given as a URL
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Upload {
        bytes: Vec<u8>,
        /// Declared MIME type of the upload, if the client sent one
        content_type: Option<String>,
    },
    Url(String),
}

/// The two reference images required for image editing
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    pub first: ImageSource,
    pub second: ImageSource,
}

/// A validated generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    /// Prompt exactly as submitted
    pub prompt: String,
    /// Prompt after allow-list sanitization and truncation
    pub sanitized_prompt: String,
    /// Present only for image editing
    pub images: Option<ImagePair>,
}

/// What a provider sees for one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub mode: GenerationMode,
    pub original_prompt: String,
    pub prompt: String,
    /// First image as a remote URL or inline data URI
    pub base_reference: Option<String>,
}

impl ProviderRequest {
    /// Base reference if it points at a remote resource rather than inline data
    pub fn remote_reference(&self) -> Option<&str> {
        self.base_reference
            .as_deref()
            .filter(|r| r.starts_with("http://") || r.starts_with("https://"))
    }
}

/// Successful generation, serialized as the 200 response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Remote image URL or inline data URI
    pub url: String,
    /// The caller's original prompt
    pub prompt: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Why a single provider attempt was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderRejection {
    #[error("provider timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("provider returned HTTP {0}")]
    BadStatus(u16),

    #[error("unexpected content type: {}", .0.as_deref().unwrap_or("<none>"))]
    BadContentType(Option<String>),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider body exceeds {limit} bytes")]
    OversizedBody { limit: usize },
}

impl From<reqwest::Error> for ProviderRejection {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderRejection::Timeout
        } else if e.is_decode() || e.is_body() {
            ProviderRejection::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            ProviderRejection::BadStatus(status.as_u16())
        } else {
            ProviderRejection::ConnectionFailed(e.to_string())
        }
    }
}
