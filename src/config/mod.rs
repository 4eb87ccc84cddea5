// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relay configuration loaded from environment variables

use std::env;
use std::time::Duration;

pub const DEFAULT_POLLINATIONS_BASE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
pub const DEFAULT_DEEPAI_BASE_URL: &str = "https://api.deepai.org";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Maximum accepted request body (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fixed waits before each provider slot is probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlingDelays {
    /// Primary text-to-image provider
    pub primary: Duration,
    /// Direct image-editing transform
    pub edit: Duration,
    /// Backup text-to-image provider
    pub backup: Duration,
    /// Artistic composition fallback for failed edits
    pub fallback: Duration,
}

impl Default for SettlingDelays {
    fn default() -> Self {
        Self {
            primary: Duration::from_millis(1000),
            edit: Duration::from_millis(1500),
            backup: Duration::from_millis(500),
            fallback: Duration::from_millis(1000),
        }
    }
}

impl SettlingDelays {
    /// No waiting at all (tests and local mocks)
    pub fn none() -> Self {
        Self {
            primary: Duration::ZERO,
            edit: Duration::ZERO,
            backup: Duration::ZERO,
            fallback: Duration::ZERO,
        }
    }
}

/// Hugging Face Inference API settings; only used when a key is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// DeepAI settings; only used when a key is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Configuration for the image relay service
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Pollinations.ai endpoint root
    pub pollinations_base_url: String,
    pub huggingface: HuggingFaceConfig,
    pub deepai: DeepAiConfig,
    /// User-Agent sent with every provider request
    pub user_agent: String,
    /// Client-side timeout for a single provider request
    pub provider_timeout: Duration,
    pub settling_delays: SettlingDelays,
    /// Whether image-editing requests are served (501 otherwise)
    pub editing_enabled: bool,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };
        let defaults = SettlingDelays::default();

        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            pollinations_base_url: lookup("POLLINATIONS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_POLLINATIONS_BASE_URL.to_string()),
            huggingface: HuggingFaceConfig {
                api_key: non_empty(lookup("HUGGINGFACE_API_KEY")),
                base_url: lookup("HUGGINGFACE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_HUGGINGFACE_BASE_URL.to_string()),
                model: lookup("HUGGINGFACE_MODEL")
                    .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL.to_string()),
            },
            deepai: DeepAiConfig {
                api_key: non_empty(lookup("DEEPAI_API_KEY")),
                base_url: lookup("DEEPAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_DEEPAI_BASE_URL.to_string()),
            },
            user_agent: lookup("PROVIDER_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            provider_timeout: lookup("PROVIDER_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(120)),
            settling_delays: SettlingDelays {
                primary: millis("PRIMARY_SETTLE_MS", defaults.primary),
                edit: millis("EDIT_SETTLE_MS", defaults.edit),
                backup: millis("BACKUP_SETTLE_MS", defaults.backup),
                fallback: millis("FALLBACK_SETTLE_MS", defaults.fallback),
            },
            editing_enabled: lookup("IMAGE_EDITING_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
