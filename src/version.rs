// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Image Relay

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-provider-chain-2026-10-17";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "text-to-image",
    "image-editing",
    "pollinations",
    "huggingface-inference",
    "deepai",
    "inline-data-uri",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Image Relay {} ({})", VERSION_NUMBER, BUILD_DATE)
}
