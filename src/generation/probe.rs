// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Validation probes against generated image URLs

use reqwest::{header, Client, Response};
use tracing::debug;

use super::types::ProviderRejection;

/// How a provider's URL is checked before it is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    /// GET; requires a success status and an image content type
    Get,
    /// URL is returned without being checked
    Skip,
}

/// Content type of a response, if present and readable
pub fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Reject unless the response declares an image body
pub fn require_image(response: &Response) -> Result<(), ProviderRejection> {
    let content_type = content_type(response);
    match content_type {
        Some(ref ct) if ct.to_ascii_lowercase().contains("image") => Ok(()),
        other => Err(ProviderRejection::BadContentType(other)),
    }
}

/// Probe `url` with a browser-like `User-Agent`
pub async fn probe(
    client: &Client,
    url: &str,
    method: ProbeMethod,
    user_agent: &str,
) -> Result<(), ProviderRejection> {
    let request = match method {
        ProbeMethod::Get => client.get(url),
        ProbeMethod::Skip => return Ok(()),
    };

    debug!("Probing {:?} {}", method, url);

    let response = request
        .header(header::USER_AGENT, user_agent)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderRejection::BadStatus(status.as_u16()));
    }

    require_image(&response)
}
