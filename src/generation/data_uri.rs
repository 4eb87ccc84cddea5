// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inline data URI encoding for uploaded images

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

/// MIME type assumed when an upload does not declare one
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUriError {
    #[error("image payload is empty")]
    Empty,

    #[error("invalid MIME type '{0}'")]
    InvalidMime(String),
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c)
}

fn is_valid_mime(mime: &str) -> bool {
    match mime.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !subtype.is_empty()
                && kind.chars().all(is_token_char)
                && subtype.chars().all(is_token_char)
        }
        None => false,
    }
}

/// Encode image bytes as `data:<mime>;base64,<payload>`.
///
/// An absent or blank declared type falls back to [`DEFAULT_IMAGE_MIME`].
pub fn encode_data_uri(bytes: &[u8], declared_mime: Option<&str>) -> Result<String, DataUriError> {
    if bytes.is_empty() {
        return Err(DataUriError::Empty);
    }

    let mime = declared_mime
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);

    if !is_valid_mime(mime) {
        return Err(DataUriError::InvalidMime(mime.to_string()));
    }

    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}
