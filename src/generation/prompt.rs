// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt sanitization and per-provider prompt styles

/// Maximum sanitized prompt length in characters
pub const MAX_PROMPT_CHARS: usize = 200;

/// Punctuation kept by the sanitizer in addition to letters, digits and whitespace
const ALLOWED_PUNCTUATION: &[char] = &['-', '.', ',', '!', '?'];

const ARTISTIC_NOTE: &str =
    "Generated as artistic interpretation due to image processing limitations";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}

/// Sanitize a user prompt for embedding in provider URLs.
///
/// Characters outside the allow-list become spaces, the result is trimmed and
/// cut to [`MAX_PROMPT_CHARS`] characters.
pub fn sanitize_prompt(prompt: &str) -> String {
    let replaced: String = prompt
        .chars()
        .map(|c| if is_allowed(c) { c } else { ' ' })
        .collect();

    replaced
        .trim()
        .chars()
        .take(MAX_PROMPT_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// How a provider phrases the sanitized prompt and describes its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Prompt passed through unchanged
    Direct,
    /// Image-editing transform request
    EditTransform,
    /// Fresh generation standing in for a failed edit
    ArtisticComposition,
}

impl PromptStyle {
    /// Text sent to the provider
    pub fn render(&self, sanitized: &str) -> String {
        match self {
            PromptStyle::Direct => sanitized.to_string(),
            PromptStyle::EditTransform => format!(
                "Transform and edit this image: {}. Create a cohesive artistic composition \
                 combining elements from both provided images.",
                sanitized
            ),
            PromptStyle::ArtisticComposition => format!("Artistic composition: {}", sanitized),
        }
    }

    /// Human readable description returned to the caller
    pub fn describe(&self, original: &str) -> String {
        match self {
            PromptStyle::Direct => format!("AI generated image: {}", original),
            PromptStyle::EditTransform => format!("AI edited image based on: {}", original),
            PromptStyle::ArtisticComposition => {
                format!("AI generated artistic composition: {}", original)
            }
        }
    }

    pub fn note(&self) -> Option<String> {
        match self {
            PromptStyle::ArtisticComposition => Some(ARTISTIC_NOTE.to_string()),
            _ => None,
        }
    }
}
