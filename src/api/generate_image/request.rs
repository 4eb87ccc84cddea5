// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation form parsing and validation

use axum::http::StatusCode;
use axum_extra::extract::{multipart::MultipartError, Multipart};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

use crate::api::errors::ApiError;
use crate::generation::{
    encode_data_uri, sanitize_prompt, GenerationMode, GenerationRequest, ImagePair, ImageSource,
    ProviderRequest,
};

/// An uploaded file part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Raw form submitted to POST /api/generate-image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateImageForm {
    pub mode: Option<String>,
    pub prompt: Option<String>,
    pub image1: Option<UploadedImage>,
    pub image2: Option<UploadedImage>,
    pub image1_url: Option<String>,
    pub image2_url: Option<String>,
}

fn processing_failed() -> ApiError {
    ApiError::ProcessingError {
        message: "Failed to process uploaded image".to_string(),
        details: Some("Please try with different images or use URLs instead".to_string()),
    }
}

fn upload_too_large() -> ApiError {
    ApiError::ProcessingError {
        message: "Upload exceeds the size limit".to_string(),
        details: Some("Please try with different images or use URLs instead".to_string()),
    }
}

fn images_required() -> ApiError {
    ApiError::ValidationError {
        message: "Images required for image editing".to_string(),
        details: Some("Please provide two images either as files or URLs".to_string()),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn validate_image_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(trimmed.to_string()),
        _ => Err(ApiError::ValidationError {
            message: "Invalid image URL".to_string(),
            details: Some(format!("'{}' is not an http(s) URL", trimmed)),
        }),
    }
}

/// Map a multipart read failure; an oversized body is the client's fault
fn multipart_failure(error: MultipartError, image_part: bool) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Multipart body exceeds the upload limit: {}", error);
        return upload_too_large();
    }
    if image_part {
        warn!("Failed to read uploaded image: {}", error);
        processing_failed()
    } else {
        warn!("Malformed multipart body: {}", error);
        ApiError::InternalError(format!("malformed multipart body: {}", error))
    }
}

impl GenerateImageForm {
    /// Read every part of the multipart body.
    ///
    /// Only the first occurrence of a field is kept. A part that cannot be
    /// read is a processing error when it carries an image or exceeds the
    /// upload limit, and an internal error otherwise.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        let mut seen = HashSet::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_failure(e, false))?
        {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "image1" | "image2" | "mode" | "prompt" | "image1Url" | "image2Url"
                    if !seen.insert(name.clone()) =>
                {
                    debug!("Ignoring repeated form field '{}'", name);
                }
                "image1" | "image2" => {
                    let content_type = field.content_type().map(str::to_string);
                    let file_name = field
                        .file_name()
                        .map(str::to_string)
                        .filter(|n| !n.is_empty());
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_failure(e, true))?;

                    // Browsers send an empty unnamed part for an untouched file input
                    if bytes.is_empty() && file_name.is_none() {
                        continue;
                    }

                    let upload = UploadedImage {
                        bytes: bytes.to_vec(),
                        content_type,
                        file_name,
                    };
                    if name == "image1" {
                        form.image1 = Some(upload);
                    } else {
                        form.image2 = Some(upload);
                    }
                }
                "mode" | "prompt" | "image1Url" | "image2Url" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| multipart_failure(e, false))?;
                    let value = non_empty(value);
                    match name.as_str() {
                        "mode" => form.mode = value,
                        "prompt" => form.prompt = value,
                        "image1Url" => form.image1_url = value,
                        _ => form.image2_url = value,
                    }
                }
                other => debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }

    /// Validate the form into a generation request
    pub fn validate(self) -> Result<GenerationRequest, ApiError> {
        let (mode, prompt) = match (self.mode, self.prompt) {
            (Some(mode), Some(prompt)) => (mode, prompt),
            _ => return Err(ApiError::validation("Mode and prompt are required")),
        };

        let mode = mode.parse::<GenerationMode>().map_err(|_| {
            ApiError::validation("Invalid mode. Must be 'text-to-image' or 'image-editing'")
        })?;

        let sanitized_prompt = sanitize_prompt(&prompt);
        if sanitized_prompt.is_empty() {
            return Err(ApiError::ValidationError {
                message: "Prompt contains no usable characters".to_string(),
                details: Some("Use letters, digits and basic punctuation".to_string()),
            });
        }

        let images = match mode {
            GenerationMode::TextToImage => None,
            GenerationMode::ImageEditing => Some(
                match (self.image1_url, self.image2_url, self.image1, self.image2) {
                    (Some(first), Some(second), _, _) => ImagePair {
                        first: ImageSource::Url(validate_image_url(&first)?),
                        second: ImageSource::Url(validate_image_url(&second)?),
                    },
                    (_, _, Some(first), Some(second)) => ImagePair {
                        first: ImageSource::Upload {
                            bytes: first.bytes,
                            content_type: first.content_type,
                        },
                        second: ImageSource::Upload {
                            bytes: second.bytes,
                            content_type: second.content_type,
                        },
                    },
                    _ => return Err(images_required()),
                },
            ),
        };

        Ok(GenerationRequest {
            mode,
            prompt,
            sanitized_prompt,
            images,
        })
    }
}

/// Base reference for the providers: the first image's URL, or the first
/// upload encoded as an inline data URI
pub fn base_reference(request: &GenerationRequest) -> Result<Option<String>, ApiError> {
    let Some(ref images) = request.images else {
        return Ok(None);
    };

    match images.first {
        ImageSource::Url(ref url) => Ok(Some(url.clone())),
        ImageSource::Upload {
            ref bytes,
            ref content_type,
        } => encode_data_uri(bytes, content_type.as_deref())
            .map(Some)
            .map_err(|e| {
                warn!("Error processing uploaded image: {}", e);
                processing_failed()
            }),
    }
}

/// Build what the provider chain sees for this request
pub fn provider_request(request: &GenerationRequest) -> Result<ProviderRequest, ApiError> {
    Ok(ProviderRequest {
        mode: request.mode,
        original_prompt: request.prompt.clone(),
        prompt: request.sanitized_prompt.clone(),
        base_reference: base_reference(request)?,
    })
}
