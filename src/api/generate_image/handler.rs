// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use tracing::{debug, info, warn};

use super::request::{provider_request, GenerateImageForm};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::generation::{GenerationMode, GenerationResult};

/// POST /api/generate-image - Generate or edit an image
///
/// Pipeline:
/// 1. Read the multipart form (500 if the body is malformed)
/// 2. Validate mode, prompt and image pair (400)
/// 3. Refuse image editing when disabled (501)
/// 4. Build the provider request, encoding an uploaded base image (400 on failure)
/// 5. Walk the provider chain for the mode (503 when exhausted)
pub async fn generate_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!("Image generation request is not multipart: {}", e);
        ApiError::ValidationError {
            message: "Mode and prompt are required".to_string(),
            details: Some("Submit the request as multipart/form-data".to_string()),
        }
    })?;

    // 1. Read form
    let form = GenerateImageForm::from_multipart(multipart).await?;
    debug!(
        "Image generation request received: mode={:?}, prompt_len={}",
        form.mode,
        form.prompt.as_deref().map(str::len).unwrap_or(0)
    );

    // 2. Validate
    let request = form.validate().map_err(|e| {
        warn!("Image generation validation failed: {}", e);
        e
    })?;

    // 3. Mode availability
    if request.mode == GenerationMode::ImageEditing && !state.config.editing_enabled {
        warn!("Image editing requested but disabled");
        return Err(ApiError::NotImplemented(
            "Image editing is not available on this server. Use 'text-to-image'".to_string(),
        ));
    }

    // 4. Provider request
    let provider_request = provider_request(&request)?;
    debug!("Sanitized prompt: {}", provider_request.prompt);

    // 5. Provider chain
    let chain = state.chain_for(request.mode);
    match chain.run(&provider_request).await {
        Ok(result) => {
            info!("Image generated for {} request", request.mode);
            Ok(Json(result))
        }
        Err(exhausted) => {
            for attempt in &exhausted.attempts {
                warn!("  {} rejected: {}", attempt.provider, attempt.reason);
            }
            warn!("{}, returning service unavailable", exhausted);
            Err(ApiError::providers_exhausted())
        }
    }
}
