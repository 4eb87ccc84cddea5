// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation API endpoint module
//!
//! Provides POST /api/generate-image for text-to-image and image editing.

pub mod handler;
pub mod request;

pub use handler::generate_image_handler;
pub use request::{base_reference, provider_request, GenerateImageForm, UploadedImage};
