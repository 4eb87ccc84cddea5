// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod generation;
pub mod version;

pub use api::{create_app, start_server, ApiError, AppState};
pub use config::RelayConfig;
pub use generation::{
    GenerationMode, GenerationRequest, GenerationResult, ImageProvider, ProviderChain,
    ProviderRejection, ProviderRequest,
};
