// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{any::Any, net::SocketAddr, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use super::errors::ApiError;
use super::generate_image::generate_image_handler;
use crate::config::RelayConfig;
use crate::generation::{GenerationMode, ProviderChain};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub text_to_image: Arc<ProviderChain>,
    pub image_editing: Arc<ProviderChain>,
}

impl AppState {
    /// Build the provider chains described by the configuration
    pub fn from_config(config: RelayConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.provider_timeout).build()?;

        let text_to_image = ProviderChain::text_to_image(client.clone(), &config);
        let image_editing = ProviderChain::image_editing(client, &config);

        info!(
            "Provider chains configured: text-to-image={:?}, image-editing={:?}",
            text_to_image.provider_names(),
            image_editing.provider_names()
        );

        Ok(Self::with_chains(config, text_to_image, image_editing))
    }

    pub fn with_chains(
        config: RelayConfig,
        text_to_image: ProviderChain,
        image_editing: ProviderChain,
    ) -> Self {
        Self {
            config: Arc::new(config),
            text_to_image: Arc::new(text_to_image),
            image_editing: Arc::new(image_editing),
        }
    }

    pub fn chain_for(&self, mode: GenerationMode) -> &ProviderChain {
        match mode {
            GenerationMode::TextToImage => &self.text_to_image,
            GenerationMode::ImageEditing => &self.image_editing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub features: Vec<String>,
    pub text_to_image_providers: Vec<String>,
    pub image_editing_providers: Vec<String>,
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/generate-image", post(generate_image_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: RelayConfig) -> Result<()> {
    let addr: SocketAddr = config.listen_addr.parse()?;
    let app = create_app(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Image relay listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Image relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let editing_providers = if state.config.editing_enabled {
        state.image_editing.provider_names()
    } else {
        Vec::new()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::version::VERSION.to_string(),
        features: crate::version::FEATURES.iter().map(|f| f.to_string()).collect(),
        text_to_image_providers: state.text_to_image.provider_names(),
        image_editing_providers: editing_providers,
    })
}

/// Turn a handler panic into the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Unexpected error while handling request: {}", detail);
    ApiError::InternalError(detail).into_response()
}
