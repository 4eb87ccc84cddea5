// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_image_relay::{api::start_server, config::RelayConfig, version};
use std::env;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    let dotenv_result = dotenv::dotenv();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenv_result {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    info!("Starting {}", version::get_version_string());

    let config = RelayConfig::from_env();
    info!(
        "Configuration: listen_addr={}, editing_enabled={}, huggingface={}, deepai={}",
        config.listen_addr,
        config.editing_enabled,
        config.huggingface.api_key.is_some(),
        config.deepai.api_key.is_some()
    );

    start_server(config).await
}
