//! Application setup and initialization
//!
//! Everything `main` needs to turn a [`Config`] into a running router lives here.

pub mod database;
pub mod routes;
pub mod server;
pub mod sink;
pub mod validation;

use crate::state::{AppState, UploadSettings};
use anyhow::{Context, Result};
use std::sync::Arc;
use vidrelay_core::Config;
use vidrelay_db::VideoRepository;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration.
    // Warnings wait until telemetry is installed.
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );
    validation::log_config_warnings(&config);

    let pool = database::setup_database(&config)?;
    let sink = sink::setup_sink(&config)?;

    let state = Arc::new(AppState::new(
        sink,
        Arc::new(VideoRepository::new(pool)),
        UploadSettings {
            max_video_size_bytes: config.max_video_size_bytes,
            orphan_cleanup_enabled: config.orphan_cleanup_enabled,
        },
    ));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
