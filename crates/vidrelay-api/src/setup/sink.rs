//! Media sink setup

use anyhow::Result;
use std::sync::Arc;
use vidrelay_core::Config;
use vidrelay_storage::{create_media_sink, MediaSink};

pub fn setup_sink(config: &Config) -> Result<Arc<dyn MediaSink>> {
    let sink = create_media_sink(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize media sink: {}", e))?;
    tracing::info!(backend = sink.name(), "Media sink initialized successfully");
    Ok(sink)
}
