use crate::{CloudinaryConfig, CloudinarySink, MediaSink, SinkResult};
use std::sync::Arc;
use std::time::Duration;
use vidrelay_core::Config;

/// Create the media sink described by the configuration
pub fn create_media_sink(config: &Config) -> SinkResult<Arc<dyn MediaSink>> {
    let timeout = match config.cloudinary_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let sink = CloudinarySink::new(CloudinaryConfig {
        cloud_name: config.cloud_name.clone(),
        api_key: config.api_key.clone(),
        api_secret: config.api_secret.clone(),
        api_base: config.cloudinary_api_base.clone(),
        upload_folder: config.cloudinary_upload_folder.clone(),
        timeout,
    })?;

    tracing::info!(
        backend = sink.name(),
        cloud_name = %config.cloud_name,
        "Media sink configured"
    );

    Ok(Arc::new(sink))
}
