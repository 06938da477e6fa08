//! Application state shared by every handler.
//!
//! Both collaborators sit behind traits so tests can swap in fakes without
//! touching Cloudinary or Postgres.

use std::sync::Arc;
use vidrelay_db::VideoStore;
use vidrelay_storage::MediaSink;

/// Upload limits and failure policy
#[derive(Debug, Clone, Copy)]
pub struct UploadSettings {
    pub max_video_size_bytes: usize,
    /// Delete the remote object when the record write fails.
    pub orphan_cleanup_enabled: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn MediaSink>,
    pub store: Arc<dyn VideoStore>,
    pub upload: UploadSettings,
}

impl AppState {
    pub fn new(
        sink: Arc<dyn MediaSink>,
        store: Arc<dyn VideoStore>,
        upload: UploadSettings,
    ) -> Self {
        Self {
            sink,
            store,
            upload,
        }
    }
}
