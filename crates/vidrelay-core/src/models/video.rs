use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::DEFAULT_VIDEO_TITLE;

/// A stored video: the caller-supplied title and the URL the media sink returned.
///
/// Records are created once per successful upload and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub title: String,
    pub video_url: String,
}

impl VideoRecord {
    /// Build a record from the request title and the sink's secure URL.
    ///
    /// A missing or empty title falls back to [`DEFAULT_VIDEO_TITLE`]. Any other
    /// title, and the URL, are kept byte for byte.
    pub fn new(title: Option<String>, video_url: impl Into<String>) -> Self {
        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_VIDEO_TITLE.to_string());
        Self {
            title,
            video_url: video_url.into(),
        }
    }
}
