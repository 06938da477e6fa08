//! Wire-level constants of the upload endpoint.

/// Title persisted when the request carries no (or an empty) `title` field.
pub const DEFAULT_VIDEO_TITLE: &str = "Untitled Video";

/// Multipart field holding the video payload.
pub const VIDEO_FIELD: &str = "video";

/// Multipart field holding the optional title.
pub const TITLE_FIELD: &str = "title";

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Video uploaded successfully";
pub const NO_FILE_MESSAGE: &str = "No file provided in the request";
pub const SINK_UPLOAD_FAILED_MESSAGE: &str = "Error uploading to Cloudinary";
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading video";
