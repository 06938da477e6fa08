//! Media sink abstraction trait
//!
//! This module defines the MediaSink trait that every remote media host must implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Media sink operation errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// The provider answered with a non-success status.
    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response from media sink: {0}")]
    InvalidResponse(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Kind of resource the provider should store the payload as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Video,
    Raw,
    Auto,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
            ResourceType::Auto => "auto",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Per-upload options
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub resource_type: ResourceType,
    /// Filename reported to the provider, if the client sent one
    pub file_name: Option<String>,
}

impl UploadOptions {
    pub fn video() -> Self {
        Self {
            resource_type: ResourceType::Video,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }
}

/// What the provider reports after it has durably stored the payload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    /// Canonical public URL of the stored object
    pub secure_url: String,
    /// Provider identifier, needed to delete the object again
    pub public_id: String,
    pub bytes: Option<u64>,
    /// Duration in seconds, for video resources
    pub duration: Option<f64>,
}

/// Media sink abstraction trait
///
/// Implementations must only return `Ok` once the remote has accepted and stored
/// the payload; callers persist records pointing at `secure_url` on that basis.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Stream `data` to the provider and return where it ended up.
    async fn upload_stream(&self, data: Bytes, options: UploadOptions)
        -> SinkResult<UploadedMedia>;

    /// Delete a previously uploaded object. Deleting an unknown object is not an error.
    async fn delete(&self, public_id: &str, resource_type: ResourceType) -> SinkResult<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
