//! Vidrelay API Library
//!
//! This crate provides the HTTP surface: the video upload handler, error rendering,
//! health probes and application setup.

mod api_doc;
mod handlers;
mod utils;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::video_upload::UploadResponse;
pub use state::{AppState, UploadSettings};
