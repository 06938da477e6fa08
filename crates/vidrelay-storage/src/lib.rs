//! Vidrelay Storage Library
//!
//! This crate provides the media sink abstraction: the remote service that accepts
//! uploaded video bytes and hands back a public URL. The only backend is Cloudinary.

pub mod cloudinary;
pub mod factory;
pub mod traits;

// Re-export commonly used types
pub use cloudinary::{CloudinaryConfig, CloudinarySink};
pub use factory::create_media_sink;
pub use traits::{MediaSink, ResourceType, SinkError, SinkResult, UploadOptions, UploadedMedia};
