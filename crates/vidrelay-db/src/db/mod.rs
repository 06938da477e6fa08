//! Database repositories and migrations

pub mod migrations;
pub mod video;

pub use video::VideoRepository;
