//! Vidrelay Database Layer
//!
//! This crate owns the `videos` table: the repository that writes video records,
//! the trait the API depends on, and the embedded migrations.

pub mod db;
pub mod store_traits;

pub use db::migrations::run_migrations;
pub use db::VideoRepository;
pub use store_traits::VideoStore;
