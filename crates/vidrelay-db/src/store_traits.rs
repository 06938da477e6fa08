//! Repository trait abstraction for the upload handler
//!
//! The handler only needs to insert records, so it depends on this trait rather
//! than on the Postgres repository, which lets tests substitute an in-memory store.

use async_trait::async_trait;
use uuid::Uuid;
use vidrelay_core::{AppError, VideoRecord};

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Persist one record and return its generated id.
    async fn insert(&self, record: &VideoRecord) -> Result<Uuid, AppError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
