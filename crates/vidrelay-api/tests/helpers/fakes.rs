//! In-memory stand-ins for Cloudinary and Postgres.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;
use uuid::Uuid;
use vidrelay_core::{AppError, VideoRecord};
use vidrelay_db::VideoStore;
use vidrelay_storage::{
    MediaSink, ResourceType, SinkError, SinkResult, UploadOptions, UploadedMedia,
};

pub const FAKE_SECURE_URL: &str = "https://cdn.example/abc.mp4";
pub const FAKE_PUBLIC_ID: &str = "abc";

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub size: usize,
    pub file_name: Option<String>,
    pub resource_type: ResourceType,
}

/// Accepts every upload and answers with a fixed URL unless told to fail.
pub struct FakeSink {
    pub secure_url: String,
    pub fail_uploads: bool,
    pub fail_deletes: bool,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub deletes: Mutex<Vec<(String, ResourceType)>>,
}

impl Default for FakeSink {
    fn default() -> Self {
        Self {
            secure_url: FAKE_SECURE_URL.to_string(),
            fail_uploads: false,
            fail_deletes: false,
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSink {
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn returning(secure_url: &str) -> Self {
        Self {
            secure_url: secure_url.to_string(),
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(String, ResourceType)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSink for FakeSink {
    async fn upload_stream(&self, data: Bytes, options: UploadOptions) -> SinkResult<UploadedMedia> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            size: data.len(),
            file_name: options.file_name,
            resource_type: options.resource_type,
        });

        if self.fail_uploads {
            return Err(SinkError::Rejected {
                status: 401,
                message: "Invalid Signature".to_string(),
            });
        }

        Ok(UploadedMedia {
            secure_url: self.secure_url.clone(),
            public_id: FAKE_PUBLIC_ID.to_string(),
            bytes: Some(data.len() as u64),
            duration: Some(1.5),
        })
    }

    async fn delete(&self, public_id: &str, resource_type: ResourceType) -> SinkResult<()> {
        self.deletes
            .lock()
            .unwrap()
            .push((public_id.to_string(), resource_type));
        if self.fail_deletes {
            return Err(SinkError::DeleteFailed("Resource is locked".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Keeps inserted records in memory.
#[derive(Default)]
pub struct FakeStore {
    pub fail_inserts: bool,
    pub fail_ping: bool,
    pub records: Mutex<Vec<VideoRecord>>,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            fail_ping: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<VideoRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoStore for FakeStore {
    async fn insert(&self, record: &VideoRecord) -> Result<Uuid, AppError> {
        if self.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(Uuid::new_v4())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
