use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidrelay_core::{AppError, VideoRecord};

use crate::store_traits::VideoStore;

/// Repository for video records
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "videos", db.operation = "insert"))]
    async fn insert(&self, record: &VideoRecord) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO videos (id, title, video_url)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.title)
        .bind(&record.video_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(video_id = %id, "Video record inserted");
        Ok(id)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
