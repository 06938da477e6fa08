use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_upload_form, validate_file_size};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidrelay_core::constants::UPLOAD_SUCCESS_MESSAGE;
use vidrelay_core::VideoRecord;
use vidrelay_storage::{ResourceType, UploadOptions};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: `video` (file, required), `title` (text, optional)"),
    responses(
        (status = 201, description = "Video uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file provided in the request", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Cloudinary or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let form = extract_upload_form(multipart?).await?;
    validate_file_size(form.video.len(), state.upload.max_video_size_bytes)?;

    let size = form.video.len();
    tracing::debug!(
        size,
        file_name = ?form.file_name,
        sink = state.sink.name(),
        "Forwarding video to media sink"
    );

    let options = UploadOptions::video().with_file_name(form.file_name);
    let media = state.sink.upload_stream(form.video, options).await?;

    tracing::debug!(
        public_id = %media.public_id,
        secure_url = %media.secure_url,
        "Media sink accepted video"
    );

    let record = VideoRecord::new(form.title, media.secure_url.clone());

    let id = match state.store.insert(&record).await {
        Ok(id) => id,
        Err(e) => {
            compensate_orphan(&state, media.public_id);
            return Err(HttpAppError::from(e));
        }
    };

    tracing::info!(
        video_id = %id,
        title = %record.title,
        video_url = %record.video_url,
        size,
        "Video uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        }),
    ))
}

/// The remote object exists but no record points at it. Remove it in the
/// background so the error response is not delayed.
fn compensate_orphan(state: &AppState, public_id: String) {
    if !state.upload.orphan_cleanup_enabled {
        tracing::error!(
            public_id = %public_id,
            "Record write failed after upload; remote object left orphaned"
        );
        return;
    }

    let sink = state.sink.clone();
    tokio::spawn(async move {
        match sink.delete(&public_id, ResourceType::Video).await {
            Ok(()) => {
                tracing::info!(public_id = %public_id, "Removed orphaned upload after record write failure");
            }
            Err(cleanup_err) => {
                tracing::warn!(
                    error = %cleanup_err,
                    public_id = %public_id,
                    "Failed to remove orphaned upload after record write failure"
                );
            }
        }
    });
}
