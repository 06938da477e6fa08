//! Multipart parsing for the upload endpoint

use crate::error::multipart_error;
use axum::extract::Multipart;
use bytes::Bytes;
use vidrelay_core::constants::{TITLE_FIELD, VIDEO_FIELD};
use vidrelay_core::AppError;

/// The parts of an upload request the handler cares about
#[derive(Debug)]
pub struct UploadForm {
    pub video: Bytes,
    pub file_name: Option<String>,
    pub title: Option<String>,
}

/// Read the whole multipart body.
///
/// Exactly one `video` file part is accepted. A zero-length video, or a `video`
/// part without a filename, counts as no video.
/// Unknown fields are drained and ignored.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut video: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            // A plain text part named `video` is form data, not a file.
            VIDEO_FIELD if field.file_name().is_none() => {
                field.bytes().await.map_err(multipart_error)?;
            }
            VIDEO_FIELD => {
                if video.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple video fields are not allowed; send exactly one field named 'video'"
                            .to_string(),
                    ));
                }
                file_name = field.file_name().map(|s| s.to_string());
                video = Some(field.bytes().await.map_err(multipart_error)?);
            }
            TITLE_FIELD => {
                title = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    let video = video
        .filter(|data| !data.is_empty())
        .ok_or(AppError::NoFileProvided)?;

    Ok(UploadForm {
        video,
        file_name,
        title,
    })
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "Video exceeds the maximum upload size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}
