//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidrelay_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidrelay API",
        version = "0.1.0",
        description = "Accepts video uploads, forwards the binary to Cloudinary and records the resulting URL."
    ),
    paths(handlers::video_upload::upload_video),
    components(schemas(
        handlers::video_upload::UploadResponse,
        error::ErrorResponse,
        models::VideoRecord,
    )),
    tags(
        (name = "videos", description = "Video upload")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
