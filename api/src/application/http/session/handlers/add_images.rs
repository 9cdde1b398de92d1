use axum::extract::{Multipart, Path, State, multipart::MultipartError};
use pantry_chef_core::domain::{
    image::{entities::ImageSummary, value_objects::ImageFile},
    session::ports::SessionService,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

const IMAGE_FIELDS: [&str; 3] = ["images", "image", "file"];

fn multipart_error(e: MultipartError) -> ApiError {
    error!("Failed to read multipart body: {}", e);
    if e.status().as_u16() == 413 {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart body: {}", e.body_text()))
    }
}

#[utoipa::path(
    post,
    path = "/{session_id}/images",
    tag = "session",
    summary = "Add images to a session",
    description = "Multipart form data with one or more `images` fields. Every part must be an image.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 201, description = "Images stored, in upload order", body = Vec<ImageSummary>),
        (status = 400, description = "Empty file or no image in the form"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "The session is analyzing"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Not an image"),
    ),
)]
pub async fn add_images(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<Vec<ImageSummary>>, ApiError> {
    let max_size = state.args.storage.max_image_size;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if !IMAGE_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            warn!(file_name = %file_name, content_type = %content_type, "rejected non-image upload");
            return Err(ApiError::UnsupportedMediaType(format!(
                "{} is not an image",
                file_name
            )));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() {
            return Err(ApiError::BadRequest(format!("{} is empty", file_name)));
        }
        if data.len() > max_size {
            return Err(ApiError::PayloadTooLarge(format!(
                "{} is too large. Max size is {} bytes",
                file_name, max_size
            )));
        }

        files.push(ImageFile::new(file_name, content_type, data));
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing 'images' field in multipart form".to_string(),
        ));
    }

    let images = state.service.add_images(session_id, files).await?;
    Ok(Response::Created(images))
}
