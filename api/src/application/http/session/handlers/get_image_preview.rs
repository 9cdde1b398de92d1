use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use pantry_chef_core::domain::session::ports::SessionService;
use uuid::Uuid;

use crate::application::http::server::{api_entities::api_error::ApiError, app_state::AppState};

#[utoipa::path(
    get,
    path = "/{session_id}/images/{image_id}/preview",
    tag = "session",
    summary = "Raw bytes of an image, for display",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("image_id" = Uuid, Path, description = "Image ID"),
    ),
    responses(
        (status = 200, description = "Image bytes with their original content type"),
        (status = 404, description = "Unknown session or image"),
    ),
)]
pub async fn get_image_preview(
    Path((session_id, image_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let preview = state.service.image_preview(session_id, image_id).await?;

    Ok((
        [
            (CONTENT_TYPE, preview.content_type),
            (CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        preview.data,
    ))
}
