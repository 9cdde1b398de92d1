use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use pantry_chef_core::domain::session::ports::SessionService;
use uuid::Uuid;

use crate::application::http::server::{api_entities::api_error::ApiError, app_state::AppState};

#[utoipa::path(
    delete,
    path = "/{session_id}/images/{image_id}",
    tag = "session",
    summary = "Remove an image from a session",
    description = "Removing an image that is not in the session is a no-op.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("image_id" = Uuid, Path, description = "Image ID"),
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Recipes are being requested for the current images"),
    ),
)]
pub async fn remove_image(
    Path((session_id, image_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.service.remove_image(session_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
