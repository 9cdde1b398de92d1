use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use pantry_chef_core::domain::session::ports::SessionService;
use uuid::Uuid;

use crate::application::http::server::{api_entities::api_error::ApiError, app_state::AppState};

#[utoipa::path(
    delete,
    path = "/{session_id}",
    tag = "session",
    summary = "Delete a session",
    description = "Drops the session and releases every stored image it holds.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Unknown session"),
    ),
)]
pub async fn delete_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
