use axum::extract::{Path, State};
use pantry_chef_core::domain::session::{ports::SessionService, value_objects::SessionSnapshot};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/{session_id}/reset",
    tag = "session",
    summary = "Start over",
    description = "Releases every image and clears the result and error.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionSnapshot),
        (status = 404, description = "Unknown session"),
    ),
)]
pub async fn reset_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionSnapshot>, ApiError> {
    let snapshot = state.service.reset(session_id).await?;
    Ok(Response::OK(snapshot))
}
