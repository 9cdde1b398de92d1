use axum::extract::{Path, State};
use pantry_chef_core::domain::session::{ports::SessionService, value_objects::SessionSnapshot};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/{session_id}/analyze",
    tag = "session",
    summary = "Analyze the session's images and suggest recipes",
    description = "Returns once the model has answered. A failed request leaves the session in `error` with a message; it is not an HTTP error. With no images the session is returned unchanged.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionSnapshot),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Already analyzing, or a result is shown"),
    ),
)]
pub async fn analyze(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionSnapshot>, ApiError> {
    let snapshot = state.service.analyze(session_id).await?;
    Ok(Response::OK(snapshot))
}
