use axum::extract::{Path, State};
use pantry_chef_core::domain::session::{ports::SessionService, value_objects::SessionSnapshot};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/{session_id}",
    tag = "session",
    summary = "Read the current state of a session",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionSnapshot),
        (status = 404, description = "Unknown session"),
    ),
)]
pub async fn get_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionSnapshot>, ApiError> {
    state
        .service
        .get_session(session_id)
        .await
        .map(Response::OK)
        .map_err(ApiError::from)
}
