use axum::extract::State;
use pantry_chef_core::domain::session::{ports::SessionService, value_objects::SessionSnapshot};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "",
    tag = "session",
    summary = "Start a kitchen session",
    responses(
        (status = 201, description = "Session created in the idle state", body = SessionSnapshot),
    ),
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Response<SessionSnapshot>, ApiError> {
    state
        .service
        .create_session()
        .await
        .map(Response::Created)
        .map_err(ApiError::from)
}
