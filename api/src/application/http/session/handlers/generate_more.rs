use axum::extract::{Path, State};
use pantry_chef_core::domain::{
    common::entities::app_errors::CoreError,
    session::{ports::SessionService, value_objects::SessionSnapshot},
};
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

pub const GENERATE_MORE_NOTICE: &str =
    "Sorry, we couldn't generate more recipes right now. Please try again.";

#[utoipa::path(
    post,
    path = "/{session_id}/generate-more",
    tag = "session",
    summary = "Ask for recipes different from the ones already shown",
    description = "New recipes are appended to the current result. On failure the session keeps its result and a 502 notice is returned.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionSnapshot),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Not in success, or already generating"),
        (status = 502, description = "The model request failed"),
    ),
)]
pub async fn generate_more(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionSnapshot>, ApiError> {
    state
        .service
        .generate_more(session_id)
        .await
        .map(Response::OK)
        .map_err(generate_more_error)
}

/// Request failures become a 502 carrying the retry notice; the session
/// itself keeps its recipes.
fn generate_more_error(error: CoreError) -> ApiError {
    match error {
        CoreError::TransportError(_)
        | CoreError::EmptyResponse
        | CoreError::MalformedResponse(_)
        | CoreError::ReadError(_) => {
            ApiError::BadGateway(format!("{} ({})", GENERATE_MORE_NOTICE, error))
        }
        other => ApiError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn request_failures_carry_the_notice() {
        for error in [
            CoreError::TransportError("connection refused".to_string()),
            CoreError::EmptyResponse,
            CoreError::MalformedResponse("expected value".to_string()),
            CoreError::ReadError("image is not stored".to_string()),
        ] {
            let api_error = generate_more_error(error);

            assert_eq!(api_error.status(), StatusCode::BAD_GATEWAY);
            assert!(api_error.to_string().starts_with(GENERATE_MORE_NOTICE));
        }
    }

    #[test]
    fn session_errors_keep_their_status() {
        assert_eq!(
            generate_more_error(CoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            generate_more_error(CoreError::Conflict("busy".to_string())).status(),
            StatusCode::CONFLICT
        );
    }
}
