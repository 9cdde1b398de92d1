use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    add_images::{__path_add_images, add_images},
    analyze::{__path_analyze, analyze},
    create_session::{__path_create_session, create_session},
    delete_session::{__path_delete_session, delete_session},
    edit_images::{__path_edit_images, edit_images},
    generate_more::{__path_generate_more, generate_more},
    get_image_preview::{__path_get_image_preview, get_image_preview},
    get_session::{__path_get_session, get_session},
    remove_image::{__path_remove_image, remove_image},
    reset_session::{__path_reset_session, reset_session},
};

/// Upper bound on images per multipart request, used to size the body limit
const MAX_IMAGES_PER_UPLOAD: usize = 16;

#[derive(OpenApi)]
#[openapi(paths(
    create_session,
    get_session,
    delete_session,
    add_images,
    remove_image,
    get_image_preview,
    analyze,
    generate_more,
    reset_session,
    edit_images
))]
pub struct SessionApiDoc;

pub fn session_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;
    let body_limit = state
        .args
        .storage
        .max_image_size
        .saturating_mul(MAX_IMAGES_PER_UPLOAD);

    Router::new()
        .route(&format!("{}/sessions", root_path), post(create_session))
        .route(
            &format!("{}/sessions/{{session_id}}", root_path),
            get(get_session).delete(delete_session),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/images", root_path),
            post(add_images).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/images/{{image_id}}", root_path),
            delete(remove_image),
        )
        .route(
            &format!(
                "{}/sessions/{{session_id}}/images/{{image_id}}/preview",
                root_path
            ),
            get(get_image_preview),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/analyze", root_path),
            post(analyze),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/generate-more", root_path),
            post(generate_more),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/reset", root_path),
            post(reset_session),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/edit-images", root_path),
            post(edit_images),
        )
}
