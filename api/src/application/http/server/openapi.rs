use crate::application::http::{health, session::router::SessionApiDoc};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pantry Chef API"
    ),
    paths(health::health),
    nest(
        (path = "/sessions", api = SessionApiDoc),
    )
)]
pub struct ApiDoc;
