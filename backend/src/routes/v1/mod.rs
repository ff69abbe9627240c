pub mod sessions;
pub mod uploads;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use axum::middleware;

use crate::middleware::auth::auth_middleware;

/// Creates the v1 API router with all v1 handler routes
pub fn handler() -> ApiRouter {
    let public_routes = ApiRouter::new()
        .api_route("/session/create", post(sessions::create_session))
        .api_route("/session/{id}/auth", post(sessions::authenticate_session))
        .api_route(
            "/uploads/presigned-urls",
            post(uploads::generate_upload_urls),
        );

    let protected_routes = ApiRouter::new()
        .api_route("/session/{id}/photos", get(sessions::get_session_photos))
        .api_route("/session/{id}/select", post(sessions::select_session_photos))
        .layer(middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}
