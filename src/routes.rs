use crate::{handlers, middleware::add_security_headers, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the application router.
///
/// Anything that is not an API route falls through to the static directory,
/// which serves `index.html` for `/`.
pub fn router(app_state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/submit", post(handlers::submit_registration))
        .route("/test-db", get(handlers::test_db))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(middleware::from_fn(add_security_headers))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
