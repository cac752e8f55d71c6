use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Build the application router.
pub fn build_routes(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::homepage))
    .route("/login", get(handlers::login))
    .route("/login/authorized", get(handlers::authorized))
    .route("/preexport", get(handlers::preexport))
    .route("/export", get(handlers::export))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
