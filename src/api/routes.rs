//! Route definitions for the API.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::SharedState;

/// Create the main router.
///
/// The whole proxy protocol hangs off one wildcard route; request paths are
/// classified inside the handler because the interesting structure
/// (`/@v/`, `/@latest`) sits at the tail of an arbitrarily deep module path.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::health_check))
        .route(
            "/*path",
            get(handlers::proxy::handle_get)
                .put(handlers::proxy::handle_put)
                .post(handlers::proxy::handle_post),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
