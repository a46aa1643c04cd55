//! Combined router for the session handshake endpoints

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::origin::enforce_origin_policy;

/// Create the router for the session handshake endpoints.
///
/// Routes (relative to the mount point, typically `SG_ROUTE_PREFIX`):
/// - `GET  /csrf-token`
/// - `POST /login`
/// - `POST /logout`
/// - `GET  /me`
///
/// The origin-policy middleware wraps every route and is the only layer that
/// writes CORS headers; mount the router as-is rather than stacking another
/// CORS layer on top.
pub fn session_guard_router() -> Router {
    session_guard_router_no_trace().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`session_guard_router`] but without HTTP request tracing, for
/// applications that install their own tracing middleware.
pub fn session_guard_router_no_trace() -> Router {
    Router::new()
        .route("/csrf-token", get(handlers::csrf_token))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .layer(middleware::from_fn(enforce_origin_policy))
}
