use crate::handlers;
use crate::startup::AppState;
use axum::{body::Body, middleware::from_fn, routing::get, Router};
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use tower_http::trace::TraceLayer;

/// Route table, built once at startup.
///
/// | Method | Path        | Handler     |
/// |--------|-------------|-------------|
/// | GET    | /texts/:id  | get_text    |
/// | GET    | /texts      | list_texts  |
/// | POST   | /texts      | insert_text |
/// | PUT    | /texts/:id  | update_text |
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/texts",
            get(handlers::list_texts).post(handlers::insert_text),
        )
        .route(
            "/texts/:id",
            get(handlers::get_text).put(handlers::update_text),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
