pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use crate::interface::http::state::AppState;
use axum::Router;
use axum::middleware::from_fn;

/// Build the HTTP application with every route and the request middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::ready::router())
        .merge(routes::metrics::router())
        .merge(routes::report::router())
        .layer(from_fn(trace::request_log_middleware))
        .layer(from_fn(trace::trace_id_middleware))
        .with_state(state)
}
