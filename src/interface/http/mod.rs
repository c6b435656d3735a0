pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use axum::{Router, middleware};
use tower_http::services::ServeDir;

use crate::interface::http::state::AppState;

/// Builds the HTTP application: routes, static reports and request middleware.
pub fn app(state: AppState) -> Router {
    let reports = ServeDir::new(&state.ctx.settings.runner.reports_dir);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::command::router())
        .merge(routes::metrics::router())
        .nest_service("/reports", reports)
        .layer(middleware::from_fn(trace::request_log_middleware))
        .layer(middleware::from_fn(trace::trace_id_middleware))
        .with_state(state)
}
