use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::observability::{observability_middleware, Metrics};

pub mod admin;
pub mod api;
pub mod delegations;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod users;

pub use admin::{create_admin_router, AdminState};
pub use api::{create_api_router, repository_error_to_response, ApiState};
pub use health::*;
pub use metrics::*;
pub use middleware::*;

/// Full application router: health, metrics, API and admin routes plus the
/// middleware stack
pub fn create_app(
    api_state: ApiState,
    admin_state: AdminState,
    metrics: Arc<Metrics>,
    server: &ServerConfig,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(create_api_router(api_state))
        .merge(create_admin_router(admin_state))
        // Layers run outer to inner from the bottom up
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(cors_middleware))
        .layer(from_fn_with_state(
            server.max_request_size,
            request_validation_middleware,
        ))
        .layer(from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
