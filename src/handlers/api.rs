use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::{delegations, users};
use crate::models::RepositoryError;
use crate::services::{DelegationEndpoint, UserEndpoint};

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<T, ApiError>;

/// Shared application state containing both endpoints
#[derive(Clone)]
pub struct ApiState {
    pub delegations: Arc<DelegationEndpoint>,
    pub users: Arc<UserEndpoint>,
}

/// Routes for delegations, cars, users and bookings
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/delegations", post(delegations::save_delegation))
        .route(
            "/api/delegations/profiles",
            get(delegations::get_all_profile_delegations),
        )
        .route(
            "/api/delegations/:delegation_id",
            get(delegations::list_delegations_by_id),
        )
        .route(
            "/api/delegations/:delegation_id/:operation",
            get(delegations::get_delegation),
        )
        .route(
            "/api/cars",
            get(delegations::get_all_cars).post(delegations::save_car),
        )
        .route("/api/cars/:id", get(delegations::list_cars_by_id))
        .route("/api/cars/:id/:operation", get(delegations::get_car))
        .route("/api/users", post(users::save_user))
        .route("/api/bookings", post(users::save_booking))
        .route(
            "/api/users/:user_id/bookings",
            get(users::get_bookings_by_user),
        )
        .with_state(state)
}

pub(crate) fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(json!({
            "error": message.into(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Absence is a normal outcome, logged at info
pub(crate) fn not_found_response(kind: &str, partition_key: &str, operation: &str) -> ApiError {
    info!(kind, partition_key, operation, "Record not found");
    error_body(
        StatusCode::NOT_FOUND,
        format!("{} not found: ({}, {})", kind, partition_key, operation),
    )
}

pub(crate) fn json_rejection_response(rejection: JsonRejection) -> ApiError {
    crate::warn_with_trace!(error = %rejection, "Rejected request body");
    error_body(
        StatusCode::BAD_REQUEST,
        format!("Invalid request body: {}", rejection.body_text()),
    )
}

/// Map a repository error onto an HTTP status and JSON error body
pub fn repository_error_to_response(err: RepositoryError) -> ApiError {
    let status = match &err {
        RepositoryError::Validation(_) => StatusCode::BAD_REQUEST,
        RepositoryError::TypeMismatch { .. } => StatusCode::CONFLICT,
        RepositoryError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
        RepositoryError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        RepositoryError::ConnectionFailed { .. } | RepositoryError::TableNotFound { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RepositoryError::ResultLimitExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
        RepositoryError::Conversion { .. } | RepositoryError::AwsSdk { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        crate::error_with_trace!(status = status.as_u16(), error = %err, "Request failed");
    } else {
        crate::warn_with_trace!(status = status.as_u16(), error = %err, "Request rejected");
    }

    let message = match status {
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
        _ => err.to_string(),
    };

    error_body(status, message)
}
