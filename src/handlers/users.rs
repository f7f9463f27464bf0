use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::instrument;

use super::api::{json_rejection_response, repository_error_to_response, ApiResult, ApiState};
use crate::models::{Booking, User};

#[instrument(name = "save_user", skip(state, payload))]
pub async fn save_user(
    State(state): State<ApiState>,
    payload: Result<Json<User>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(user) = payload.map_err(json_rejection_response)?;

    state
        .users
        .save_user(&user)
        .await
        .map_err(repository_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "save_booking", skip(state, payload))]
pub async fn save_booking(
    State(state): State<ApiState>,
    payload: Result<Json<Booking>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(booking) = payload.map_err(json_rejection_response)?;

    state
        .users
        .save_booking(&booking)
        .await
        .map_err(repository_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "get_bookings_by_user", skip(state))]
pub async fn get_bookings_by_user(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Booking>>> {
    state
        .users
        .get_bookings_by_user(&user_id)
        .await
        .map(Json)
        .map_err(repository_error_to_response)
}
