use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::instrument;

use super::api::{
    json_rejection_response, not_found_response, repository_error_to_response, ApiResult,
    ApiState,
};
use crate::models::{Car, Delegation};

// =============================================================================
// DELEGATIONS
// =============================================================================

#[instrument(name = "save_delegation", skip(state, payload))]
pub async fn save_delegation(
    State(state): State<ApiState>,
    payload: Result<Json<Delegation>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(delegation) = payload.map_err(json_rejection_response)?;

    state
        .delegations
        .save_delegation(&delegation)
        .await
        .map_err(repository_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "get_delegation", skip(state))]
pub async fn get_delegation(
    State(state): State<ApiState>,
    Path((delegation_id, operation)): Path<(String, String)>,
) -> ApiResult<Json<Delegation>> {
    state
        .delegations
        .get_delegation(&delegation_id, &operation)
        .await
        .map_err(repository_error_to_response)?
        .map(Json)
        .ok_or_else(|| not_found_response("Delegation", &delegation_id, &operation))
}

#[instrument(name = "list_delegations_by_id", skip(state))]
pub async fn list_delegations_by_id(
    State(state): State<ApiState>,
    Path(delegation_id): Path<String>,
) -> ApiResult<Json<Vec<Delegation>>> {
    state
        .delegations
        .list_delegations_by_id(&delegation_id)
        .await
        .map(Json)
        .map_err(repository_error_to_response)
}

#[instrument(name = "get_all_profile_delegations", skip(state))]
pub async fn get_all_profile_delegations(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<Delegation>>> {
    state
        .delegations
        .get_all_profile_delegations()
        .await
        .map(Json)
        .map_err(repository_error_to_response)
}

// =============================================================================
// CARS
// =============================================================================

#[instrument(name = "save_car", skip(state, payload))]
pub async fn save_car(
    State(state): State<ApiState>,
    payload: Result<Json<Car>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(car) = payload.map_err(json_rejection_response)?;

    state
        .delegations
        .save_car(&car)
        .await
        .map_err(repository_error_to_response)?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "get_car", skip(state))]
pub async fn get_car(
    State(state): State<ApiState>,
    Path((id, operation)): Path<(String, String)>,
) -> ApiResult<Json<Car>> {
    state
        .delegations
        .get_car(&id, &operation)
        .await
        .map_err(repository_error_to_response)?
        .map(Json)
        .ok_or_else(|| not_found_response("Car", &id, &operation))
}

#[instrument(name = "list_cars_by_id", skip(state))]
pub async fn list_cars_by_id(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Car>>> {
    state
        .delegations
        .list_cars_by_id(&id)
        .await
        .map(Json)
        .map_err(repository_error_to_response)
}

#[instrument(name = "get_all_cars", skip(state))]
pub async fn get_all_cars(State(state): State<ApiState>) -> ApiResult<Json<Vec<Car>>> {
    state
        .delegations
        .get_all_cars()
        .await
        .map(Json)
        .map_err(repository_error_to_response)
}
