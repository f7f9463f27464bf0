use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use super::api::{error_body, repository_error_to_response, ApiResult};
use crate::repositories::{TableManager, TableSpec};
use crate::services::seed::{DEFAULT_SEED_CAR_COUNT, SEED_DELEGATION_ID};
use crate::services::{seed_delegation_fleet, DelegationEndpoint, SeedSummary};

const MAX_SEED_CARS: usize = 999;

/// Admin state: table setup and seeding
#[derive(Clone)]
pub struct AdminState {
    /// `None` when the app runs over the in-memory store
    pub table_manager: Option<Arc<TableManager>>,
    pub delegations_table: TableSpec,
    pub users_table: TableSpec,
    pub delegations: Arc<DelegationEndpoint>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: SeedSummary,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SetupTablesResponse {
    pub message: String,
    pub tables_created: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedQuery {
    pub cars: Option<usize>,
    pub delegation_id: Option<String>,
}

pub fn create_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/api/admin/setup-tables", post(setup_tables))
        .route("/api/admin/seed", post(seed_database))
        .with_state(state)
}

/// Create both tables if missing and wait until they are active
#[instrument(name = "setup_tables", skip(state), fields(
    delegations_table = %state.delegations_table.table_name,
    users_table = %state.users_table.table_name,
))]
pub async fn setup_tables(State(state): State<AdminState>) -> ApiResult<Json<SetupTablesResponse>> {
    let Some(table_manager) = &state.table_manager else {
        return Err(error_body(
            StatusCode::SERVICE_UNAVAILABLE,
            "Table management is not available for this store",
        ));
    };

    table_manager
        .create_all_tables(&state.delegations_table, &state.users_table)
        .await
        .map_err(repository_error_to_response)?;

    let tables_created = vec![
        state.delegations_table.table_name.clone(),
        state.users_table.table_name.clone(),
    ];
    info!(tables = ?tables_created, "Tables active");

    Ok(Json(SetupTablesResponse {
        message: format!("{} tables active", tables_created.len()),
        tables_created,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Seed a profile delegation and a deterministic fleet of cars
#[instrument(name = "seed_database", skip(state))]
pub async fn seed_database(
    State(state): State<AdminState>,
    Query(query): Query<SeedQuery>,
) -> ApiResult<Json<SeedResponse>> {
    let car_count = query.cars.unwrap_or(DEFAULT_SEED_CAR_COUNT);
    if car_count > MAX_SEED_CARS {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            format!("At most {} cars can be seeded", MAX_SEED_CARS),
        ));
    }
    let delegation_id = query.delegation_id.as_deref().unwrap_or(SEED_DELEGATION_ID);

    info!(delegation_id, cars = car_count, "Seeding delegation fleet");

    let summary = seed_delegation_fleet(&state.delegations, delegation_id, car_count)
        .await
        .map_err(repository_error_to_response)?;

    Ok(Json(SeedResponse {
        message: format!(
            "Seeded {} delegation and {} cars",
            summary.delegations, summary.cars
        ),
        summary,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
