use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use renting_rs::{
    create_app,
    handlers::{AdminState, ApiState},
    init_observability,
    repositories::{DynamoDbItemStore, TableManager, TableRepository, TableSpec},
    services::{DelegationEndpoint, UserEndpoint},
    shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is not up yet, so configuration errors surface through anyhow
    let config = Config::from_environment()
        .await
        .context("Failed to load configuration")?;

    init_observability(&config.observability).context("Failed to initialize observability")?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Region: {}", config.aws.region);
    info!(
        "DynamoDB Tables: delegations={}, users={}",
        config.database.delegations_table_name, config.database.users_table_name
    );

    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);
    let dynamodb_client = Arc::new(config.aws.dynamodb_client.clone());
    let table_manager = Arc::new(TableManager::new(dynamodb_client.clone()));

    let delegations_table = config.database.delegations_table();
    let users_table = config.database.users_table();

    let repository_for = |table: &TableSpec| {
        let store = DynamoDbItemStore::new(
            dynamodb_client.clone(),
            table.clone(),
            config.database.region.clone(),
            config.store.retry_policy(),
        );
        Arc::new(
            TableRepository::new(Arc::new(store))
                .with_limits(config.store.list_limits())
                .with_metrics(metrics.clone()),
        )
    };
    let delegations_repository = repository_for(&delegations_table);
    let users_repository = repository_for(&users_table);
    info!("Repositories initialized successfully");

    let delegation_endpoint = Arc::new(DelegationEndpoint::new(
        delegations_repository.clone(),
        delegations_repository,
    ));
    let user_endpoint = Arc::new(UserEndpoint::new(
        users_repository.clone(),
        users_repository,
    ));

    let api_state = ApiState {
        delegations: delegation_endpoint.clone(),
        users: user_endpoint,
    };
    let admin_state = AdminState {
        table_manager: Some(table_manager),
        delegations_table,
        users_table,
        delegations: delegation_endpoint,
    };

    let app = create_app(api_state, admin_state, metrics, &config.server);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .context("Invalid server bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
