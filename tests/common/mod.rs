use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use renting_rs::{
    config::ServerConfig,
    create_app,
    handlers::{AdminState, ApiState},
    models::TableFamily,
    repositories::{InMemoryItemStore, ListLimits, TableRepository, TableSpec},
    services::{DelegationEndpoint, UserEndpoint},
    Metrics,
};
use serde_json::Value;
use tower::ServiceExt;

/// The full router over in-memory stores
pub struct TestEnvironment {
    pub app: Router,
    pub delegations_store: Arc<InMemoryItemStore>,
    pub users_store: Arc<InMemoryItemStore>,
    pub metrics: Arc<Metrics>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_limits(ListLimits::default())
    }

    pub fn with_limits(limits: ListLimits) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics registry"));
        let delegations_store = Arc::new(InMemoryItemStore::delegations());
        let users_store = Arc::new(InMemoryItemStore::users());

        let delegations_repository = Arc::new(
            TableRepository::new(delegations_store.clone())
                .with_limits(limits)
                .with_metrics(metrics.clone()),
        );
        let users_repository = Arc::new(
            TableRepository::new(users_store.clone())
                .with_limits(limits)
                .with_metrics(metrics.clone()),
        );

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
            table_manager: None,
            delegations_table: TableSpec::new(TableFamily::Delegations, "Delegations"),
            users_table: TableSpec::new(TableFamily::Users, "Users"),
            delegations: delegation_endpoint,
        };
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_seconds: 5,
            max_request_size: 64 * 1024,
        };

        Self {
            app: create_app(api_state, admin_state, metrics.clone(), &server),
            delegations_store,
            users_store,
            metrics,
        }
    }

    /// Send one request through the router; returns status and parsed JSON
    /// body (`Value::Null` when the body is empty or not JSON)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }
}

pub fn car_json(delegation_id: &str, operation: &str, make: &str) -> Value {
    serde_json::json!({
        "delegationId": delegation_id,
        "operation": operation,
        "make": make,
        "model": "Civic",
        "year": 2024,
        "color": "Red",
        "rented": false,
        "price": 30
    })
}
