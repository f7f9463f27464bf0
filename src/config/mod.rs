use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_ssm::Client as SsmClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::TableFamily;
use crate::repositories::{ListLimits, RetryPolicy, TableSpec};

const ENV_PREFIX: &str = "RENTING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("AWS SDK error: {source}")]
    AwsSdk {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub aws: AwsConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_delegations_table")]
    pub delegations_table_name: String,
    #[serde(default = "default_users_table")]
    pub users_table_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Local endpoint override, e.g. DynamoDB Local
    #[serde(default)]
    pub dynamodb_endpoint: Option<String>,
    /// SSM parameter holding the delegations table name
    #[serde(default)]
    pub delegations_table_parameter: Option<String>,
    #[serde(default)]
    pub users_table_parameter: Option<String>,
}

/// Paging, retry and deadline settings for store calls
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub dynamodb_client: DynamoDbClient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default = "default_otlp_endpoint_option")]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

pub struct ParameterStoreConfig {
    ssm_client: SsmClient,
    cache: Arc<RwLock<HashMap<String, (String, Instant)>>>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for ParameterStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStoreConfig")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// DynamoDB client settings. SDK retries are off; store calls retry under
/// `RetryPolicy` instead.
pub(crate) fn dynamodb_client_config(
    aws_config: &aws_config::SdkConfig,
    endpoint: Option<&str>,
) -> aws_sdk_dynamodb::Config {
    let mut builder =
        aws_sdk_dynamodb::config::Builder::from(aws_config).retry_config(RetryConfig::disabled());
    if let Some(endpoint) = endpoint {
        info!(endpoint = %endpoint, "Using DynamoDB endpoint override");
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

/// Deserialize one section from `RENTING_*` environment variables
fn load_section<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl Config {
    pub async fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment and AWS Parameter Store");

        let server = ServerConfig::from_env()?;
        let mut database = DatabaseConfig::from_env()?;
        let store = StoreConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(database.region.clone()))
            .load()
            .await;

        let dynamodb_client = DynamoDbClient::from_conf(dynamodb_client_config(
            &aws_config,
            database.dynamodb_endpoint.as_deref(),
        ));
        let parameter_store =
            ParameterStoreConfig::new(SsmClient::new(&aws_config), Duration::from_secs(5 * 60));
        database.resolve_table_names(&parameter_store).await;

        let aws = AwsConfig {
            region: database.region.clone(),
            dynamodb_client,
        };

        let config = Config {
            server,
            database,
            store,
            aws,
            observability,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating configuration");

        self.server.validate()?;
        self.database.validate()?;
        self.store.validate()?;

        info!("Configuration validation completed");
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError {
        message: message.to_string(),
    }
}

impl ServerConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        load_section("server")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(invalid("Request timeout cannot be 0"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        load_section("database")
    }

    pub fn delegations_table(&self) -> TableSpec {
        TableSpec::new(TableFamily::Delegations, &self.delegations_table_name)
    }

    pub fn users_table(&self) -> TableSpec {
        TableSpec::new(TableFamily::Users, &self.users_table_name)
    }

    /// Replace table names with Parameter Store values where a parameter is
    /// configured; the configured name stays as the fallback
    pub async fn resolve_table_names(&mut self, parameter_store: &ParameterStoreConfig) {
        if let Some(parameter) = &self.delegations_table_parameter {
            self.delegations_table_name = parameter_store
                .get_parameter_with_default(parameter, &self.delegations_table_name)
                .await;
        }
        if let Some(parameter) = &self.users_table_parameter {
            self.users_table_name = parameter_store
                .get_parameter_with_default(parameter, &self.users_table_name)
                .await;
        }
        info!(
            delegations_table = %self.delegations_table_name,
            users_table = %self.users_table_name,
            "Table names resolved"
        );
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.delegations_table_name.is_empty() {
            return Err(invalid("Delegations table name cannot be empty"));
        }
        if self.users_table_name.is_empty() {
            return Err(invalid("Users table name cannot be empty"));
        }
        if self.delegations_table_name == self.users_table_name {
            warn!(
                table = %self.users_table_name,
                "Delegations and users share one table name"
            );
        }
        Ok(())
    }
}

impl StoreConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        load_section("store")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
            Duration::from_millis(self.store_timeout_ms),
        )
    }

    pub fn list_limits(&self) -> ListLimits {
        ListLimits {
            page_size: self.page_size,
            max_list_items: self.max_list_items,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(invalid("Page size cannot be 0"));
        }
        if self.page_size > self.max_list_items {
            return Err(invalid("Page size cannot exceed the list ceiling"));
        }
        if self.retry_attempts == 0 {
            return Err(invalid("Retry attempts cannot be 0"));
        }
        if self.store_timeout_ms == 0 {
            return Err(invalid("Store timeout cannot be 0"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_list_items: default_max_list_items(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl ObservabilityConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        load_section("observability")
    }
}

impl ParameterStoreConfig {
    pub fn new(ssm_client: SsmClient, cache_ttl: Duration) -> Self {
        Self {
            ssm_client,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl,
        }
    }

    pub async fn get_parameter(&self, name: &str) -> Result<String, ConfigError> {
        debug!("Getting parameter: {}", name);

        {
            let cache = self.cache.read().await;
            if let Some((value, timestamp)) = cache.get(name) {
                if timestamp.elapsed() < self.cache_ttl {
                    debug!("Parameter found in cache: {}", name);
                    return Ok(value.clone());
                }
                debug!("Parameter cache expired: {}", name);
            }
        }

        debug!("Fetching parameter from AWS SSM: {}", name);
        let result = self
            .ssm_client
            .get_parameter()
            .name(name)
            .with_decryption(false)
            .send()
            .await
            .map_err(|e| ConfigError::AwsSdk {
                source: Box::new(e),
            })?;

        let value = result
            .parameter()
            .and_then(|p| p.value())
            .ok_or_else(|| ConfigError::ParameterNotFound {
                name: name.to_string(),
            })?
            .to_string();

        {
            let mut cache = self.cache.write().await;
            cache.insert(name.to_string(), (value.clone(), Instant::now()));
        }

        debug!("Parameter retrieved and cached: {}", name);
        Ok(value)
    }

    pub async fn get_parameter_with_default(&self, name: &str, default: &str) -> String {
        match self.get_parameter(name).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to get parameter {}, using default: {}", name, e);
                default.to_string()
            }
        }
    }
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_delegations_table() -> String {
    "Delegations".to_string()
}

pub(crate) fn default_users_table() -> String {
    "Users".to_string()
}

pub(crate) fn default_region() -> String {
    "us-east-1".to_string()
}

pub(crate) fn default_page_size() -> usize {
    crate::repositories::table_repository::DEFAULT_PAGE_SIZE
}

pub(crate) fn default_max_list_items() -> usize {
    crate::repositories::table_repository::DEFAULT_MAX_LIST_ITEMS
}

pub(crate) fn default_retry_attempts() -> u32 {
    3
}

pub(crate) fn default_retry_base_delay_ms() -> u64 {
    100
}

pub(crate) fn default_store_timeout_ms() -> u64 {
    3000
}

pub(crate) fn default_service_name() -> String {
    "renting-rs".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_otlp_endpoint_option() -> Option<String> {
    std::env::var("RENTING_OTLP_ENDPOINT").ok()
}

pub(crate) fn default_enable_json_logging() -> bool {
    std::env::var("RENTING_ENABLE_JSON_LOGGING")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests;
