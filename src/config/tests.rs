#[cfg(test)]
mod config_tests {
    use crate::config::{
        default_delegations_table, default_host, default_log_level, default_max_list_items,
        default_max_request_size, default_page_size, default_port, default_region,
        default_service_name, default_store_timeout_ms, default_timeout, default_users_table,
        dynamodb_client_config, ConfigError, DatabaseConfig, ObservabilityConfig,
        ParameterStoreConfig, ServerConfig, StoreConfig,
    };
    use crate::models::TableFamily;
    use aws_sdk_ssm::Client as SsmClient;
    use std::env;
    use std::time::Duration;

    #[test]
    fn test_server_config_defaults() {
        env::remove_var("RENTING_HOST");
        env::remove_var("RENTING_PORT");
        env::remove_var("RENTING_REQUEST_TIMEOUT_SECONDS");
        env::remove_var("RENTING_MAX_REQUEST_SIZE");

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.max_request_size, 1024 * 1024);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_database_config_from_env() {
        env::set_var("RENTING_DELEGATIONS_TABLE_NAME", "TestDelegations");
        env::set_var("RENTING_USERS_TABLE_NAME", "TestUsers");
        env::set_var("RENTING_DYNAMODB_ENDPOINT", "http://localhost:8000");

        let config = DatabaseConfig::from_env().unwrap();

        assert_eq!(config.delegations_table_name, "TestDelegations");
        assert_eq!(config.users_table_name, "TestUsers");
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert!(config.delegations_table_parameter.is_none());

        let delegations = config.delegations_table();
        assert_eq!(delegations.family, TableFamily::Delegations);
        assert_eq!(delegations.table_name, "TestDelegations");
        assert_eq!(config.users_table().partition_key_attribute(), "userId");

        env::remove_var("RENTING_DELEGATIONS_TABLE_NAME");
        env::remove_var("RENTING_USERS_TABLE_NAME");
        env::remove_var("RENTING_DYNAMODB_ENDPOINT");
    }

    #[test]
    fn test_store_config_from_env() {
        env::set_var("RENTING_PAGE_SIZE", "25");
        env::set_var("RENTING_MAX_LIST_ITEMS", "500");
        env::set_var("RENTING_RETRY_ATTEMPTS", "5");

        let config = StoreConfig::from_env().unwrap();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_list_items, 500);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.store_timeout_ms, default_store_timeout_ms());

        let limits = config.list_limits();
        assert_eq!(limits.page_size, 25);
        assert_eq!(limits.max_list_items, 500);

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(100));
        assert_eq!(policy.call_timeout, Duration::from_millis(3000));

        env::remove_var("RENTING_PAGE_SIZE");
        env::remove_var("RENTING_MAX_LIST_ITEMS");
        env::remove_var("RENTING_RETRY_ATTEMPTS");
    }

    #[test]
    fn test_store_config_validation() {
        assert!(StoreConfig::default().validate().is_ok());

        let oversized_page = StoreConfig {
            page_size: 2000,
            ..StoreConfig::default()
        };
        assert!(matches!(
            oversized_page.validate(),
            Err(ConfigError::ValidationError { .. })
        ));

        let no_timeout = StoreConfig {
            store_timeout_ms: 0,
            ..StoreConfig::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_server_config_validation() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 0,
            request_timeout_seconds: 30,
            max_request_size: 1024,
        };
        assert!(config.validate().is_err());

        let config = ServerConfig { port: 8080, ..config };
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_database_config_rejects_empty_table_name() {
        let config = DatabaseConfig {
            delegations_table_name: String::new(),
            users_table_name: "Users".to_string(),
            region: default_region(),
            dynamodb_endpoint: None,
            delegations_table_parameter: None,
            users_table_parameter: None,
        };

        match config.validate() {
            Err(ConfigError::ValidationError { message }) => {
                assert!(message.contains("Delegations"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_observability_config_from_env() {
        env::set_var("RENTING_SERVICE_NAME", "test-service");
        env::set_var("RENTING_SERVICE_VERSION", "1.0.0");
        env::set_var("RENTING_LOG_LEVEL", "debug");

        let config = ObservabilityConfig::from_env().unwrap();

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.service_version, "1.0.0");
        assert_eq!(config.log_level, "debug");

        env::remove_var("RENTING_SERVICE_NAME");
        env::remove_var("RENTING_SERVICE_VERSION");
        env::remove_var("RENTING_LOG_LEVEL");
    }

    #[tokio::test]
    async fn test_parameter_store_falls_back_to_configured_names() {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-1"))
            .load()
            .await;

        let ssm_client = SsmClient::new(&aws_config);
        let parameter_store = ParameterStoreConfig::new(ssm_client, Duration::from_secs(60));

        let mut config = DatabaseConfig {
            delegations_table_name: "Delegations".to_string(),
            users_table_name: "Users".to_string(),
            region: "us-east-1".to_string(),
            dynamodb_endpoint: None,
            delegations_table_parameter: Some("/nonexistent/renting/delegations".to_string()),
            users_table_parameter: None,
        };
        config.resolve_table_names(&parameter_store).await;

        assert_eq!(config.delegations_table_name, "Delegations");
        assert_eq!(config.users_table_name, "Users");
    }

    #[test]
    fn test_dynamodb_client_leaves_retries_to_store_policy() {
        let aws_config = aws_config::SdkConfig::builder()
            .region(aws_config::Region::new("us-east-1"))
            .behavior_version(aws_config::BehaviorVersion::latest())
            .build();

        for endpoint in [None, Some("http://localhost:8000")] {
            let config = dynamodb_client_config(&aws_config, endpoint);
            let retry = config.retry_config().expect("retry config is set");
            assert_eq!(retry.max_attempts(), 1);
        }
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::ParameterNotFound {
            name: "test_param".to_string(),
        };
        assert_eq!(error.to_string(), "Parameter not found: test_param");

        let error = ConfigError::ValidationError {
            message: "Invalid configuration".to_string(),
        };
        assert_eq!(error.to_string(), "Validation error: Invalid configuration");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_max_request_size(), 1024 * 1024);
        assert_eq!(default_delegations_table(), "Delegations");
        assert_eq!(default_users_table(), "Users");
        assert_eq!(default_region(), "us-east-1");
        assert_eq!(default_page_size(), 100);
        assert_eq!(default_max_list_items(), 1000);
        assert_eq!(default_service_name(), "renting-rs");
        assert_eq!(default_log_level(), "info");
    }
}
