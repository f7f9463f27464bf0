use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
    TableStatus,
};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use super::keys::TableSpec;
use crate::models::{RepositoryError, RepositoryResult};

/// Creates the renting tables: string partition key plus `operation` sort
/// key, on-demand billing
pub struct TableManager {
    client: Arc<DynamoDbClient>,
    poll_interval: Duration,
    max_polls: u32,
}

impl TableManager {
    pub fn new(client: Arc<DynamoDbClient>) -> Self {
        Self {
            client,
            poll_interval: Duration::from_secs(5),
            max_polls: 60,
        }
    }

    /// Create `table` if missing and wait until it is active
    #[instrument(skip(self), fields(table_name = %table.table_name))]
    pub async fn create_table(&self, table: &TableSpec) -> RepositoryResult<()> {
        if self.table_exists(&table.table_name).await? {
            info!("Table {} already exists", table.table_name);
            return Ok(());
        }

        info!("Creating table {}", table.table_name);

        let (attribute_definitions, key_schema) = Self::key_definitions(table)?;

        self.client
            .create_table()
            .table_name(&table.table_name)
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(key_schema))
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        info!("Table creation initiated, waiting for table to become active");
        self.wait_for_table_active(&table.table_name).await?;
        info!("Table {} created successfully", table.table_name);

        Ok(())
    }

    fn key_definitions(
        table: &TableSpec,
    ) -> RepositoryResult<(Vec<AttributeDefinition>, Vec<KeySchemaElement>)> {
        let build_error = |e: aws_sdk_dynamodb::error::BuildError| RepositoryError::AwsSdk {
            message: format!("Failed to build key schema: {}", e),
        };

        let mut attribute_definitions = Vec::with_capacity(2);
        let mut key_schema = Vec::with_capacity(2);

        for (attribute, key_type) in [
            (table.partition_key_attribute(), KeyType::Hash),
            (table.sort_key_attribute(), KeyType::Range),
        ] {
            attribute_definitions.push(
                AttributeDefinition::builder()
                    .attribute_name(attribute)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(build_error)?,
            );
            key_schema.push(
                KeySchemaElement::builder()
                    .attribute_name(attribute)
                    .key_type(key_type)
                    .build()
                    .map_err(build_error)?,
            );
        }

        Ok((attribute_definitions, key_schema))
    }

    #[instrument(skip(self))]
    pub async fn table_exists(&self, table_name: &str) -> RepositoryResult<bool> {
        match self.client.describe_table().table_name(table_name).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_error))
                if service_error.err().is_resource_not_found_exception() =>
            {
                info!("Table {} does not exist", table_name);
                Ok(false)
            }
            Err(e) => {
                error!(
                    code = e.code().unwrap_or("unknown"),
                    "Error checking table existence: {}", e
                );
                Err(RepositoryError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        }
    }

    async fn wait_for_table_active(&self, table_name: &str) -> RepositoryResult<()> {
        for _ in 0..self.max_polls {
            let response = self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            match response.table.and_then(|t| t.table_status) {
                Some(TableStatus::Active) => {
                    info!("Table {} is now active", table_name);
                    return Ok(());
                }
                Some(status) => info!("Table {} status: {:?}, waiting...", table_name, status),
                None => warn!("Table {} status unknown, waiting...", table_name),
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        error!("Timeout waiting for table {} to become active", table_name);
        Err(RepositoryError::Timeout)
    }

    /// Create both table families concurrently
    #[instrument(skip(self))]
    pub async fn create_all_tables(
        &self,
        delegations: &TableSpec,
        users: &TableSpec,
    ) -> RepositoryResult<()> {
        let (delegations_result, users_result) =
            tokio::join!(self.create_table(delegations), self.create_table(users));

        delegations_result?;
        users_result?;

        info!("All tables created successfully");
        Ok(())
    }

    fn map_dynamodb_error(&self, error: DynamoDbError) -> RepositoryError {
        error!("DynamoDB error: {:?}", error);
        RepositoryError::AwsSdk {
            message: error.to_string(),
        }
    }
}
