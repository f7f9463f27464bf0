use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, error, instrument, Instrument};

use super::item_store::{ItemPage, ItemStore, PageRequest};
use super::keys::{TableSpec, RECORD_TYPE_ATTRIBUTE};
use super::retry::RetryPolicy;
use crate::models::{Item, RecordKey, RecordKind, RepositoryError, RepositoryResult};

/// DynamoDB implementation of the `ItemStore` trait
pub struct DynamoDbItemStore {
    client: Arc<DynamoDbClient>,
    table: TableSpec,
    region: String,
    retry: RetryPolicy,
}

impl DynamoDbItemStore {
    pub fn new(
        client: Arc<DynamoDbClient>,
        table: TableSpec,
        region: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            table,
            region,
            retry,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Create a DynamoDB client span with AWS and OpenTelemetry attributes
    fn create_dynamodb_span(&self, operation: &str) -> tracing::Span {
        let table_name = &self.table.table_name;
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %table_name,
            "aws.request_id" = tracing::field::Empty,

            "aws.remote.service" = "AWS::DynamoDB",
            "aws.remote.operation" = operation,
            "aws.remote.resource.type" = "AWS::DynamoDB::Table",
            "aws.remote.resource.identifier" = %table_name,

            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),

            "rpc.system" = "aws-api",
            "rpc.service" = "AmazonDynamoDBv2",
            "rpc.method" = operation,

            "db.system" = "dynamodb",
            "db.name" = %table_name,
            "db.operation" = operation,

            "component" = "aws-sdk-dynamodb",
        )
    }

    /// Convert an SDK failure into a `RepositoryError`, keeping transport
    /// failures distinguishable so they can be retried
    fn map_sdk_error<E, R>(&self, error: SdkError<E, R>) -> RepositoryError
    where
        E: std::error::Error + Send + Sync + 'static,
        R: Debug + Send + Sync + 'static,
        DynamoDbError: From<SdkError<E, R>>,
    {
        match &error {
            SdkError::TimeoutError(_) => {
                error!("DynamoDB call timed out: {}", DisplayErrorContext(&error));
                return RepositoryError::Timeout;
            }
            SdkError::DispatchFailure(_) => {
                error!("DynamoDB dispatch failed: {}", DisplayErrorContext(&error));
                return RepositoryError::ConnectionFailed {
                    message: DisplayErrorContext(&error).to_string(),
                };
            }
            _ => {}
        }

        self.map_dynamodb_error(error.into())
    }

    fn map_dynamodb_error(&self, error: DynamoDbError) -> RepositoryError {
        error!("DynamoDB error: {:?}", error);

        match error {
            DynamoDbError::ResourceNotFoundException(_) => RepositoryError::TableNotFound {
                table_name: self.table.table_name.clone(),
            },
            DynamoDbError::ProvisionedThroughputExceededException(_) => {
                RepositoryError::Throttled {
                    message: "Throughput exceeded".to_string(),
                }
            }
            DynamoDbError::RequestLimitExceeded(_) => RepositoryError::Throttled {
                message: "Request limit exceeded".to_string(),
            },
            DynamoDbError::InternalServerError(_) => RepositoryError::ConnectionFailed {
                message: "DynamoDB internal server error".to_string(),
            },
            other => RepositoryError::AwsSdk {
                message: other.to_string(),
            },
        }
    }

    fn page_limit(page: &PageRequest) -> i32 {
        page.limit.clamp(1, i32::MAX as usize) as i32
    }

    fn to_page(
        &self,
        items: Option<Vec<Item>>,
        last_evaluated_key: Option<Item>,
    ) -> RepositoryResult<ItemPage> {
        let next_cursor = last_evaluated_key
            .as_ref()
            .map(|key| self.table.key_from_item(key))
            .transpose()?;

        Ok(ItemPage {
            items: items.unwrap_or_default(),
            next_cursor,
        })
    }
}

#[async_trait]
impl ItemStore for DynamoDbItemStore {
    fn table(&self) -> &TableSpec {
        &self.table
    }

    #[instrument(skip(self, item), fields(table = %self.table.table_name))]
    async fn put_item(&self, item: Item) -> RepositoryResult<()> {
        let put_span = self.create_dynamodb_span("PutItem");

        self.retry
            .run("PutItem", || {
                let request = self
                    .client
                    .put_item()
                    .table_name(&self.table.table_name)
                    .set_item(Some(item.clone()));
                async move {
                    let output = request.send().await.map_err(|e| self.map_sdk_error(e))?;
                    if let Some(request_id) = output.request_id() {
                        tracing::Span::current().record("aws.request_id", request_id);
                    }
                    Ok(())
                }
            })
            .instrument(put_span)
            .await?;

        debug!("Item stored");
        Ok(())
    }

    #[instrument(skip(self, key), fields(table = %self.table.table_name, partition_key = %key.partition_key, operation = %key.operation))]
    async fn get_item(&self, key: &RecordKey) -> RepositoryResult<Option<Item>> {
        let get_span = self.create_dynamodb_span("GetItem");
        let key_item = self.table.key_item(key);

        let response = self
            .retry
            .run("GetItem", || {
                let request = self
                    .client
                    .get_item()
                    .table_name(&self.table.table_name)
                    .set_key(Some(key_item.clone()))
                    .consistent_read(true);
                async move {
                    let output = request.send().await.map_err(|e| self.map_sdk_error(e))?;
                    if let Some(request_id) = output.request_id() {
                        tracing::Span::current().record("aws.request_id", request_id);
                    }
                    Ok(output)
                }
            })
            .instrument(get_span)
            .await?;

        Ok(response.item)
    }

    #[instrument(skip(self, partition_key, kind, page), fields(table = %self.table.table_name, partition_key = %partition_key, kind = %kind))]
    async fn query_partition(
        &self,
        partition_key: &str,
        kind: RecordKind,
        page: PageRequest,
    ) -> RepositoryResult<ItemPage> {
        let query_span = self.create_dynamodb_span("Query");
        let start_key = page.start_after.as_ref().map(|k| self.table.key_item(k));
        let limit = Self::page_limit(&page);

        let response = self
            .retry
            .run("Query", || {
                let request = self
                    .client
                    .query()
                    .table_name(&self.table.table_name)
                    .key_condition_expression("#pk = :pk")
                    .filter_expression("#rt = :rt")
                    .expression_attribute_names("#pk", self.table.partition_key_attribute())
                    .expression_attribute_names("#rt", RECORD_TYPE_ATTRIBUTE)
                    .expression_attribute_values(
                        ":pk",
                        AttributeValue::S(partition_key.to_string()),
                    )
                    .expression_attribute_values(
                        ":rt",
                        AttributeValue::S(kind.as_str().to_string()),
                    )
                    .limit(limit)
                    .set_exclusive_start_key(start_key.clone());
                async move { request.send().await.map_err(|e| self.map_sdk_error(e)) }
            })
            .instrument(query_span)
            .await?;

        self.to_page(response.items, response.last_evaluated_key)
    }

    #[instrument(skip(self, kind, page), fields(table = %self.table.table_name, kind = %kind))]
    async fn scan(&self, kind: RecordKind, page: PageRequest) -> RepositoryResult<ItemPage> {
        let scan_span = self.create_dynamodb_span("Scan");
        let start_key = page.start_after.as_ref().map(|k| self.table.key_item(k));
        let limit = Self::page_limit(&page);

        let response = self
            .retry
            .run("Scan", || {
                let request = self
                    .client
                    .scan()
                    .table_name(&self.table.table_name)
                    .filter_expression("#rt = :rt")
                    .expression_attribute_names("#rt", RECORD_TYPE_ATTRIBUTE)
                    .expression_attribute_values(
                        ":rt",
                        AttributeValue::S(kind.as_str().to_string()),
                    )
                    .limit(limit)
                    .set_exclusive_start_key(start_key.clone());
                async move { request.send().await.map_err(|e| self.map_sdk_error(e)) }
            })
            .instrument(scan_span)
            .await?;

        self.to_page(response.items, response.last_evaluated_key)
    }
}
