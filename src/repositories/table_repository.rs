use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::item_store::{ItemPage, ItemStore, PageRequest};
use super::keys::{decode_stored, to_stored_item, TableSpec};
use crate::models::{
    validate_partition_key, Item, Record, RecordKey, RepositoryError, RepositoryResult,
    ValidationError,
};
use crate::observability::{DatabaseTracingMiddleware, Metrics};

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_LIST_ITEMS: usize = 1000;

/// Key-based storage contract for one record type
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Upsert keyed by the record's own `(partition key, operation)`
    async fn save(&self, record: &R) -> RepositoryResult<()>;

    /// `None` when nothing is stored under the key
    async fn get(&self, partition_key: &str, operation: &str) -> RepositoryResult<Option<R>>;

    /// Every record of type `R` in the partition, in sort-key order
    async fn list_by_partition(&self, partition_key: &str) -> RepositoryResult<Vec<R>>;

    /// Every record of type `R` in the table, bounded by the list ceiling
    async fn list_all(&self) -> RepositoryResult<Vec<R>>;
}

/// Paging limits applied to listing calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub page_size: usize,
    pub max_list_items: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_list_items: DEFAULT_MAX_LIST_ITEMS,
        }
    }
}

/// One decoded page of a table walk
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage<R> {
    pub records: Vec<R>,
    pub next_cursor: Option<RecordKey>,
}

/// `Repository` implementation for every record type living in one table
pub struct TableRepository {
    store: Arc<dyn ItemStore>,
    limits: ListLimits,
    db_tracing: Option<DatabaseTracingMiddleware>,
    metrics: Option<Arc<Metrics>>,
}

impl TableRepository {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            limits: ListLimits::default(),
            db_tracing: None,
            metrics: None,
        }
    }

    pub fn with_limits(mut self, limits: ListLimits) -> Self {
        self.limits = ListLimits {
            page_size: limits.page_size.max(1),
            max_list_items: limits.max_list_items,
        };
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.db_tracing = Some(DatabaseTracingMiddleware::new(metrics.clone()));
        self.metrics = Some(metrics);
        self
    }

    pub fn table(&self) -> &TableSpec {
        self.store.table()
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    /// One page of a full-table walk over records of type `R`. Pass the
    /// returned cursor back in to continue; `None` means the walk is done.
    #[instrument(skip(self, cursor), fields(table = %self.table().table_name, kind = %R::KIND))]
    pub async fn scan_page<R: Record>(
        &self,
        cursor: Option<RecordKey>,
        limit: usize,
    ) -> RepositoryResult<RecordPage<R>> {
        self.ensure_table::<R>()?;

        let page = self
            .traced(
                "Scan",
                self.store.scan(R::KIND, PageRequest::after(limit.max(1), cursor)),
            )
            .await?;

        Ok(RecordPage {
            records: self.decode_page::<R>(page.items)?,
            next_cursor: page.next_cursor,
        })
    }

    fn ensure_table<R: Record>(&self) -> RepositoryResult<()> {
        let table = self.table();
        if R::KIND.table() != table.family {
            return Err(ValidationError::WrongTable {
                kind: R::KIND,
                table: table.table_name.clone(),
            }
            .into());
        }
        Ok(())
    }

    async fn traced<T, F>(&self, operation: &str, future: F) -> RepositoryResult<T>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        match &self.db_tracing {
            Some(db_tracing) => {
                db_tracing
                    .trace_operation(operation, &self.table().table_name, future)
                    .await
            }
            None => future.await,
        }
    }

    fn record_outcome<R: Record, T>(
        &self,
        operation: &str,
        result: &RepositoryResult<T>,
        found: impl FnOnce(&T) -> bool,
    ) {
        if let Some(metrics) = &self.metrics {
            let status = match result {
                Ok(value) if found(value) => "success",
                Ok(_) => "not_found",
                Err(_) => "error",
            };
            metrics.record_record_operation(operation, R::KIND.as_str(), status);
        }
    }

    /// Decode listed items. The first item that does not decode as an `R`
    /// fails the whole listing.
    fn decode_page<R: Record>(&self, items: Vec<Item>) -> RepositoryResult<Vec<R>> {
        let table = self.table();
        items
            .into_iter()
            .map(|item| {
                decode_stored::<R>(table, item).map_err(|e| {
                    warn!(kind = %R::KIND, error = %e, "Stored item failed to decode");
                    e
                })
            })
            .collect()
    }

    async fn collect_pages<R, F, Fut>(&self, operation: &str, mut fetch: F) -> RepositoryResult<Vec<R>>
    where
        R: Record,
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = RepositoryResult<ItemPage>>,
    {
        let mut records = Vec::new();
        let mut cursor = None;

        loop {
            let page = self
                .traced(operation, fetch(PageRequest::after(self.limits.page_size, cursor)))
                .await?;

            records.extend(self.decode_page::<R>(page.items)?);
            if records.len() > self.limits.max_list_items {
                warn!(
                    kind = %R::KIND,
                    limit = self.limits.max_list_items,
                    "Listing exceeded the configured ceiling"
                );
                return Err(RepositoryError::ResultLimitExceeded {
                    limit: self.limits.max_list_items,
                });
            }

            cursor = page.next_cursor;
            if cursor.is_none() {
                return Ok(records);
            }
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for TableRepository {
    #[instrument(skip(self, record), fields(table = %self.table().table_name, kind = %R::KIND))]
    async fn save(&self, record: &R) -> RepositoryResult<()> {
        let result = async {
            self.ensure_table::<R>()?;
            let item = to_stored_item(self.table(), record)?;
            self.traced("PutItem", self.store.put_item(item)).await
        }
        .await;

        self.record_outcome::<R, _>("save", &result, |_| true);
        if result.is_ok() {
            let key = record.key();
            info!(partition_key = %key.partition_key, operation = %key.operation, "Record saved");
        }
        result
    }

    #[instrument(skip(self), fields(table = %self.table().table_name, kind = %R::KIND))]
    async fn get(&self, partition_key: &str, operation: &str) -> RepositoryResult<Option<R>> {
        let result = async {
            self.ensure_table::<R>()?;
            let key = RecordKey::new(partition_key, operation);
            self.table().validate_key(&key)?;

            match self.traced("GetItem", self.store.get_item(&key)).await? {
                Some(item) => decode_stored::<R>(self.table(), item).map(Some),
                None => Ok(None),
            }
        }
        .await;

        self.record_outcome::<R, _>("get", &result, Option::is_some);
        if let Ok(None) = result {
            info!("Record not found");
        }
        result
    }

    #[instrument(skip(self), fields(table = %self.table().table_name, kind = %R::KIND))]
    async fn list_by_partition(&self, partition_key: &str) -> RepositoryResult<Vec<R>> {
        let result = async {
            self.ensure_table::<R>()?;
            validate_partition_key(self.table().partition_key_attribute(), partition_key)?;

            self.collect_pages::<R, _, _>("Query", |page| {
                self.store.query_partition(partition_key, R::KIND, page)
            })
            .await
        }
        .await;

        self.record_outcome::<R, _>("list_by_partition", &result, |_| true);
        if let Ok(records) = &result {
            info!(count = records.len(), "Partition listed");
        }
        result
    }

    #[instrument(skip(self), fields(table = %self.table().table_name, kind = %R::KIND))]
    async fn list_all(&self) -> RepositoryResult<Vec<R>> {
        let result = async {
            self.ensure_table::<R>()?;
            self.collect_pages::<R, _, _>("Scan", |page| self.store.scan(R::KIND, page))
                .await
        }
        .await;

        self.record_outcome::<R, _>("list_all", &result, |_| true);
        if let Ok(records) = &result {
            info!(count = records.len(), "Table listed");
        }
        result
    }
}
