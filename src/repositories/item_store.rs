use async_trait::async_trait;

use super::keys::TableSpec;
use crate::models::{Item, RecordKey, RecordKind, RepositoryResult};

/// One page request against a table. `limit` bounds the number of items the
/// store examines, so a page may hold fewer matches while still carrying a
/// cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub start_after: Option<RecordKey>,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            start_after: None,
        }
    }

    pub fn after(limit: usize, cursor: Option<RecordKey>) -> Self {
        Self {
            limit,
            start_after: cursor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub next_cursor: Option<RecordKey>,
}

/// Raw item operations against a single physical table
#[async_trait]
pub trait ItemStore: Send + Sync {
    fn table(&self) -> &TableSpec;

    /// Unconditional upsert keyed by the item's key attributes
    async fn put_item(&self, item: Item) -> RepositoryResult<()>;

    async fn get_item(&self, key: &RecordKey) -> RepositoryResult<Option<Item>>;

    /// Items in one partition carrying the `kind` discriminator, in sort-key order
    async fn query_partition(
        &self,
        partition_key: &str,
        kind: RecordKind,
        page: PageRequest,
    ) -> RepositoryResult<ItemPage>;

    /// Items across the whole table carrying the `kind` discriminator
    async fn scan(&self, kind: RecordKind, page: PageRequest) -> RepositoryResult<ItemPage>;
}
