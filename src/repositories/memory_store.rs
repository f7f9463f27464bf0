use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::item_store::{ItemPage, ItemStore, PageRequest};
use super::keys::{has_record_type, TableSpec};
use crate::models::{Item, RecordKey, RecordKind, RepositoryResult, TableFamily};

type Key = (String, String);

/// In-memory table keyed by `(partition key, operation)`, used for tests and
/// local development. Paging and filtering follow the DynamoDB store.
pub struct InMemoryItemStore {
    table: TableSpec,
    items: RwLock<BTreeMap<Key, Item>>,
}

impl InMemoryItemStore {
    pub fn new(table: TableSpec) -> Self {
        Self {
            table,
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn delegations() -> Self {
        Self::new(TableSpec::new(TableFamily::Delegations, "Delegations"))
    }

    pub fn users() -> Self {
        Self::new(TableSpec::new(TableFamily::Users, "Users"))
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn to_key(key: &RecordKey) -> Key {
        (key.partition_key.clone(), key.operation.clone())
    }

    fn page_from<'a>(
        entries: impl Iterator<Item = (&'a Key, &'a Item)>,
        kind: RecordKind,
        limit: usize,
    ) -> ItemPage {
        let limit = limit.max(1);
        let mut entries = entries.peekable();
        let mut items = Vec::new();
        let mut examined = 0;
        let mut last_key = None;

        while examined < limit {
            let Some((key, item)) = entries.next() else {
                break;
            };
            examined += 1;
            last_key = Some(key);
            if has_record_type(item, kind) {
                items.push(item.clone());
            }
        }

        let next_cursor = match (entries.peek(), last_key) {
            (Some(_), Some((pk, sk))) => Some(RecordKey::new(pk, sk)),
            _ => None,
        };

        ItemPage { items, next_cursor }
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    fn table(&self) -> &TableSpec {
        &self.table
    }

    #[instrument(skip(self, item), fields(table = %self.table.table_name))]
    async fn put_item(&self, item: Item) -> RepositoryResult<()> {
        let key = self.table.key_from_item(&item)?;
        self.items.write().await.insert(Self::to_key(&key), item);
        debug!("Item stored");
        Ok(())
    }

    async fn get_item(&self, key: &RecordKey) -> RepositoryResult<Option<Item>> {
        Ok(self.items.read().await.get(&Self::to_key(key)).cloned())
    }

    async fn query_partition(
        &self,
        partition_key: &str,
        kind: RecordKind,
        page: PageRequest,
    ) -> RepositoryResult<ItemPage> {
        let items = self.items.read().await;

        let lower = match &page.start_after {
            Some(cursor) => Bound::Excluded(Self::to_key(cursor)),
            None => Bound::Included((partition_key.to_string(), String::new())),
        };

        let in_partition = items
            .range((lower, Bound::Unbounded))
            .take_while(|((pk, _), _)| pk == partition_key);

        Ok(Self::page_from(in_partition, kind, page.limit))
    }

    async fn scan(&self, kind: RecordKind, page: PageRequest) -> RepositoryResult<ItemPage> {
        let items = self.items.read().await;

        let lower = match &page.start_after {
            Some(cursor) => Bound::Excluded(Self::to_key(cursor)),
            None => Bound::Unbounded,
        };

        Ok(Self::page_from(
            items.range((lower, Bound::Unbounded)),
            kind,
            page.limit,
        ))
    }
}
