use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

use super::{RecordKind, RepositoryResult};

/// A stored DynamoDB item
pub type Item = HashMap<String, AttributeValue>;

/// Two-part key shared by every record type: the table's partition key value
/// and the `operation` sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    pub partition_key: String,
    pub operation: String,
}

impl RecordKey {
    pub fn new(partition_key: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            operation: operation.into(),
        }
    }
}

/// Explicit codec implemented by each record type.
///
/// `encode` produces only the payload attributes. Key attributes and the
/// `recordType` discriminator are written by the repository layer, which
/// hands `decode` the key it split off the stored item.
pub trait Record: Sized + Send + Sync + 'static {
    const KIND: RecordKind;

    fn key(&self) -> RecordKey;

    fn encode(&self) -> RepositoryResult<Item>;

    fn decode(key: RecordKey, item: &Item) -> RepositoryResult<Self>;
}
