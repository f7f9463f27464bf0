use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attributes::{get_string, item_to_json_map, json_to_attribute, string_attr};
use super::{
    validate_attribute_name, Item, Record, RecordKey, RecordKind, RepositoryResult,
    TableFamily,
};

pub const PROFILE_OPERATION: &str = "profile";

/// A rental office. Only the key pair is structural; everything else is an
/// open attribute bag (`name`, `address`, `city`, `availableCarQty`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub delegation_id: String,
    pub operation: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Delegation {
    pub fn new(delegation_id: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            delegation_id: delegation_id.into(),
            operation: operation.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn is_profile(&self) -> bool {
        self.operation == PROFILE_OPERATION
    }

    /// Nested map form used when a delegation is embedded in another record
    pub(crate) fn to_nested(&self) -> RepositoryResult<AttributeValue> {
        let mut item = self.encode()?;
        item.insert(
            TableFamily::Delegations.partition_key_attribute().to_string(),
            string_attr(&self.delegation_id),
        );
        item.insert("operation".to_string(), string_attr(&self.operation));
        Ok(AttributeValue::M(item))
    }

    pub(crate) fn from_nested(item: &Item) -> RepositoryResult<Self> {
        let pk_attribute = TableFamily::Delegations.partition_key_attribute();
        let key = RecordKey::new(
            get_string(item, pk_attribute)?,
            get_string(item, "operation")?,
        );
        let mut payload = item.clone();
        payload.remove(pk_attribute);
        payload.remove("operation");
        Self::decode(key, &payload)
    }
}

impl Record for Delegation {
    const KIND: RecordKind = RecordKind::Delegation;

    fn key(&self) -> RecordKey {
        RecordKey::new(&self.delegation_id, &self.operation)
    }

    fn encode(&self) -> RepositoryResult<Item> {
        let mut item = Item::with_capacity(self.attributes.len());
        for (name, value) in &self.attributes {
            validate_attribute_name(name)?;
            item.insert(name.clone(), json_to_attribute(value));
        }
        Ok(item)
    }

    fn decode(key: RecordKey, item: &Item) -> RepositoryResult<Self> {
        Ok(Self {
            delegation_id: key.partition_key,
            operation: key.operation,
            attributes: item_to_json_map(item)?,
        })
    }
}
