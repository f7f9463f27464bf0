use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

use super::attributes::{get_bool, get_i32, get_string, number_attr, string_attr};
use super::{Item, Record, RecordKey, RecordKind, RepositoryResult, TableFamily};

/// A car in a delegation's fleet, stored in the delegation's partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub delegation_id: String,
    pub operation: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub rented: bool,
    pub price: i32,
}

impl Car {
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
        let key = RecordKey::new(
            get_string(item, TableFamily::Delegations.partition_key_attribute())?,
            get_string(item, "operation")?,
        );
        Self::decode(key, item)
    }
}

impl Record for Car {
    const KIND: RecordKind = RecordKind::Car;

    fn key(&self) -> RecordKey {
        RecordKey::new(&self.delegation_id, &self.operation)
    }

    fn encode(&self) -> RepositoryResult<Item> {
        let mut item = Item::new();
        item.insert("make".to_string(), string_attr(&self.make));
        item.insert("model".to_string(), string_attr(&self.model));
        item.insert("year".to_string(), number_attr(self.year));
        item.insert("color".to_string(), string_attr(&self.color));
        item.insert("rented".to_string(), AttributeValue::Bool(self.rented));
        item.insert("price".to_string(), number_attr(self.price));
        Ok(item)
    }

    fn decode(key: RecordKey, item: &Item) -> RepositoryResult<Self> {
        Ok(Self {
            delegation_id: key.partition_key,
            operation: key.operation,
            make: get_string(item, "make")?,
            model: get_string(item, "model")?,
            year: get_i32(item, "year")?,
            color: get_string(item, "color")?,
            rented: get_bool(item, "rented")?,
            price: get_i32(item, "price")?,
        })
    }
}
