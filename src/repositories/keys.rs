//! Key and discriminator encoding for stored items.
//!
//! A stored item is the record payload plus the table's two key attributes
//! and the `recordType` discriminator. Record codecs never see those three
//! attributes.

use aws_sdk_dynamodb::types::AttributeValue;

use crate::models::{
    validate_operation, validate_partition_key, Item, Record, RecordKey, RecordKind,
    RepositoryError, RepositoryResult, TableFamily,
};

pub const RECORD_TYPE_ATTRIBUTE: &str = "recordType";

/// A physical table: its family (which fixes the key schema) and its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub family: TableFamily,
    pub table_name: String,
}

impl TableSpec {
    pub fn new(family: TableFamily, table_name: impl Into<String>) -> Self {
        Self {
            family,
            table_name: table_name.into(),
        }
    }

    pub fn partition_key_attribute(&self) -> &'static str {
        self.family.partition_key_attribute()
    }

    pub fn sort_key_attribute(&self) -> &'static str {
        self.family.sort_key_attribute()
    }

    /// Key-only item used for GetItem and ExclusiveStartKey
    pub fn key_item(&self, key: &RecordKey) -> Item {
        let mut item = Item::with_capacity(2);
        item.insert(
            self.partition_key_attribute().to_string(),
            AttributeValue::S(key.partition_key.clone()),
        );
        item.insert(
            self.sort_key_attribute().to_string(),
            AttributeValue::S(key.operation.clone()),
        );
        item
    }

    /// Read the key pair back out of a stored item or a LastEvaluatedKey map
    pub fn key_from_item(&self, item: &Item) -> RepositoryResult<RecordKey> {
        let read = |attribute: &str| {
            item.get(attribute)
                .and_then(|v| v.as_s().ok())
                .cloned()
                .ok_or_else(|| {
                    RepositoryError::conversion(format!(
                        "Missing key attribute {} in table {}",
                        attribute, self.table_name
                    ))
                })
        };

        Ok(RecordKey::new(
            read(self.partition_key_attribute())?,
            read(self.sort_key_attribute())?,
        ))
    }

    /// Validate the key pair for this table's attribute names
    pub fn validate_key(&self, key: &RecordKey) -> RepositoryResult<()> {
        validate_partition_key(self.partition_key_attribute(), &key.partition_key)?;
        validate_operation(&key.operation)?;
        Ok(())
    }
}

/// A stored item split into its key, raw discriminator and payload
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub key: RecordKey,
    pub record_type: Option<String>,
    pub payload: Item,
}

/// Build the full item written to the table for `record`
pub fn to_stored_item<R: Record>(table: &TableSpec, record: &R) -> RepositoryResult<Item> {
    let key = record.key();
    table.validate_key(&key)?;

    let mut item = record.encode()?;
    item.extend(table.key_item(&key));
    item.insert(
        RECORD_TYPE_ATTRIBUTE.to_string(),
        AttributeValue::S(R::KIND.as_str().to_string()),
    );
    Ok(item)
}

pub fn split_stored_item(table: &TableSpec, mut item: Item) -> RepositoryResult<StoredItem> {
    let key = table.key_from_item(&item)?;
    item.remove(table.partition_key_attribute());
    item.remove(table.sort_key_attribute());

    let record_type = match item.remove(RECORD_TYPE_ATTRIBUTE) {
        Some(AttributeValue::S(value)) => Some(value),
        _ => None,
    };

    Ok(StoredItem {
        key,
        record_type,
        payload: item,
    })
}

/// Whether a stored item carries the discriminator for `kind`
pub fn has_record_type(item: &Item, kind: RecordKind) -> bool {
    matches!(
        item.get(RECORD_TYPE_ATTRIBUTE),
        Some(AttributeValue::S(value)) if value == kind.as_str()
    )
}

/// Decode a stored item as `R`, failing with `TypeMismatch` when the
/// discriminator is absent or names a different record type
pub fn decode_stored<R: Record>(table: &TableSpec, item: Item) -> RepositoryResult<R> {
    let stored = split_stored_item(table, item)?;

    match stored.record_type.as_deref() {
        Some(found) if found == R::KIND.as_str() => R::decode(stored.key, &stored.payload),
        found => Err(RepositoryError::TypeMismatch {
            expected: R::KIND,
            found: found.unwrap_or("<missing>").to_string(),
            partition_key: stored.key.partition_key,
            operation: stored.key.operation,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Car, Delegation, ValidationError};

    fn delegations() -> TableSpec {
        TableSpec::new(TableFamily::Delegations, "Delegations")
    }

    fn car() -> Car {
        Car {
            delegation_id: "D1".to_string(),
            operation: "car-1".to_string(),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2024,
            color: "Blue".to_string(),
            rented: false,
            price: 35,
        }
    }

    #[test]
    fn test_stored_item_carries_keys_and_discriminator() {
        let item = to_stored_item(&delegations(), &car()).unwrap();

        assert_eq!(item.get("delegationId").unwrap().as_s().unwrap(), "D1");
        assert_eq!(item.get("operation").unwrap().as_s().unwrap(), "car-1");
        assert_eq!(item.get("recordType").unwrap().as_s().unwrap(), "CAR");
        assert!(has_record_type(&item, RecordKind::Car));
        assert!(!has_record_type(&item, RecordKind::Delegation));
    }

    #[test]
    fn test_decode_stored_round_trip() {
        let table = delegations();
        let item = to_stored_item(&table, &car()).unwrap();

        let decoded: Car = decode_stored(&table, item).unwrap();
        assert_eq!(decoded, car());
    }

    #[test]
    fn test_decode_stored_type_mismatch() {
        let table = delegations();
        let item = to_stored_item(&table, &car()).unwrap();

        match decode_stored::<Delegation>(&table, item) {
            Err(RepositoryError::TypeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, RecordKind::Delegation);
                assert_eq!(found, "CAR");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_stored_missing_discriminator() {
        let table = delegations();
        let mut item = to_stored_item(&table, &car()).unwrap();
        item.remove(RECORD_TYPE_ATTRIBUTE);

        assert!(matches!(
            decode_stored::<Car>(&table, item),
            Err(RepositoryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut record = car();
        record.operation = String::new();

        match to_stored_item(&delegations(), &record) {
            Err(RepositoryError::Validation(ValidationError::RequiredField { field })) => {
                assert_eq!(field, "operation");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_key_item_uses_family_attributes() {
        let users = TableSpec::new(TableFamily::Users, "Users");
        let key = RecordKey::new("USER#001", "profile");
        let item = users.key_item(&key);

        assert_eq!(item.get("userId").unwrap().as_s().unwrap(), "USER#001");
        assert_eq!(users.key_from_item(&item).unwrap(), key);
    }
}
