use serde::{Deserialize, Serialize};

use super::attributes::{get_string, string_attr};
use super::{Item, Record, RecordKey, RecordKind, RepositoryResult};

/// Stored attribute name for `username`
const USERNAME_ATTRIBUTE: &str = "userName";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub operation: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;

    fn key(&self) -> RecordKey {
        RecordKey::new(&self.user_id, &self.operation)
    }

    fn encode(&self) -> RepositoryResult<Item> {
        let mut item = Item::new();
        item.insert(USERNAME_ATTRIBUTE.to_string(), string_attr(&self.username));
        item.insert("email".to_string(), string_attr(&self.email));
        item.insert("fullName".to_string(), string_attr(&self.full_name));
        item.insert("phone".to_string(), string_attr(&self.phone));
        Ok(item)
    }

    fn decode(key: RecordKey, item: &Item) -> RepositoryResult<Self> {
        Ok(Self {
            user_id: key.partition_key,
            operation: key.operation,
            username: get_string(item, USERNAME_ATTRIBUTE)?,
            email: get_string(item, "email")?,
            full_name: get_string(item, "fullName")?,
            phone: get_string(item, "phone")?,
        })
    }
}
