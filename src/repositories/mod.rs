pub mod dynamodb_store;
pub mod item_store;
pub mod keys;
pub mod memory_store;
pub mod retry;
pub mod table_manager;
pub mod table_repository;


pub use dynamodb_store::DynamoDbItemStore;
pub use item_store::{ItemPage, ItemStore, PageRequest};
pub use keys::{TableSpec, RECORD_TYPE_ATTRIBUTE};
pub use memory_store::InMemoryItemStore;
pub use retry::RetryPolicy;
pub use table_manager::TableManager;
pub use table_repository::{ListLimits, RecordPage, Repository, TableRepository};
