// Services module - endpoint façades over the repositories

pub mod delegation_endpoint;
pub mod seed;
pub mod user_endpoint;

pub use delegation_endpoint::DelegationEndpoint;
pub use seed::{seed_delegation_fleet, SeedSummary};
pub use user_endpoint::UserEndpoint;
