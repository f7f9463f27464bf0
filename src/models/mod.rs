// Re-export all model types
pub use self::booking::*;
pub use self::car::*;
pub use self::delegation::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::record::*;
pub use self::user::*;
pub use self::validation::*;

pub mod attributes;
mod booking;
mod car;
mod delegation;
mod enums;
mod errors;
mod record;
mod user;
mod validation;
