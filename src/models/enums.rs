use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record types that share the renting tables, distinguished by the stored
/// `recordType` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    Delegation,
    Car,
    User,
    Booking,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Delegation,
        RecordKind::Car,
        RecordKind::User,
        RecordKind::Booking,
    ];

    /// Discriminator value written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Delegation => "DELEGATION",
            RecordKind::Car => "CAR",
            RecordKind::User => "USER",
            RecordKind::Booking => "BOOKING",
        }
    }

    /// Table family the record type lives in
    pub fn table(&self) -> TableFamily {
        match self {
            RecordKind::Delegation | RecordKind::Car => TableFamily::Delegations,
            RecordKind::User | RecordKind::Booking => TableFamily::Users,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DELEGATION" => Ok(RecordKind::Delegation),
            "CAR" => Ok(RecordKind::Car),
            "USER" => Ok(RecordKind::User),
            "BOOKING" => Ok(RecordKind::Booking),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

/// Physical table families and their partition key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFamily {
    Delegations,
    Users,
}

impl TableFamily {
    pub fn partition_key_attribute(&self) -> &'static str {
        match self {
            TableFamily::Delegations => "delegationId",
            TableFamily::Users => "userId",
        }
    }

    pub fn sort_key_attribute(&self) -> &'static str {
        "operation"
    }
}

impl fmt::Display for TableFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFamily::Delegations => write!(f, "delegations"),
            TableFamily::Users => write!(f, "users"),
        }
    }
}
