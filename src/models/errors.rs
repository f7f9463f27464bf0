use thiserror::Error;

use super::RecordKind;

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Stored item type mismatch at ({partition_key}, {operation}): expected={expected}, found={found}")]
    TypeMismatch {
        expected: RecordKind,
        found: String,
        partition_key: String,
        operation: String,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed stored item: {message}")]
    Conversion { message: String },

    #[error("AWS SDK error: {message}")]
    AwsSdk { message: String },

    #[error("DynamoDB table not found: {table_name}. Ensure the table exists and IAM permissions are correct.")]
    TableNotFound { table_name: String },

    #[error("Request throttled: {message}")]
    Throttled { message: String },

    #[error("Timeout occurred during operation")]
    Timeout,

    #[error("Listing exceeded the maximum of {limit} records")]
    ResultLimitExceeded { limit: usize },
}

impl RepositoryError {
    /// Whether the storage adapter may retry the failed call
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionFailed { .. }
                | RepositoryError::Throttled { .. }
                | RepositoryError::Timeout
        )
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        RepositoryError::Conversion {
            message: message.into(),
        }
    }
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Reserved attribute name: {name}")]
    ReservedAttribute { name: String },

    #[error("Record kind {kind} does not belong to table family {table}")]
    WrongTable { kind: RecordKind, table: String },
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RepositoryError::TypeMismatch {
            expected: RecordKind::Car,
            found: "DELEGATION".to_string(),
            partition_key: "D1".to_string(),
            operation: "profile".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Stored item type mismatch at (D1, profile): expected=CAR, found=DELEGATION"
        );

        let validation_error = ValidationError::RequiredField {
            field: "delegationId".to_string(),
        };
        assert_eq!(
            validation_error.to_string(),
            "Required field missing: delegationId"
        );
    }

    #[test]
    fn test_error_conversion() {
        let validation_error = ValidationError::RequiredField {
            field: "operation".to_string(),
        };

        let repo_error: RepositoryError = validation_error.into();
        match repo_error {
            RepositoryError::Validation(ValidationError::RequiredField { field }) => {
                assert_eq!(field, "operation");
            }
            _ => panic!("Expected Validation conversion"),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(RepositoryError::Timeout.is_transient());
        assert!(RepositoryError::Throttled {
            message: "slow down".to_string()
        }
        .is_transient());
        assert!(!RepositoryError::conversion("missing make").is_transient());
        assert!(!RepositoryError::TableNotFound {
            table_name: "Delegations".to_string()
        }
        .is_transient());
    }
}
