use super::{ValidationError, ValidationResult};

/// DynamoDB key size limits in bytes
pub const MAX_PARTITION_KEY_BYTES: usize = 2048;
pub const MAX_SORT_KEY_BYTES: usize = 1024;

/// Attribute names the repository writes itself and a payload may not shadow
pub const RESERVED_ATTRIBUTES: [&str; 4] = ["delegationId", "userId", "operation", "recordType"];

/// Validate a partition key value
pub fn validate_partition_key(field: &str, value: &str) -> ValidationResult<()> {
    validate_key_part(field, value, MAX_PARTITION_KEY_BYTES)
}

/// Validate an `operation` sort key value
pub fn validate_operation(value: &str) -> ValidationResult<()> {
    validate_key_part("operation", value, MAX_SORT_KEY_BYTES)
}

fn validate_key_part(field: &str, value: &str, max_length: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if value.len() > max_length {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length,
            actual_length: value.len(),
        });
    }

    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.escape_debug().to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Reject payload attribute names that collide with key or discriminator attributes
pub fn validate_attribute_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "attributes".to_string(),
            value: name.to_string(),
            reason: "Attribute name cannot be empty".to_string(),
        });
    }

    if RESERVED_ATTRIBUTES.contains(&name) {
        return Err(ValidationError::ReservedAttribute {
            name: name.to_string(),
        });
    }

    Ok(())
}
