//! Attribute conversion helpers shared by the record codecs.
//!
//! Pure functions over `AttributeValue` maps, testable without DynamoDB access.

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use super::{Item, RepositoryError, RepositoryResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn get_string(item: &Item, key: &str) -> RepositoryResult<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| missing_field(key))
}

pub fn get_bool(item: &Item, key: &str) -> RepositoryResult<bool> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| missing_field(key))
}

pub fn get_i32(item: &Item, key: &str) -> RepositoryResult<i32> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| missing_field(key))?;
    raw.parse::<i32>().map_err(|e| {
        RepositoryError::conversion(format!("Invalid integer {}={}: {}", key, raw, e))
    })
}

pub fn get_decimal(item: &Item, key: &str) -> RepositoryResult<Decimal> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| missing_field(key))?;
    Decimal::from_str(raw).map_err(|e| {
        RepositoryError::conversion(format!("Invalid decimal {}={}: {}", key, raw, e))
    })
}

pub fn get_date(item: &Item, key: &str) -> RepositoryResult<NaiveDate> {
    let s = get_string(item, key)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|e| RepositoryError::conversion(format!("Invalid date {}: {}", key, e)))
}

/// Nested map attribute; absent and NULL both read as `None`
pub fn get_optional_map<'a>(item: &'a Item, key: &str) -> RepositoryResult<Option<&'a Item>> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::M(map)) => Ok(Some(map)),
        Some(_) => Err(RepositoryError::conversion(format!(
            "Invalid map attribute: {}",
            key
        ))),
    }
}

pub fn string_attr(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

pub fn number_attr(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub fn date_attr(value: &NaiveDate) -> AttributeValue {
    AttributeValue::S(value.format(DATE_FORMAT).to_string())
}

fn missing_field(key: &str) -> RepositoryError {
    RepositoryError::conversion(format!("Missing or invalid field: {}", key))
}

/// Convert an arbitrary JSON value into its DynamoDB representation
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a stored attribute back into JSON. Binary attributes have no JSON
/// counterpart and are rejected.
pub fn attribute_to_json(value: &AttributeValue) -> RepositoryResult<Value> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<RepositoryResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<RepositoryResult<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_json_map(map).map(Value::Object),
        _ => Err(RepositoryError::conversion(
            "Unsupported attribute type for JSON conversion",
        )),
    }
}

/// Convert a whole item into a JSON object, sorted by attribute name
pub fn item_to_json_map(item: &Item) -> RepositoryResult<Map<String, Value>> {
    let mut names: Vec<&String> = item.keys().collect();
    names.sort();

    let mut map = Map::new();
    for name in names {
        map.insert(name.clone(), attribute_to_json(&item[name])?);
    }
    Ok(map)
}

fn parse_number(raw: &str) -> RepositoryResult<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| RepositoryError::conversion(format!("Invalid number: {}", raw)))
}
