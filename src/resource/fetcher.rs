//! Resource Fetcher
//!
//! Handles fetching records from the catalog API based on resource schemas.

use super::record::Record;
use super::reference::{Ref, RelationOption};
use super::registry::ResourceSchema;
use crate::api::{ApiError, ResourceClient};
use serde_json::Value;

/// Fetch the whole collection of a resource
pub async fn fetch_records(
    client: &ResourceClient,
    schema: &ResourceSchema,
) -> Result<Vec<Record>, ApiError> {
    let items = client.list(&schema.endpoint, &[]).await?;
    tracing::debug!("Fetched {} {}", items.len(), schema.key);
    Ok(items.into_iter().map(Record::new).collect())
}

/// Fetch a single record by id
pub async fn fetch_record(
    client: &ResourceClient,
    schema: &ResourceSchema,
    id: &str,
) -> Result<Record, ApiError> {
    let value = client.get(&schema.endpoint, id).await?;
    if value.is_null() {
        return Err(ApiError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        });
    }
    Ok(Record::new(value))
}

/// Fetch the options of a relation select (`/categories`, `/products`, ...)
pub async fn fetch_relation_options(
    client: &ResourceClient,
    source: &str,
) -> Result<Vec<RelationOption>, ApiError> {
    let items = client.list(source, &[]).await?;
    Ok(items
        .iter()
        .filter_map(Ref::from_value)
        .map(RelationOption::from)
        .collect())
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    let mut current = item;

    for part in parts {
        // Handle array index
        if let Ok(idx) = part.parse::<usize>() {
            current = match current.get(idx) {
                Some(v) => v,
                None => return "-".to_string(),
            };
        } else {
            current = match current.get(part) {
                Some(v) => v,
                None => return "-".to_string(),
            };
        }
    }

    match current {
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}
