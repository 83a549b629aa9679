//! Resource records
//!
//! A record is the JSON object the backend returns for one resource. The
//! core treats fields generically and reads them through the schema.

use super::fetcher::extract_json_value;
use super::reference::Ref;
use super::registry::{ColumnDef, FieldKind, ResourceSchema};
use crate::form::convert::{date_from_value, date_to_input_string};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    value: Value,
}

impl Record {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    /// Record id from the schema's id field, falling back to `_id` / `id`
    pub fn id(&self, schema: &ResourceSchema) -> Option<String> {
        [schema.id_field.as_str(), "_id", "id"]
            .iter()
            .find_map(|key| match self.value.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
    }

    pub fn name(&self, schema: &ResourceSchema) -> &str {
        self.get(&schema.name_field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    pub fn description(&self, schema: &ResourceSchema) -> &str {
        schema
            .description_field
            .as_deref()
            .and_then(|f| self.get(f))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// Category relation, whichever shape the backend sent
    pub fn category(&self, schema: &ResourceSchema) -> Option<Ref> {
        let field = schema.category_field.as_deref()?;
        self.get(field).and_then(Ref::from_value)
    }

    /// Image paths already stored on the server
    pub fn image_paths(&self, schema: &ResourceSchema) -> Vec<String> {
        let Some(file_field) = &schema.file_field else {
            return Vec::new();
        };

        match self.get(&file_field.name) {
            Some(Value::String(path)) if !path.is_empty() => vec![path.clone()],
            Some(Value::Array(paths)) => paths
                .iter()
                .filter_map(|p| p.as_str())
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Label used in messages ("Delete 'Rust 101'?"), falling back to the id
    pub fn label(&self, schema: &ResourceSchema) -> String {
        let name = self.name(schema);
        if !name.is_empty() {
            return name.to_string();
        }
        self.id(schema).unwrap_or_else(|| "-".to_string())
    }

    /// Display text for a table column
    pub fn column_value(&self, schema: &ResourceSchema, column: &ColumnDef) -> String {
        match schema.field(&column.json_path) {
            Some(field) => self.field_display(&field.name, field.kind),
            None => {
                let raw = extract_json_value(&self.value, &column.json_path);
                // Timestamps render as their calendar date
                date_from_value(&Value::String(raw.clone()))
                    .map(date_to_input_string)
                    .unwrap_or(raw)
            }
        }
    }

    /// Display text for a field of a known kind
    pub fn field_display(&self, name: &str, kind: FieldKind) -> String {
        let Some(value) = self.get(name) else {
            return "-".to_string();
        };

        match kind {
            FieldKind::Relation => Ref::from_value(value)
                .map(|r| r.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
            FieldKind::RelationList => {
                let labels: Vec<String> = Ref::list_from_value(value)
                    .iter()
                    .map(|r| r.label().to_string())
                    .collect();
                if labels.is_empty() {
                    "-".to_string()
                } else {
                    labels.join(", ")
                }
            }
            FieldKind::StringList => match value {
                Value::Array(items) => {
                    let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                    if parts.is_empty() {
                        "-".to_string()
                    } else {
                        parts.join(", ")
                    }
                }
                Value::String(s) if !s.is_empty() => s.clone(),
                _ => "-".to_string(),
            },
            FieldKind::Date => date_from_value(value)
                .map(date_to_input_string)
                .unwrap_or_else(|| "-".to_string()),
            _ => extract_json_value(&self.value, name),
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
