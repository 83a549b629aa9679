//! Relation references
//!
//! The backend returns a relation either as a bare id string or, when it
//! populated the relation, as an object such as `{"_id": "..", "name": ".."}`.
//! [`Ref`] captures both shapes; [`Ref::id`] is the single normalizer used
//! wherever a relation is compared or submitted.

use serde_json::Value;

/// Keys that may carry the id of an expanded relation
const ID_KEYS: &[&str] = &["_id", "id"];

/// Keys that may carry the display label of an expanded relation
const LABEL_KEYS: &[&str] = &["name", "title", "label"];

/// A relation field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    Bare(String),
    Expanded { id: String, label: String },
}

impl Ref {
    /// Read a relation from a JSON value; `None` for null, empty, or unknown shapes
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Ref::Bare(s.trim().to_string())),
            Value::Number(n) => Some(Ref::Bare(n.to_string())),
            Value::Object(map) => {
                let id = ID_KEYS
                    .iter()
                    .find_map(|k| map.get(*k).and_then(scalar_to_string))?;
                let label = LABEL_KEYS
                    .iter()
                    .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| id.clone());
                Some(Ref::Expanded { id, label })
            }
            _ => None,
        }
    }

    /// Read a list of relations; non-array values are treated as a single relation
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.iter().filter_map(Ref::from_value).collect(),
            other => Ref::from_value(other).into_iter().collect(),
        }
    }

    /// The normalized id
    pub fn id(&self) -> &str {
        match self {
            Ref::Bare(id) => id,
            Ref::Expanded { id, .. } => id,
        }
    }

    /// Display label; bare references fall back to their id
    pub fn label(&self) -> &str {
        match self {
            Ref::Bare(id) => id,
            Ref::Expanded { label, .. } => label,
        }
    }

    pub fn into_id(self) -> String {
        match self {
            Ref::Bare(id) => id,
            Ref::Expanded { id, .. } => id,
        }
    }
}

/// Normalize any relation-shaped JSON value to its id
pub fn normalize(value: &Value) -> Option<String> {
    Ref::from_value(value).map(Ref::into_id)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An option offered by a relation select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOption {
    pub id: String,
    pub label: String,
}

impl From<Ref> for RelationOption {
    fn from(r: Ref) -> Self {
        let label = r.label().to_string();
        Self {
            id: r.into_id(),
            label,
        }
    }
}
