//! Draft field values
//!
//! Every schema field kind has one canonical in-memory shape. Values coming
//! from the backend, from schema defaults, or from raw text input are all
//! converted into that shape before they reach the draft.

use super::convert::{date_from_value, date_to_input_string, input_string_to_date, join_list, split_list};
use crate::resource::{normalize, FieldKind, Ref};
use chrono::NaiveDate;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Bool(bool),
    Date(Option<NaiveDate>),
    List(Vec<String>),
    Ref(Option<String>),
    Refs(Vec<String>),
}

impl FieldValue {
    /// Empty value of a kind
    pub fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::RichText => FieldValue::Text(String::new()),
            FieldKind::Number => FieldValue::Number(None),
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Date => FieldValue::Date(None),
            FieldKind::StringList => FieldValue::List(Vec::new()),
            FieldKind::Relation => FieldValue::Ref(None),
            FieldKind::RelationList => FieldValue::Refs(Vec::new()),
        }
    }

    /// Whether this value has the shape `kind` expects
    pub fn matches_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Text(_), FieldKind::Text | FieldKind::RichText)
                | (FieldValue::Number(_), FieldKind::Number)
                | (FieldValue::Bool(_), FieldKind::Bool)
                | (FieldValue::Date(_), FieldKind::Date)
                | (FieldValue::List(_), FieldKind::StringList)
                | (FieldValue::Ref(_), FieldKind::Relation)
                | (FieldValue::Refs(_), FieldKind::RelationList)
        )
    }

    /// Copy a backend value into the canonical shape, normalizing relations to ids
    pub fn from_json(kind: FieldKind, value: &Value) -> Self {
        match kind {
            FieldKind::Text | FieldKind::RichText => FieldValue::Text(match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => String::new(),
            }),
            FieldKind::Number => FieldValue::Number(match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            FieldKind::Bool => FieldValue::Bool(match value {
                Value::Bool(b) => *b,
                Value::String(s) => parse_bool(s).unwrap_or(false),
                _ => false,
            }),
            FieldKind::Date => FieldValue::Date(date_from_value(value)),
            FieldKind::StringList => FieldValue::List(match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect(),
                Value::String(s) => split_list(s),
                _ => Vec::new(),
            }),
            FieldKind::Relation => FieldValue::Ref(normalize(value)),
            FieldKind::RelationList => FieldValue::Refs(
                Ref::list_from_value(value)
                    .into_iter()
                    .map(Ref::into_id)
                    .collect(),
            ),
        }
    }

    /// Parse raw text input for a field of `kind`
    pub fn parse_input(kind: FieldKind, raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Text | FieldKind::RichText => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Number(None));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(|n| FieldValue::Number(Some(n)))
                    .ok_or_else(|| format!("'{}' is not a number", trimmed))
            }
            FieldKind::Bool => parse_bool(trimmed)
                .map(FieldValue::Bool)
                .ok_or_else(|| format!("'{}' is not yes/no", trimmed)),
            FieldKind::Date => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Date(None));
                }
                input_string_to_date(trimmed)
                    .map(|d| FieldValue::Date(Some(d)))
                    .ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", trimmed))
            }
            FieldKind::StringList => Ok(FieldValue::List(split_list(raw))),
            FieldKind::Relation => Ok(FieldValue::Ref(
                Some(trimmed.to_string()).filter(|s| !s.is_empty()),
            )),
            FieldKind::RelationList => Ok(FieldValue::Refs(split_list(raw))),
        }
    }

    /// Canonical text shown in an input widget
    pub fn to_input(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.map(format_number).unwrap_or_default(),
            FieldValue::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
            FieldValue::Date(d) => d.map(date_to_input_string).unwrap_or_default(),
            FieldValue::List(items) | FieldValue::Refs(items) => join_list(items),
            FieldValue::Ref(id) => id.clone().unwrap_or_default(),
        }
    }

    /// Whether a required field would be satisfied by this value
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Number(n) => n.is_some(),
            FieldValue::Bool(_) => true,
            FieldValue::Date(d) => d.is_some(),
            FieldValue::List(items) | FieldValue::Refs(items) => !items.is_empty(),
            FieldValue::Ref(id) => id.as_deref().is_some_and(|s| !s.is_empty()),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Some(true),
        "no" | "n" | "false" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Numbers without a fractional part print as integers
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relation_normalized_from_both_shapes() {
        let from_object = FieldValue::from_json(
            FieldKind::Relation,
            &json!({"_id": "c1", "name": "Design"}),
        );
        let from_id = FieldValue::from_json(FieldKind::Relation, &json!("c1"));
        assert_eq!(from_object, from_id);
        assert_eq!(from_id, FieldValue::Ref(Some("c1".to_string())));
    }

    #[test]
    fn test_relation_list_normalized() {
        let value = FieldValue::from_json(
            FieldKind::RelationList,
            &json!([{"_id": "p1", "name": "A"}, "p2"]),
        );
        assert_eq!(value, FieldValue::Refs(vec!["p1".into(), "p2".into()]));
    }

    #[test]
    fn test_string_list_from_array_and_string() {
        assert_eq!(
            FieldValue::from_json(FieldKind::StringList, &json!(["a", " ", 3])),
            FieldValue::List(vec!["a".into(), "3".into()])
        );
        assert_eq!(
            FieldValue::from_json(FieldKind::StringList, &json!("a, b")),
            FieldValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_parse_input_list() {
        assert_eq!(
            FieldValue::parse_input(FieldKind::StringList, " a, b ,, c\n d ").unwrap(),
            FieldValue::List(vec!["a".into(), "b".into(), "c".into(), "d".into()])
        );
    }

    #[test]
    fn test_parse_input_errors() {
        assert!(FieldValue::parse_input(FieldKind::Number, "12abc").is_err());
        assert!(FieldValue::parse_input(FieldKind::Date, "2024-13-01").is_err());
        assert!(FieldValue::parse_input(FieldKind::Bool, "maybe").is_err());
        assert!(FieldValue::parse_input(FieldKind::Number, "inf").is_err());
    }

    #[test]
    fn test_parse_input_empty_values() {
        assert_eq!(
            FieldValue::parse_input(FieldKind::Number, " ").unwrap(),
            FieldValue::Number(None)
        );
        assert_eq!(
            FieldValue::parse_input(FieldKind::Relation, "").unwrap(),
            FieldValue::Ref(None)
        );
    }

    #[test]
    fn test_to_input_is_canonical() {
        assert_eq!(FieldValue::Number(Some(499.0)).to_input(), "499");
        assert_eq!(FieldValue::Number(Some(12.5)).to_input(), "12.5");
        assert_eq!(
            FieldValue::List(vec!["a".into(), "b".into()]).to_input(),
            "a, b"
        );
        let date = input_string_to_date("2024-05-01").unwrap();
        assert_eq!(FieldValue::Date(Some(date)).to_input(), "2024-05-01");
    }

    #[test]
    fn test_is_present() {
        assert!(!FieldValue::Text("   ".into()).is_present());
        assert!(!FieldValue::List(vec![]).is_present());
        assert!(!FieldValue::Ref(Some(String::new())).is_present());
        assert!(FieldValue::Bool(false).is_present());
    }

    #[test]
    fn test_matches_kind() {
        assert!(FieldValue::Text("x".into()).matches_kind(FieldKind::RichText));
        assert!(!FieldValue::List(vec![]).matches_kind(FieldKind::RelationList));
    }
}
