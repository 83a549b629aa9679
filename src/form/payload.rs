//! Draft serialization
//!
//! The serializer walks the schema's declared `(field, kind)` list and branches
//! on the kind, never on the runtime shape of the value. Drafts with pending
//! files become multipart bodies; everything else is sent as JSON.

use super::convert::date_to_input_string;
use super::value::{format_number, FieldValue};
use crate::api::{Attachment, MultipartBody, Payload};
use crate::resource::ResourceSchema;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Build the request body for a draft
pub fn build_payload(
    schema: &ResourceSchema,
    draft: &BTreeMap<String, FieldValue>,
    files: &[Attachment],
) -> Payload {
    if files.is_empty() {
        Payload::Json(build_json(schema, draft))
    } else {
        Payload::Multipart(build_multipart(schema, draft, files))
    }
}

/// JSON object with one entry per schema field
pub fn build_json(schema: &ResourceSchema, draft: &BTreeMap<String, FieldValue>) -> Value {
    let mut map = Map::new();
    for field in &schema.fields {
        let Some(value) = draft.get(&field.name) else {
            continue;
        };
        map.insert(field.name.clone(), json_value(value));
    }
    Value::Object(map)
}

fn json_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Number(n) => n.map(json_number).unwrap_or(Value::Null),
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::Date(d) => d
            .map(|d| Value::String(date_to_input_string(d)))
            .unwrap_or(Value::Null),
        FieldValue::List(items) | FieldValue::Refs(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        FieldValue::Ref(id) => id.clone().map(Value::String).unwrap_or(Value::Null),
    }
}

fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Multipart body: scalars as strings, arrays as one part per element, files last
pub fn build_multipart(
    schema: &ResourceSchema,
    draft: &BTreeMap<String, FieldValue>,
    files: &[Attachment],
) -> MultipartBody {
    let mut body = MultipartBody::new();

    for field in &schema.fields {
        let Some(value) = draft.get(&field.name) else {
            continue;
        };
        let name = field.name.as_str();

        match value {
            FieldValue::Text(s) => body.push_text(name, s.clone()),
            FieldValue::Number(Some(n)) => body.push_text(name, format_number(*n)),
            FieldValue::Bool(b) => body.push_text(name, b.to_string()),
            FieldValue::Date(Some(d)) => body.push_text(name, date_to_input_string(*d)),
            FieldValue::Ref(Some(id)) => body.push_text(name, id.clone()),
            FieldValue::List(items) | FieldValue::Refs(items) => {
                for item in items {
                    body.push_text(name, item.clone());
                }
            }
            // Empty optional scalars have no multipart representation
            FieldValue::Number(None) | FieldValue::Date(None) | FieldValue::Ref(None) => {}
        }
    }

    if let Some(file_field) = &schema.file_field {
        for file in files {
            body.push_file(&file_field.name, file.clone());
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::convert::input_string_to_date;
    use crate::resource::get_resource;
    use serde_json::json;

    fn bootcamp_draft() -> BTreeMap<String, FieldValue> {
        let mut draft = BTreeMap::new();
        draft.insert("name".to_string(), FieldValue::Text("Rust 101".into()));
        draft.insert("category".to_string(), FieldValue::Ref(Some("c1".into())));
        draft.insert(
            "types".to_string(),
            FieldValue::List(vec!["online".into(), "weekend".into()]),
        );
        draft.insert(
            "startDate".to_string(),
            FieldValue::Date(input_string_to_date("2024-06-01")),
        );
        draft.insert("endDate".to_string(), FieldValue::Date(None));
        draft.insert("price".to_string(), FieldValue::Number(Some(499.0)));
        draft.insert("isPublished".to_string(), FieldValue::Bool(true));
        draft
    }

    #[test]
    fn test_json_payload_without_files() {
        let schema = get_resource("bootcamps").unwrap();
        let payload = build_payload(schema, &bootcamp_draft(), &[]);
        let json = payload.as_json().expect("json payload");

        assert_eq!(json["name"], "Rust 101");
        assert_eq!(json["category"], "c1");
        assert_eq!(json["types"], json!(["online", "weekend"]));
        assert_eq!(json["startDate"], "2024-06-01");
        assert_eq!(json["endDate"], Value::Null);
        assert_eq!(json["price"], json!(499));
        assert_eq!(json["isPublished"], true);
        // Fields missing from the draft are not sent
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_multipart_arrays_are_one_part_per_element() {
        let schema = get_resource("bootcamps").unwrap();
        let files = vec![
            Attachment::new("a.png", "image/png", vec![1]),
            Attachment::new("b.jpg", "image/jpeg", vec![2]),
        ];
        let payload = build_payload(schema, &bootcamp_draft(), &files);
        let body = payload.as_multipart().expect("multipart payload");

        assert_eq!(body.texts("types"), vec!["online", "weekend"]);
        assert!(!body.texts("types").iter().any(|t| t.starts_with('[')));
        assert_eq!(body.files("images").len(), 2);
        assert_eq!(body.texts("price"), vec!["499"]);
        assert_eq!(body.texts("isPublished"), vec!["true"]);
        assert_eq!(body.count("endDate"), 0);
    }

    #[test]
    fn test_single_image_field_name() {
        let schema = get_resource("categories").unwrap();
        let mut draft = BTreeMap::new();
        draft.insert("name".to_string(), FieldValue::Text("Data".into()));
        let files = vec![Attachment::new("c.png", "image/png", vec![0])];

        let payload = build_payload(schema, &draft, &files);
        let body = payload.as_multipart().unwrap();
        assert_eq!(body.files("image").len(), 1);
        assert_eq!(body.count("images"), 0);
    }

    #[test]
    fn test_fractional_numbers_survive() {
        assert_eq!(json_number(12.5), json!(12.5));
        assert_eq!(json_number(-3.0), json!(-3));
    }
}
