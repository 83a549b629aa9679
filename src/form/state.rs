//! Resource form state
//!
//! Holds the draft of one create/edit session: a copy of the record being
//! edited (or the schema template), the files pending upload, and the logic
//! that validates and submits it.

use super::error::{FieldIssue, SubmitError, ValidationError};
use super::payload::build_payload;
use super::value::FieldValue;
use crate::api::{Attachment, Payload, ResourceClient};
use crate::resource::{FieldDef, FieldKind, Record, ResourceSchema};
use std::collections::BTreeMap;

/// Draft of a create or edit form
#[derive(Debug, Clone)]
pub struct ResourceFormState {
    schema: &'static ResourceSchema,
    editing: Option<String>,
    draft: BTreeMap<String, FieldValue>,
    files: Vec<Attachment>,
    existing_images: Vec<String>,
}

impl ResourceFormState {
    /// A form holding the creation template
    pub fn new(schema: &'static ResourceSchema) -> Self {
        let mut form = Self {
            schema,
            editing: None,
            draft: BTreeMap::new(),
            files: Vec::new(),
            existing_images: Vec::new(),
        };
        form.init_from_resource(None);
        form
    }

    /// A form editing `record`
    pub fn edit(schema: &'static ResourceSchema, record: &Record) -> Self {
        let mut form = Self::new(schema);
        form.init_from_resource(Some(record));
        form
    }

    /// Reset the draft to the template (`None`) or to a copy of `resource`
    pub fn init_from_resource(&mut self, resource: Option<&Record>) {
        self.files.clear();
        self.draft = self
            .schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), initial_value(field, resource)))
            .collect();

        match resource {
            Some(record) => {
                self.editing = record.id(self.schema);
                self.existing_images = record.image_paths(self.schema);
                if self.editing.is_none() {
                    tracing::warn!("Editing a {} record without an id", self.schema.key);
                }
            }
            None => {
                self.editing = None;
                self.existing_images.clear();
            }
        }
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.draft.get(field)
    }

    pub fn draft(&self) -> &BTreeMap<String, FieldValue> {
        &self.draft
    }

    /// Canonical input text of a field
    pub fn input_text(&self, field: &str) -> String {
        self.draft
            .get(field)
            .map(FieldValue::to_input)
            .unwrap_or_default()
    }

    fn field_def(&self, field: &str) -> Result<&'static FieldDef, FieldIssue> {
        self.schema
            .field(field)
            .ok_or_else(|| FieldIssue::new(field, "unknown field"))
    }

    /// Set a typed value; the value must match the field's kind
    pub fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldIssue> {
        let def = self.field_def(field)?;
        if !value.matches_kind(def.kind) {
            return Err(FieldIssue::new(
                field,
                format!("expected {}", def.kind.as_str()),
            ));
        }
        self.draft.insert(def.name.clone(), value);
        Ok(())
    }

    /// Set a field from raw text input (lists are split, dates parsed)
    pub fn set_field_raw(&mut self, field: &str, raw: &str) -> Result<(), FieldIssue> {
        let def = self.field_def(field)?;
        let value =
            FieldValue::parse_input(def.kind, raw).map_err(|msg| FieldIssue::new(field, msg))?;
        self.draft.insert(def.name.clone(), value);
        Ok(())
    }

    /// Replace the files pending upload
    ///
    /// Single-file schemas keep only the first file.
    pub fn set_files(&mut self, mut files: Vec<Attachment>) -> Result<(), FieldIssue> {
        let Some(file_field) = &self.schema.file_field else {
            return Err(FieldIssue::new("files", "this resource has no uploads"));
        };

        if !file_field.multiple && files.len() > 1 {
            tracing::debug!(
                "{} accepts a single {}, dropping {} extra file(s)",
                self.schema.key,
                file_field.name,
                files.len() - 1
            );
            files.truncate(1);
        }
        self.files = files;
        Ok(())
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    /// Image paths already stored on the edited record
    pub fn existing_images(&self) -> &[String] {
        &self.existing_images
    }

    /// Client-side checks run before any request is made
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        for field in &self.schema.fields {
            if !field.required {
                continue;
            }
            let present = match self.draft.get(&field.name) {
                Some(FieldValue::Text(s)) if field.kind == FieldKind::RichText => {
                    !strip_tags(s).trim().is_empty()
                }
                Some(value) => value.is_present(),
                None => false,
            };
            if !present {
                let message = if field.kind.is_list() {
                    "needs at least one entry"
                } else {
                    "is required"
                };
                errors.push(FieldIssue::new(&field.name, message));
            }
        }

        if let Some((start, end)) = &self.schema.date_range {
            if let (Some(FieldValue::Date(Some(s))), Some(FieldValue::Date(Some(e)))) =
                (self.draft.get(start), self.draft.get(end))
            {
                if e < s {
                    errors.push(FieldIssue::new(end, "must not be before the start date"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Request body for the current draft: multipart when files are pending
    pub fn payload(&self) -> Payload {
        build_payload(self.schema, &self.draft, &self.files)
    }

    /// Validate, then create or update; the draft is discarded on success
    ///
    /// The caller owns the list refresh.
    pub async fn submit(&mut self, client: &ResourceClient) -> Result<Record, SubmitError> {
        self.validate()?;

        let payload = self.payload();
        let endpoint = &self.schema.endpoint;
        let value = match &self.editing {
            Some(id) => {
                tracing::info!(
                    "Updating {} {} ({})",
                    self.schema.key,
                    id,
                    if payload.is_multipart() { "multipart" } else { "json" }
                );
                client.update(endpoint, id, &payload).await?
            }
            None => {
                tracing::info!(
                    "Creating {} ({})",
                    self.schema.key,
                    if payload.is_multipart() { "multipart" } else { "json" }
                );
                client.create(endpoint, &payload).await?
            }
        };

        self.init_from_resource(None);
        Ok(Record::new(value))
    }
}

fn initial_value(field: &FieldDef, resource: Option<&Record>) -> FieldValue {
    match resource {
        Some(record) => record
            .get(&field.name)
            .map(|v| FieldValue::from_json(field.kind, v))
            .unwrap_or_else(|| FieldValue::empty_for(field.kind)),
        None => field
            .default
            .as_ref()
            .map(|v| FieldValue::from_json(field.kind, v))
            .unwrap_or_else(|| FieldValue::empty_for(field.kind)),
    }
}

/// Text content of rich-text HTML, for emptiness checks
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::convert::input_string_to_date;
    use crate::resource::get_resource;
    use serde_json::json;

    fn bootcamps() -> &'static ResourceSchema {
        get_resource("bootcamps").unwrap()
    }

    fn existing() -> Record {
        Record::new(json!({
            "_id": "b1",
            "name": "Rust 101",
            "description": "<p>Systems</p>",
            "category": {"_id": "c1", "name": "Systems"},
            "types": ["online"],
            "startDate": "2024-06-01T00:00:00.000Z",
            "endDate": "2024-06-30T00:00:00.000Z",
            "events": [{"_id": "e1", "title": "Kickoff"}, "e2"],
            "images": ["/uploads/one.png"]
        }))
    }

    #[test]
    fn test_template_defaults() {
        let form = ResourceFormState::new(bootcamps());
        assert!(!form.is_editing());
        assert_eq!(form.value("isPublished"), Some(&FieldValue::Bool(true)));
        assert_eq!(form.value("types"), Some(&FieldValue::List(vec![])));
        assert_eq!(form.value("category"), Some(&FieldValue::Ref(None)));
    }

    #[test]
    fn test_edit_normalizes_relations() {
        let form = ResourceFormState::edit(bootcamps(), &existing());
        assert_eq!(form.editing_id(), Some("b1"));
        assert_eq!(form.value("category"), Some(&FieldValue::Ref(Some("c1".into()))));
        assert_eq!(
            form.value("events"),
            Some(&FieldValue::Refs(vec!["e1".into(), "e2".into()]))
        );
        assert_eq!(form.input_text("startDate"), "2024-06-01");
        assert_eq!(form.existing_images(), ["/uploads/one.png".to_string()]);
    }

    #[test]
    fn test_bare_and_expanded_category_give_same_draft() {
        let mut bare = existing().into_value();
        bare["category"] = json!("c1");
        let a = ResourceFormState::edit(bootcamps(), &existing());
        let b = ResourceFormState::edit(bootcamps(), &Record::new(bare));
        assert_eq!(a.value("category"), b.value("category"));
    }

    #[test]
    fn test_edit_does_not_touch_original() {
        let record = existing();
        let mut form = ResourceFormState::edit(bootcamps(), &record);
        form.set_field_raw("name", "Renamed").unwrap();
        assert_eq!(record.get("name").unwrap(), "Rust 101");
        assert_eq!(form.input_text("name"), "Renamed");
    }

    #[test]
    fn test_set_field_kind_mismatch() {
        let mut form = ResourceFormState::new(bootcamps());
        let err = form
            .set_field("types", FieldValue::Text("online".into()))
            .unwrap_err();
        assert_eq!(err.field, "types");
        assert!(form.set_field("nope", FieldValue::Bool(true)).is_err());
    }

    #[test]
    fn test_set_field_raw_splits_lists() {
        let mut form = ResourceFormState::new(bootcamps());
        form.set_field_raw("types", " online, onsite ,,\n weekend ").unwrap();
        assert_eq!(form.input_text("types"), "online, onsite, weekend");
    }

    #[test]
    fn test_set_field_raw_rejects_bad_date() {
        let mut form = ResourceFormState::new(bootcamps());
        let err = form.set_field_raw("startDate", "June 1st").unwrap_err();
        assert_eq!(err.field, "startDate");
        assert_eq!(form.value("startDate"), Some(&FieldValue::Date(None)));
    }

    #[test]
    fn test_validation_required_fields() {
        let form = ResourceFormState::new(bootcamps());
        let err = form.validate().unwrap_err();
        assert!(err.for_field("name").is_some());
        assert!(err.for_field("category").is_some());
        assert_eq!(err.for_field("types").unwrap().message, "needs at least one entry");
        assert!(err.for_field("location").is_none());
    }

    #[test]
    fn test_validation_date_range() {
        let mut form = ResourceFormState::edit(bootcamps(), &existing());
        assert!(form.validate().is_ok());

        form.set_field(
            "endDate",
            FieldValue::Date(input_string_to_date("2024-05-01")),
        )
        .unwrap();
        let err = form.validate().unwrap_err();
        assert!(err.for_field("endDate").is_some());
    }

    #[test]
    fn test_rich_text_markup_only_is_empty() {
        assert!(strip_tags("<p><br></p>").trim().is_empty());
        assert_eq!(strip_tags("<b>Hi</b>&nbsp;there"), "Hi there");
    }

    #[test]
    fn test_single_file_schema_keeps_first() {
        let mut form = ResourceFormState::new(get_resource("categories").unwrap());
        form.set_files(vec![
            Attachment::new("a.png", "image/png", vec![]),
            Attachment::new("b.png", "image/png", vec![]),
        ])
        .unwrap();
        assert_eq!(form.files().len(), 1);
        assert_eq!(form.files()[0].file_name, "a.png");
    }

    #[test]
    fn test_payload_switches_on_files() {
        let mut form = ResourceFormState::edit(bootcamps(), &existing());
        assert!(!form.payload().is_multipart());

        form.set_files(vec![Attachment::new("a.png", "image/png", vec![1])])
            .unwrap();
        assert!(form.payload().is_multipart());
    }

    #[test]
    fn test_reinit_clears_files_and_target() {
        let mut form = ResourceFormState::edit(bootcamps(), &existing());
        form.set_files(vec![Attachment::new("a.png", "image/png", vec![1])])
            .unwrap();
        form.init_from_resource(None);
        assert!(form.files().is_empty());
        assert!(!form.is_editing());
        assert!(form.existing_images().is_empty());
    }
}
