//! Form Editor
//!
//! Keyboard editing of a resource form: one row per schema field, plus an
//! upload row when the resource accepts files. Text rows are edited through
//! an input buffer committed when the cursor leaves the row. Relation rows
//! are never typed into; they are chosen from loaded options.

use catadmin::api::Attachment;
use catadmin::form::{split_list, FieldIssue, FieldValue, ResourceFormState, SubmitError, ValidationError};
use catadmin::resource::{FieldDef, FieldKind, RelationOption};
use std::path::Path;

/// Pseudo field name used for upload issues
pub const FILES_ROW: &str = "files";

#[derive(Debug, Clone, Copy)]
pub enum EditorRow {
    Field(&'static FieldDef),
    Files,
}

pub struct FormEditor {
    pub form: ResourceFormState,
    pub row: usize,
    pub input: String,
    pub issues: ValidationError,
    pub error: Option<String>,
    file_input: String,
}

impl FormEditor {
    pub fn new(form: ResourceFormState) -> Self {
        let mut editor = Self {
            form,
            row: 0,
            input: String::new(),
            issues: ValidationError::default(),
            error: None,
            file_input: String::new(),
        };
        editor.load_input();
        editor
    }

    pub fn title(&self) -> String {
        let schema = self.form.schema();
        if self.form.is_editing() {
            format!(" Edit {} ", schema.item_name)
        } else {
            format!(" New {} ", schema.item_name)
        }
    }

    pub fn rows(&self) -> Vec<EditorRow> {
        let schema = self.form.schema();
        let mut rows: Vec<EditorRow> = schema.fields.iter().map(EditorRow::Field).collect();
        if schema.file_field.is_some() {
            rows.push(EditorRow::Files);
        }
        rows
    }

    pub fn current_row(&self) -> Option<EditorRow> {
        self.rows().get(self.row).copied()
    }

    /// Text shown for a row that does not have the cursor
    pub fn display_value(&self, row: EditorRow) -> String {
        match row {
            EditorRow::Field(def) => self.form.input_text(&def.name),
            EditorRow::Files => self.file_input.clone(),
        }
    }

    pub fn issue_for(&self, row: EditorRow) -> Option<&FieldIssue> {
        match row {
            EditorRow::Field(def) => self.issues.for_field(&def.name),
            EditorRow::Files => self.issues.for_field(FILES_ROW),
        }
    }

    fn load_input(&mut self) {
        self.input = match self.current_row() {
            Some(row) => self.display_value(row),
            None => String::new(),
        };
    }

    fn clear_issue(&mut self, field: &str) {
        self.issues.issues.retain(|i| i.field != field);
    }

    fn record_issue(&mut self, issue: FieldIssue) {
        self.clear_issue(&issue.field);
        self.issues.push(issue);
    }

    /// Write the input buffer back into the draft; false when it was rejected
    pub fn commit(&mut self) -> bool {
        match self.current_row() {
            Some(EditorRow::Field(def)) => {
                if is_picked(def.kind) {
                    return true;
                }
                match self.form.set_field_raw(&def.name, &self.input) {
                    Ok(()) => {
                        self.clear_issue(&def.name);
                        true
                    }
                    Err(issue) => {
                        self.record_issue(issue);
                        false
                    }
                }
            }
            Some(EditorRow::Files) => {
                self.file_input = self.input.clone();
                match read_attachments(&self.input) {
                    Ok(files) => match self.form.set_files(files) {
                        Ok(()) => {
                            self.clear_issue(FILES_ROW);
                            true
                        }
                        Err(issue) => {
                            self.record_issue(issue);
                            false
                        }
                    },
                    Err(issue) => {
                        self.record_issue(issue);
                        false
                    }
                }
            }
            None => true,
        }
    }

    pub fn next_row(&mut self) {
        self.commit();
        let count = self.rows().len();
        if count > 0 {
            self.row = (self.row + 1) % count;
        }
        self.load_input();
    }

    pub fn prev_row(&mut self) {
        self.commit();
        let count = self.rows().len();
        if count > 0 {
            self.row = (self.row + count - 1) % count;
        }
        self.load_input();
    }

    pub fn push_char(&mut self, c: char) {
        match self.current_row() {
            Some(EditorRow::Field(def)) if def.kind == FieldKind::Bool => {
                if c == ' ' {
                    self.toggle_bool();
                }
            }
            Some(EditorRow::Field(def)) if def.kind.is_relation() => {}
            Some(_) => self.input.push(c),
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(EditorRow::Field(def)) = self.current_row() {
            if is_picked(def.kind) {
                return;
            }
        }
        self.input.pop();
    }

    /// Multi-line rows take Enter as a newline
    pub fn newline(&mut self) {
        if let Some(EditorRow::Field(def)) = self.current_row() {
            if matches!(def.kind, FieldKind::RichText | FieldKind::StringList) {
                self.input.push('\n');
                return;
            }
        }
        self.next_row();
    }

    pub fn toggle_bool(&mut self) {
        if let Some(EditorRow::Field(def)) = self.current_row() {
            if let Some(FieldValue::Bool(b)) = self.form.value(&def.name) {
                let flipped = !*b;
                if self.form.set_field(&def.name, FieldValue::Bool(flipped)).is_ok() {
                    self.load_input();
                }
            }
        }
    }

    /// Step a relation row through its options; the first step from an
    /// empty value picks the first option
    pub fn cycle_relation(&mut self, options: &[RelationOption], forward: bool) {
        let Some(EditorRow::Field(def)) = self.current_row() else {
            return;
        };
        if def.kind != FieldKind::Relation || options.is_empty() {
            return;
        }

        let current = match self.form.value(&def.name) {
            Some(FieldValue::Ref(Some(id))) => options.iter().position(|o| &o.id == id),
            _ => None,
        };
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };

        let value = FieldValue::Ref(Some(options[next].id.clone()));
        if self.form.set_field(&def.name, value).is_ok() {
            self.clear_issue(&def.name);
            self.load_input();
        }
    }

    /// Ids held by the relation list row under the cursor
    pub fn relation_ids(&self) -> Vec<String> {
        match self.current_row() {
            Some(EditorRow::Field(def)) => match self.form.value(&def.name) {
                Some(FieldValue::Refs(ids)) => ids.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Add `id` to the relation list row under the cursor, or remove it when
    /// already present; false when the row is not a relation list
    pub fn toggle_relation(&mut self, id: &str) -> bool {
        let Some(EditorRow::Field(def)) = self.current_row() else {
            return false;
        };
        if def.kind != FieldKind::RelationList {
            return false;
        }

        let mut ids = self.relation_ids();
        match ids.iter().position(|existing| existing == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id.to_string()),
        }

        if self.form.set_field(&def.name, FieldValue::Refs(ids)).is_err() {
            return false;
        }
        self.clear_issue(&def.name);
        self.load_input();
        true
    }

    /// Show the outcome of a failed submit
    pub fn set_submit_error(&mut self, err: SubmitError) {
        self.error = Some(err.display_message());
        if let SubmitError::Validation(issues) = err {
            self.issues = issues;
        }
    }
}

/// Rows whose value comes from a toggle or a picker rather than typing
fn is_picked(kind: FieldKind) -> bool {
    matches!(kind, FieldKind::Bool) || kind.is_relation()
}

/// Read every path of a comma/newline separated list
fn read_attachments(raw: &str) -> Result<Vec<Attachment>, FieldIssue> {
    split_list(raw)
        .iter()
        .map(|path| {
            Attachment::from_path(Path::new(path))
                .map_err(|e| FieldIssue::new(FILES_ROW, format!("{}: {}", path, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catadmin::resource::get_resource;
    use std::io::Write;

    fn editor(key: &str) -> FormEditor {
        FormEditor::new(ResourceFormState::new(get_resource(key).unwrap()))
    }

    fn go_to(editor: &mut FormEditor, field: &str) {
        for _ in 0..editor.rows().len() {
            if let Some(EditorRow::Field(def)) = editor.current_row() {
                if def.name == field {
                    return;
                }
            }
            editor.next_row();
        }
        panic!("no row for {}", field);
    }

    #[test]
    fn test_rows_include_uploads() {
        let e = editor("categories");
        assert_eq!(e.rows().len(), 3);
        assert!(matches!(e.rows()[2], EditorRow::Files));
        assert_eq!(e.title(), " New category ");
    }

    #[test]
    fn test_text_is_committed_on_row_change() {
        let mut e = editor("bootcamps");
        for c in "Rust 101".chars() {
            e.push_char(c);
        }
        e.next_row();
        assert_eq!(e.form.input_text("name"), "Rust 101");
    }

    #[test]
    fn test_bad_date_is_reported_on_the_row() {
        let mut e = editor("bootcamps");
        go_to(&mut e, "startDate");
        for c in "2024-13-01".chars() {
            e.push_char(c);
        }
        e.next_row();
        assert!(e.issues.for_field("startDate").is_some());

        go_to(&mut e, "startDate");
        e.input = "2024-01-15".into();
        e.next_row();
        assert!(e.issues.for_field("startDate").is_none());
    }

    #[test]
    fn test_list_rows_take_newlines() {
        let mut e = editor("bootcamps");
        go_to(&mut e, "types");
        e.input = "online".into();
        e.newline();
        e.input.push_str("onsite");
        e.next_row();
        assert_eq!(
            e.form.value("types"),
            Some(&FieldValue::List(vec!["online".into(), "onsite".into()]))
        );
    }

    #[test]
    fn test_bool_toggles_with_space() {
        let mut e = editor("bootcamps");
        go_to(&mut e, "isPublished");
        assert_eq!(e.form.value("isPublished"), Some(&FieldValue::Bool(true)));
        e.push_char(' ');
        assert_eq!(e.form.value("isPublished"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_cycle_relation() {
        let mut e = editor("bootcamps");
        go_to(&mut e, "category");
        let options = vec![
            RelationOption {
                id: "c1".into(),
                label: "Web".into(),
            },
            RelationOption {
                id: "c2".into(),
                label: "Data".into(),
            },
        ];
        e.cycle_relation(&options, true);
        assert_eq!(e.form.value("category"), Some(&FieldValue::Ref(Some("c1".into()))));
        e.cycle_relation(&options, true);
        assert_eq!(e.input, "c2");
        e.cycle_relation(&options, true);
        assert_eq!(e.input, "c1");
        e.cycle_relation(&options, false);
        assert_eq!(e.input, "c2");
    }

    #[test]
    fn test_toggle_relation_list() {
        let mut e = editor("services");
        go_to(&mut e, "products");
        e.push_char('x');
        assert!(e.input.is_empty());

        assert!(e.toggle_relation("p1"));
        assert!(e.toggle_relation("p2"));
        assert_eq!(e.relation_ids(), vec!["p1", "p2"]);
        assert!(e.toggle_relation("p1"));
        assert_eq!(
            e.form.value("products"),
            Some(&FieldValue::Refs(vec!["p2".into()]))
        );

        // Leaving the row keeps the picked ids
        e.next_row();
        assert_eq!(
            e.form.value("products"),
            Some(&FieldValue::Refs(vec!["p2".into()]))
        );
    }

    #[test]
    fn test_toggle_relation_ignores_other_rows() {
        let mut e = editor("services");
        go_to(&mut e, "category");
        assert!(!e.toggle_relation("c1"));
        assert!(e.relation_ids().is_empty());
    }

    #[test]
    fn test_upload_row_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"png")
            .unwrap();

        let mut e = editor("categories");
        e.next_row();
        e.next_row();
        assert!(matches!(e.current_row(), Some(EditorRow::Files)));

        e.input = path.display().to_string();
        assert!(e.commit());
        assert_eq!(e.form.files().len(), 1);
        assert_eq!(e.form.files()[0].mime_type, "image/png");

        e.input = dir.path().join("missing.png").display().to_string();
        assert!(!e.commit());
        assert!(e.issues.for_field(FILES_ROW).is_some());
    }

    #[test]
    fn test_validation_issues_replace_row_issues() {
        let mut e = editor("categories");
        let err = e.form.validate().unwrap_err();
        e.set_submit_error(SubmitError::Validation(err));
        assert_eq!(e.error.as_deref(), Some("name: is required"));
        assert!(e.issues.for_field("name").is_some());
    }
}
