//! Application State
//!
//! Central application state management for catadmin.

use crate::editor::{EditorRow, FormEditor};
use anyhow::Result;
use catadmin::api::format_api_error;
use catadmin::config::Config;
use catadmin::bulk::PartialBulkFailure;
use catadmin::resource::{
    get_all_resource_keys, get_resource, FieldKind, Record, RelationOption, ResourceSchema,
};
use catadmin::store::CategoryFilter;
use catadmin::{ConfirmOutcome, ResourceClient, ResourceManager};
use crossterm::event::KeyCode;
use std::collections::BTreeSet;

/// Failed ids listed in the partial delete warning
const MAX_LISTED_FAILURES: usize = 5;

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,  // Viewing list
    Help,    // ? help popup
    Confirm, // Confirmation dialog
    Warning, // Warning/info dialog (OK only)
    Picker,  // Category, resource, or relation selection
    Detail,  // Viewing one record
    Form,    // Create/edit form
}

/// What a picker selection applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerKind {
    Category,
    Resource,
    /// Multi-select for the relation list row under the form cursor
    Relations,
}

/// Searchable selection list
#[derive(Debug, Clone)]
pub struct PickerState {
    pub kind: PickerKind,
    pub title: String,
    pub options: Vec<RelationOption>,
    pub filtered: Vec<RelationOption>,
    pub search_text: String,
    pub selected: usize,
    /// Id of the option currently in effect
    pub current: String,
    /// Ids toggled on in a multi-select picker
    pub checked: BTreeSet<String>,
}

impl PickerState {
    pub fn new(kind: PickerKind, title: &str, options: Vec<RelationOption>, current: &str) -> Self {
        let selected = options.iter().position(|o| o.id == current).unwrap_or(0);
        Self {
            kind,
            title: title.to_string(),
            filtered: options.clone(),
            options,
            search_text: String::new(),
            selected,
            current: current.to_string(),
            checked: BTreeSet::new(),
        }
    }

    /// Whether the list shows a checkmark for `id`
    pub fn is_marked(&self, id: &str) -> bool {
        match self.kind {
            PickerKind::Relations => self.checked.contains(id),
            _ => self.current == id,
        }
    }

    fn toggle_checked(&mut self, id: &str) {
        if !self.checked.remove(id) {
            self.checked.insert(id.to_string());
        }
    }

    pub fn apply_search(&mut self) {
        let term = self.search_text.to_lowercase();
        self.filtered = self
            .options
            .iter()
            .filter(|o| term.is_empty() || o.label.to_lowercase().contains(&term))
            .cloned()
            .collect();
        self.selected = 0;
    }

    pub fn next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_option(&self) -> Option<&RelationOption> {
        self.filtered.get(self.selected)
    }
}

/// Detail view of one record
#[derive(Debug, Clone)]
pub struct DetailState {
    pub id: String,
    pub record: Option<Record>,
    pub error: Option<String>,
    pub scroll: usize,
}

/// Main application state
pub struct App {
    // API client shared by every resource manager
    pub client: ResourceClient,

    // Current resource being viewed
    pub manager: ResourceManager,

    // Navigation state
    pub selected: usize,
    pub mode: Mode,
    pub filter_text: String,
    pub filter_active: bool,

    // Overlays
    pub picker: Option<PickerState>,
    pub detail: Option<DetailState>,
    pub editor: Option<FormEditor>,

    // UI state
    pub status_message: Option<String>,
    pub warning_message: Option<String>,

    // Persistent configuration
    pub config: Config,
    pub page_size: usize,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,

    // Read-only mode
    pub readonly: bool,
}

impl App {
    /// Create App from pre-initialized components
    pub fn from_initialized(
        client: ResourceClient,
        manager: ResourceManager,
        config: Config,
        page_size: usize,
        readonly: bool,
    ) -> Self {
        Self {
            client,
            manager,
            selected: 0,
            mode: Mode::Normal,
            filter_text: String::new(),
            filter_active: false,
            picker: None,
            detail: None,
            editor: None,
            status_message: None,
            warning_message: None,
            config,
            page_size,
            last_key_press: None,
            readonly,
        }
    }

    pub fn current_resource(&self) -> &'static ResourceSchema {
        self.manager.schema()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.manager.list.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.manager.list.loading
    }

    // =========================================================================
    // Loading and navigation between resources
    // =========================================================================

    pub async fn refresh_current(&mut self) -> Result<()> {
        self.status_message = None;
        // The list keeps the failure message for the status line
        if let Err(e) = self.manager.refresh().await {
            tracing::debug!("Refresh of {} failed: {}", self.current_resource().key, e);
        }
        self.clamp_selected();
        Ok(())
    }

    pub async fn navigate_to_resource(&mut self, resource_key: &str) -> Result<()> {
        let Some(schema) = get_resource(resource_key) else {
            self.show_warning(&format!("Unknown resource: {}", resource_key));
            return Ok(());
        };

        tracing::info!("Switching to {}", resource_key);
        self.manager =
            ResourceManager::new(schema, self.client.clone()).with_page_size(self.page_size);
        self.selected = 0;
        self.filter_text.clear();
        self.filter_active = false;
        self.detail = None;
        self.editor = None;
        self.mode = Mode::Normal;

        self.refresh_current().await?;
        if let Err(e) = self.manager.load_relation_options().await {
            tracing::warn!("Relation options incomplete: {}", e);
        }

        if let Err(e) = self.config.set_last_resource(resource_key) {
            tracing::warn!("Failed to save config: {}", e);
        }
        Ok(())
    }

    /// Cycle to the next (or previous) resource type
    pub async fn cycle_resource(&mut self, forward: bool) -> Result<()> {
        let keys = get_all_resource_keys();
        let current = keys
            .iter()
            .position(|k| *k == self.current_resource().key)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % keys.len()
        } else {
            (current + keys.len() - 1) % keys.len()
        };
        self.navigate_to_resource(keys[next]).await
    }

    // =========================================================================
    // Rows of the current page
    // =========================================================================

    pub fn page_len(&self) -> usize {
        self.manager.list.page_items().len()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.manager.list.page_items().get(self.selected).copied()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected_record()
            .and_then(|r| r.id(self.current_resource()))
    }

    fn clamp_selected(&mut self) {
        self.selected = self.selected.min(self.page_len().saturating_sub(1));
    }

    pub fn next(&mut self) {
        let len = self.page_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.page_len().saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        self.manager.list.next_page();
        self.selected = 0;
    }

    pub fn prev_page(&mut self) {
        self.manager.list.prev_page();
        self.selected = 0;
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn apply_filter(&mut self) {
        self.manager.list.set_search(&self.filter_text);
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.apply_filter();
    }

    pub fn category_filter_label(&self) -> String {
        match &self.manager.list.filter().category {
            CategoryFilter::All => "All categories".to_string(),
            CategoryFilter::Id(id) => self
                .manager
                .relation_label("categories", id)
                .unwrap_or(id)
                .to_string(),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn toggle_selection(&mut self) {
        if let Some(id) = self.selected_id() {
            self.manager.list.toggle_selection(&id);
        }
    }

    pub fn select_all(&mut self) {
        self.manager.list.select_visible();
    }

    pub fn clear_selection(&mut self) {
        self.manager.list.clear_selection();
    }

    // =========================================================================
    // Modes
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn exit_mode(&mut self) {
        self.picker = None;
        self.warning_message = None;
        self.mode = if self.editor.is_some() {
            Mode::Form
        } else if self.detail.is_some() {
            Mode::Detail
        } else {
            Mode::Normal
        };
    }

    pub fn enter_category_picker(&mut self) {
        let schema = self.current_resource();
        if !schema.has_category_filter() {
            self.show_warning(&format!("{} have no category filter", schema.display_name));
            return;
        }

        let mut options = vec![RelationOption {
            id: "all".to_string(),
            label: "All categories".to_string(),
        }];
        options.extend(self.manager.relation_options("categories").iter().cloned());

        let current = match &self.manager.list.filter().category {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Id(id) => id.clone(),
        };
        self.picker = Some(PickerState::new(
            PickerKind::Category,
            "Filter by Category",
            options,
            &current,
        ));
        self.mode = Mode::Picker;
    }

    pub fn enter_resource_picker(&mut self) {
        let options = get_all_resource_keys()
            .into_iter()
            .filter_map(get_resource)
            .map(|schema| RelationOption {
                id: schema.key.clone(),
                label: schema.display_name.clone(),
            })
            .collect();
        self.picker = Some(PickerState::new(
            PickerKind::Resource,
            "Select Resource",
            options,
            &self.current_resource().key,
        ));
        self.mode = Mode::Picker;
    }

    pub async fn apply_picker(&mut self) -> Result<()> {
        if let Some(picker) = self.picker.as_mut() {
            if picker.kind == PickerKind::Relations {
                // Toggle in place; Esc closes the picker
                let id = picker.selected_option().map(|o| o.id.clone());
                if let (Some(id), Some(editor)) = (id, self.editor.as_mut()) {
                    if editor.toggle_relation(&id) {
                        picker.toggle_checked(&id);
                    }
                }
                return Ok(());
            }
        }

        let Some(picker) = self.picker.take() else {
            return Ok(());
        };
        self.mode = Mode::Normal;

        let Some(option) = picker.selected_option() else {
            return Ok(());
        };

        match picker.kind {
            PickerKind::Category => {
                self.manager
                    .list
                    .set_category_filter(CategoryFilter::parse(&option.id));
                self.selected = 0;
            }
            PickerKind::Resource => {
                if option.id != self.current_resource().key {
                    let key = option.id.clone();
                    self.navigate_to_resource(&key).await?;
                }
            }
            PickerKind::Relations => {}
        }
        Ok(())
    }

    // =========================================================================
    // Detail view
    // =========================================================================

    pub async fn enter_detail_mode(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.detail = Some(DetailState {
            id,
            record: None,
            error: None,
            scroll: 0,
        });
        self.mode = Mode::Detail;
        self.load_detail().await;
    }

    /// (Re)fetch the record of the detail view
    pub async fn load_detail(&mut self) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };

        match self.manager.detail(&detail.id).await {
            Ok(record) => {
                detail.record = Some(record);
                detail.error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", detail.id, e);
                detail.record = None;
                detail.error = Some(format_api_error(&e));
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Forms
    // =========================================================================

    fn writes_blocked(&mut self) -> bool {
        if self.readonly {
            self.show_warning("Read-only mode: changes are disabled");
        }
        self.readonly
    }

    pub fn enter_new_form(&mut self) {
        if self.writes_blocked() {
            return;
        }
        self.editor = Some(FormEditor::new(self.manager.new_form()));
        self.mode = Mode::Form;
    }

    /// Edit the record of the detail view, or the selected row
    pub async fn enter_edit_form(&mut self) {
        if self.writes_blocked() {
            return;
        }
        let id = match &self.detail {
            Some(detail) => Some(detail.id.clone()),
            None => self.selected_id(),
        };
        let Some(id) = id else {
            return;
        };

        match self.manager.edit_form(&id).await {
            Ok(form) => {
                self.editor = Some(FormEditor::new(form));
                self.mode = Mode::Form;
            }
            Err(e) => {
                self.status_message = Some(format!("Cannot edit: {}", format_api_error(&e)));
            }
        }
    }

    /// Options for the relation row under the cursor
    pub fn editor_relation_options(&self) -> &[RelationOption] {
        match self.editor.as_ref().and_then(FormEditor::current_row) {
            Some(EditorRow::Field(def)) => def
                .source
                .as_deref()
                .map(|source| self.manager.relation_options(source))
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn editor_on_relation_list(&self) -> bool {
        matches!(
            self.editor.as_ref().and_then(FormEditor::current_row),
            Some(EditorRow::Field(def)) if def.kind == FieldKind::RelationList
        )
    }

    /// Open the multi-select for the relation list row under the cursor
    pub fn enter_relation_picker(&mut self) {
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let Some(EditorRow::Field(def)) = editor.current_row() else {
            return;
        };
        if def.kind != FieldKind::RelationList {
            return;
        }

        let options = self.editor_relation_options().to_vec();
        if options.is_empty() {
            self.show_warning(&format!("No {} options were loaded", def.label.to_lowercase()));
            return;
        }

        let mut picker = PickerState::new(
            PickerKind::Relations,
            &format!("Select {}", def.label),
            options,
            "",
        );
        picker.checked = editor.relation_ids().into_iter().collect();
        self.picker = Some(picker);
        self.mode = Mode::Picker;
    }

    pub fn cycle_editor_relation(&mut self, forward: bool) {
        let options = self.editor_relation_options().to_vec();
        if let Some(editor) = self.editor.as_mut() {
            editor.cycle_relation(&options, forward);
        }
    }

    pub async fn submit_form(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        if !editor.commit() {
            editor.error = Some("Fix the highlighted field first".to_string());
            return;
        }

        let editing = editor.form.is_editing();
        match self.manager.submit(&mut editor.form).await {
            Ok(record) => {
                let schema = self.current_resource();
                let verb = if editing { "Saved" } else { "Created" };
                self.status_message = Some(format!(
                    "{} {} '{}'",
                    verb,
                    schema.item_name,
                    record.label(schema)
                ));
                self.editor = None;
                if editing && self.detail.is_some() {
                    self.mode = Mode::Detail;
                    self.load_detail().await;
                } else {
                    self.mode = Mode::Normal;
                }
                self.clamp_selected();
            }
            Err(e) => {
                tracing::warn!("Submit failed: {}", e);
                editor.set_submit_error(e);
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.editor = None;
        self.exit_mode();
    }

    // =========================================================================
    // Deletes
    // =========================================================================

    /// Stage a delete of the selection, or of the current row when nothing is
    /// selected
    pub fn stage_delete(&mut self) {
        if self.writes_blocked() {
            return;
        }

        if let Some(detail) = &self.detail {
            let id = detail.id.clone();
            self.manager.stage_delete(&id);
        } else if !self.manager.list.selection().is_empty() {
            self.manager.stage_bulk_delete();
        } else if let Some(id) = self.selected_id() {
            self.manager.stage_delete(&id);
        } else {
            return;
        }
        self.mode = Mode::Confirm;
    }

    /// Resolve the confirmation dialog
    pub async fn resolve_confirm(&mut self, confirmed: bool) {
        let mut warning = None;
        if confirmed {
            if let Some(outcome) = self.manager.confirm().await {
                self.status_message = Some(outcome.message(self.current_resource()));
                if outcome.is_success() {
                    self.detail = None;
                }
                if let ConfirmOutcome::Bulk(bulk) = outcome {
                    if let Err(failure) = bulk.into_result() {
                        warning = Some(partial_failure_warning(&failure));
                    }
                }
            }
        } else {
            self.manager.cancel();
        }
        self.exit_mode();
        self.clamp_selected();
        if let Some(warning) = warning {
            self.show_warning(&warning);
        }
    }
}

/// Warning text naming the ids a bulk delete could not remove
fn partial_failure_warning(failure: &PartialBulkFailure) -> String {
    let mut listed: Vec<String> = failure
        .failed
        .iter()
        .take(MAX_LISTED_FAILURES)
        .map(|f| format!("{} ({})", f.id, format_api_error(&f.error)))
        .collect();
    if failure.failed.len() > MAX_LISTED_FAILURES {
        listed.push(format!("and {} more", failure.failed.len() - MAX_LISTED_FAILURES));
    }
    format!("{}: {}", failure, listed.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catadmin::ApiConfig;
    use serde_json::json;

    fn app(key: &str, readonly: bool) -> App {
        let config = ApiConfig::new("http://127.0.0.1:9/api", None).unwrap();
        let client = ResourceClient::new(config).unwrap();
        let manager = ResourceManager::new(get_resource(key).unwrap(), client.clone());
        App::from_initialized(client, manager, Config::default(), 10, readonly)
    }

    fn load(app: &mut App, n: usize) {
        let items = (0..n)
            .map(|i| Record::new(json!({"_id": format!("id-{}", i), "name": format!("Item {}", i)})))
            .collect();
        app.manager.list.replace_items(items);
    }

    #[test]
    fn test_row_navigation_stays_on_page() {
        let mut app = app("bootcamps", false);
        load(&mut app, 25);
        app.go_to_bottom();
        assert_eq!(app.selected, 9);
        app.next();
        assert_eq!(app.selected, 9);

        app.next_page();
        app.next_page();
        assert_eq!(app.selected, 0);
        app.go_to_bottom();
        assert_eq!(app.selected_id().as_deref(), Some("id-24"));
    }

    #[test]
    fn test_toggle_selection_uses_row_id() {
        let mut app = app("bootcamps", false);
        load(&mut app, 3);
        app.next();
        app.toggle_selection();
        assert!(app.manager.list.is_selected("id-1"));
        app.clear_selection();
        assert!(app.manager.list.selection().is_empty());
    }

    #[test]
    fn test_delete_prefers_selection() {
        let mut app = app("bootcamps", false);
        load(&mut app, 5);
        app.select_all();
        app.stage_delete();
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(
            app.manager.gate.pending().unwrap().message,
            "Delete 5 selected bootcamps?"
        );
    }

    #[tokio::test]
    async fn test_cancel_leaves_items_alone() {
        let mut app = app("bootcamps", false);
        load(&mut app, 5);
        app.stage_delete();
        app.resolve_confirm(false).await;
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.manager.gate.is_staged());
        assert_eq!(app.manager.list.items().len(), 5);
    }

    #[test]
    fn test_readonly_blocks_writes() {
        let mut app = app("bootcamps", true);
        load(&mut app, 2);
        app.stage_delete();
        assert_eq!(app.mode, Mode::Warning);
        assert!(!app.manager.gate.is_staged());

        app.exit_mode();
        app.enter_new_form();
        assert!(app.editor.is_none());
    }

    #[test]
    fn test_category_picker() {
        let mut app = app("categories", false);
        app.enter_category_picker();
        assert_eq!(app.mode, Mode::Warning);

        let mut app = self::app("bootcamps", false);
        app.enter_category_picker();
        let picker = app.picker.as_mut().unwrap();
        assert_eq!(picker.kind, PickerKind::Category);
        assert_eq!(picker.selected_option().unwrap().id, "all");
    }

    #[tokio::test]
    async fn test_partial_bulk_failure_is_shown() {
        let mut app = app("bootcamps", false);
        load(&mut app, 2);
        app.select_all();
        app.stage_delete();
        app.resolve_confirm(true).await;

        assert_eq!(app.mode, Mode::Warning);
        let warning = app.warning_message.as_deref().unwrap();
        assert!(warning.starts_with("2 of 2 operations failed: id-0"));
        assert!(warning.contains("id-1"));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Deleted 0 of 2 (2 failed)")
        );
        assert!(app.manager.list.selection().is_empty());
    }

    #[test]
    fn test_relation_picker_needs_options() {
        let mut app = app("services", false);
        app.enter_new_form();
        while !app.editor_on_relation_list() {
            app.editor.as_mut().unwrap().next_row();
        }
        app.enter_relation_picker();
        assert_eq!(app.mode, Mode::Warning);

        app.exit_mode();
        assert_eq!(app.mode, Mode::Form);
    }

    #[test]
    fn test_picker_search() {
        let options = vec![
            RelationOption {
                id: "a".into(),
                label: "Web Development".into(),
            },
            RelationOption {
                id: "b".into(),
                label: "Data Science".into(),
            },
        ];
        let mut picker = PickerState::new(PickerKind::Category, "t", options, "b");
        assert_eq!(picker.selected, 1);
        picker.search_text = "web".into();
        picker.apply_search();
        assert_eq!(picker.filtered.len(), 1);
        picker.next();
        assert_eq!(picker.selected_option().unwrap().id, "a");
    }
}
