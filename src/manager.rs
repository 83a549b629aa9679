//! Resource manager
//!
//! One manager drives the whole lifecycle of a resource type: the list, the
//! relation selects, detail lookups, forms, and confirmed deletes. It is
//! parameterized by a schema only, so bootcamps, categories, and services all
//! go through the same code.

use crate::api::{format_api_error, ApiError, ResourceClient};
use crate::bulk::{self, BulkOutcome};
use crate::confirm::{ConfirmTarget, ConfirmationGate, PendingAction};
use crate::form::{ResourceFormState, SubmitError};
use crate::resource::{fetch_record, fetch_relation_options, Record, RelationOption, ResourceSchema};
use crate::store::ResourceListStore;
use futures::future::join_all;
use std::collections::BTreeMap;

/// What a confirmed action did
#[derive(Debug)]
pub enum ConfirmOutcome {
    Single {
        id: String,
        result: Result<(), ApiError>,
    },
    Bulk(BulkOutcome),
}

impl ConfirmOutcome {
    /// Status line for the UI
    pub fn message(&self, schema: &ResourceSchema) -> String {
        match self {
            ConfirmOutcome::Single { result: Ok(()), .. } => {
                format!("Deleted {}", schema.item_name)
            }
            ConfirmOutcome::Single { result: Err(e), .. } => {
                format!("Delete failed: {}", format_api_error(e))
            }
            ConfirmOutcome::Bulk(outcome) => outcome.summary("Deleted"),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            ConfirmOutcome::Single { result, .. } => result.is_ok(),
            ConfirmOutcome::Bulk(outcome) => outcome.is_success(),
        }
    }
}

pub struct ResourceManager {
    schema: &'static ResourceSchema,
    client: ResourceClient,
    pub list: ResourceListStore,
    pub gate: ConfirmationGate,
    relation_options: BTreeMap<String, Vec<RelationOption>>,
}

impl ResourceManager {
    pub fn new(schema: &'static ResourceSchema, client: ResourceClient) -> Self {
        Self {
            schema,
            client,
            list: ResourceListStore::new(schema),
            gate: ConfirmationGate::new(),
            relation_options: BTreeMap::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.list = self.list.with_page_size(page_size);
        self
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Reload the list from the backend
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.list.load(&self.client).await
    }

    /// Reload after a mutation; a failure stays on `list.error`
    async fn reload_after(&mut self, action: &str) {
        if let Err(e) = self.refresh().await {
            tracing::debug!("Reload after {} of {} failed: {}", action, self.schema.key, e);
        }
    }

    /// Fetch every relation select this schema uses
    ///
    /// A failing source leaves its options empty; the first error is returned
    /// after all sources were tried.
    pub async fn load_relation_options(&mut self) -> Result<(), ApiError> {
        let sources = self.schema.relation_sources();
        let client = &self.client;
        let results = join_all(
            sources
                .iter()
                .map(|source| fetch_relation_options(client, source)),
        )
        .await;

        let mut first_error = None;
        for (source, result) in sources.into_iter().zip(results) {
            match result {
                Ok(options) => {
                    tracing::debug!("Loaded {} options from {}", options.len(), source);
                    self.set_relation_options(source, options);
                }
                Err(e) => {
                    tracing::warn!("Failed to load options from {}: {}", source, e);
                    self.set_relation_options(source, Vec::new());
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Replace the options of the select fed by `source`
    pub fn set_relation_options(&mut self, source: &str, options: Vec<RelationOption>) {
        self.relation_options.insert(source.to_string(), options);
    }

    /// Options of the select fed by `source`
    pub fn relation_options(&self, source: &str) -> &[RelationOption] {
        self.relation_options
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Label of a related id, when its options were loaded
    pub fn relation_label(&self, source: &str, id: &str) -> Option<&str> {
        self.relation_options(source)
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    /// Fetch one record for the detail view
    pub async fn detail(&self, id: &str) -> Result<Record, ApiError> {
        fetch_record(&self.client, self.schema, id).await
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn new_form(&self) -> ResourceFormState {
        ResourceFormState::new(self.schema)
    }

    /// Form seeded with the current server copy of `id`
    pub async fn edit_form(&self, id: &str) -> Result<ResourceFormState, ApiError> {
        let record = self.detail(id).await?;
        Ok(ResourceFormState::edit(self.schema, &record))
    }

    /// Submit the form, then reload the list once on success
    ///
    /// A failing reload only sets the list error; the submit itself succeeded.
    pub async fn submit(&mut self, form: &mut ResourceFormState) -> Result<Record, SubmitError> {
        let record = form.submit(&self.client).await?;
        self.reload_after("submit").await;
        Ok(record)
    }

    // =========================================================================
    // Deletes
    // =========================================================================

    /// Stage the delete of one record
    pub fn stage_delete(&mut self, id: &str) {
        let label = self
            .list
            .find(id)
            .map(|r| r.label(self.schema))
            .unwrap_or_else(|| id.to_string());
        let target = ConfirmTarget::Single {
            id: id.to_string(),
            label,
        };
        self.stage(target);
    }

    /// Stage the delete of the current selection; returns false when nothing
    /// is selected
    pub fn stage_bulk_delete(&mut self) -> bool {
        let ids = self.list.selected_ids();
        if ids.is_empty() {
            return false;
        }
        self.stage(ConfirmTarget::Bulk { ids });
        true
    }

    fn stage(&mut self, target: ConfirmTarget) {
        let plural = self.schema.display_name.to_lowercase();
        self.gate.stage(PendingAction::delete(
            target,
            &self.schema.item_name,
            &plural,
        ));
    }

    /// Fire the staged delete, then reload the list
    ///
    /// A single delete reloads only on success. A bulk delete clears the
    /// selection and reloads exactly once whatever the individual results.
    pub async fn confirm(&mut self) -> Option<ConfirmOutcome> {
        let target = self.gate.confirm()?;
        let schema = self.schema;
        let endpoint = schema.endpoint.as_str();

        let outcome = match target {
            ConfirmTarget::Single { id, .. } => {
                tracing::info!("Deleting {} {}", schema.key, id);
                let result = self.client.delete(endpoint, &id).await.map(|_| ());
                if result.is_ok() {
                    self.reload_after("delete").await;
                }
                ConfirmOutcome::Single { id, result }
            }
            ConfirmTarget::Bulk { ids } => {
                tracing::info!("Deleting {} {}", ids.len(), schema.key);
                let client = &self.client;
                let outcome = bulk::run(&ids, |id| async move {
                    client.delete(endpoint, &id).await
                })
                .await;
                self.list.clear_selection();
                self.reload_after("bulk delete").await;
                ConfirmOutcome::Bulk(outcome)
            }
        };

        Some(outcome)
    }

    pub fn cancel(&mut self) {
        self.gate.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::resource::get_resource;
    use serde_json::json;

    fn manager(key: &str) -> ResourceManager {
        let config = ApiConfig::new("http://127.0.0.1:9/api", None).unwrap();
        let client = ResourceClient::new(config).unwrap();
        ResourceManager::new(get_resource(key).unwrap(), client)
    }

    #[test]
    fn test_stage_delete_uses_record_label() {
        let mut m = manager("bootcamps");
        m.list
            .replace_items(vec![Record::new(json!({"_id": "b1", "name": "Rust 101"}))]);
        m.stage_delete("b1");
        assert_eq!(
            m.gate.pending().unwrap().message,
            "Delete bootcamp 'Rust 101'?"
        );

        m.stage_delete("unknown");
        assert_eq!(
            m.gate.pending().unwrap().message,
            "Delete bootcamp 'unknown'?"
        );
    }

    #[test]
    fn test_bulk_delete_needs_a_selection() {
        let mut m = manager("categories");
        m.list.replace_items(vec![
            Record::new(json!({"_id": "c1", "name": "Web"})),
            Record::new(json!({"_id": "c2", "name": "Data"})),
        ]);
        assert!(!m.stage_bulk_delete());
        assert!(!m.gate.is_staged());

        m.list.select_visible();
        assert!(m.stage_bulk_delete());
        assert_eq!(
            m.gate.pending().unwrap().message,
            "Delete 2 selected categories?"
        );
    }

    #[tokio::test]
    async fn test_confirm_from_idle_does_nothing() {
        let mut m = manager("services");
        assert!(m.confirm().await.is_none());
    }

    #[test]
    fn test_relation_label_lookup() {
        let mut m = manager("bootcamps");
        assert!(m.relation_options("categories").is_empty());
        m.set_relation_options(
            "categories",
            vec![RelationOption {
                id: "c1".into(),
                label: "Web".into(),
            }],
        );
        assert_eq!(m.relation_label("categories", "c1"), Some("Web"));
        assert_eq!(m.relation_label("categories", "c2"), None);
    }
}
