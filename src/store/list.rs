//! Resource list store
//!
//! Holds the loaded collection of one resource type together with the
//! loading/error flags, the filter state, and the selection. The filtered and
//! paginated views are derived on demand and never stored.

use super::pagination::{self, DEFAULT_PAGE_SIZE};
use super::selection::SelectionSet;
use crate::api::{format_api_error, ApiError, ResourceClient};
use crate::resource::{fetch_records, Record, ResourceSchema};

/// Category part of the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(String),
}

impl CategoryFilter {
    /// `"all"` (or empty) means no filtering
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Id(s.to_string())
        }
    }
}

/// Search term, category, and pagination cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: CategoryFilter,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct ResourceListStore {
    schema: &'static ResourceSchema,
    items: Vec<Record>,
    pub loading: bool,
    pub error: Option<String>,
    filter: FilterState,
    selection: SelectionSet,
}

impl ResourceListStore {
    pub fn new(schema: &'static ResourceSchema) -> Self {
        Self {
            schema,
            items: Vec::new(),
            loading: false,
            error: None,
            filter: FilterState::default(),
            selection: SelectionSet::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.filter.page_size = page_size.max(1);
        self
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the whole collection and replace the current one
    ///
    /// On failure the previous collection is kept and `error` holds a
    /// display-ready message.
    pub async fn load(&mut self, client: &ResourceClient) -> Result<(), ApiError> {
        self.loading = true;
        self.error = None;

        let result = fetch_records(client, self.schema).await;
        self.loading = false;

        match result {
            Ok(items) => {
                tracing::info!("Loaded {} {}", items.len(), self.schema.key);
                self.replace_items(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", self.schema.key, e);
                self.error = Some(format_api_error(&e));
                Err(e)
            }
        }
    }

    /// Full refresh: swap the collection, clear the selection, and go back to
    /// page 1 only if the current page no longer exists
    pub fn replace_items(&mut self, items: Vec<Record>) {
        self.items = items;
        self.selection.clear();
        if self.filter.page > self.total_pages() {
            self.filter.page = 1;
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn set_search(&mut self, term: &str) {
        self.filter.search = term.to_string();
        self.filter.page = 1;
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.filter.page = 1;
    }

    /// Whether a record passes the search term and the category filter
    pub fn matches(&self, record: &Record) -> bool {
        let term = self.filter.search.trim().to_lowercase();
        let search_ok = term.is_empty()
            || record.name(self.schema).to_lowercase().contains(&term)
            || record.description(self.schema).to_lowercase().contains(&term);

        let category_ok = match &self.filter.category {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => record
                .category(self.schema)
                .is_some_and(|r| r.id() == id),
        };

        search_ok && category_ok
    }

    pub fn filtered(&self) -> Vec<&Record> {
        self.items.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.items.iter().filter(|r| self.matches(r)).count()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered_count(), self.filter.page_size)
    }

    /// Current page, clamped into `[1, total_pages]`
    pub fn page(&self) -> usize {
        self.filter.page.clamp(1, self.total_pages())
    }

    pub fn set_page(&mut self, page: usize) {
        self.filter.page = pagination::clamp_page(page, self.filtered_count(), self.filter.page_size);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.filter.page_size = page_size.max(1);
        self.set_page(self.filter.page);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page() + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page().saturating_sub(1));
    }

    /// Records on the current page
    pub fn page_items(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        pagination::paginate(&filtered, self.page(), self.filter.page_size).to_vec()
    }

    /// Ids of the records on the current page
    pub fn visible_ids(&self) -> Vec<String> {
        self.page_items()
            .into_iter()
            .filter_map(|r| r.id(self.schema))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.items
            .iter()
            .find(|r| r.id(self.schema).as_deref() == Some(id))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle an id; ids missing from the loaded list are ignored
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Select every record currently visible (filtered and paginated)
    pub fn select_visible(&mut self) {
        let ids = self.visible_ids();
        self.selection.select_all(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get_resource;
    use serde_json::json;

    fn store_with(items: Vec<serde_json::Value>) -> ResourceListStore {
        let mut store = ResourceListStore::new(get_resource("bootcamps").unwrap());
        store.replace_items(items.into_iter().map(Record::new).collect());
        store
    }

    fn numbered(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| json!({"_id": format!("id-{}", i), "name": format!("Item {}", i)}))
            .collect()
    }

    #[test]
    fn test_scenario_pages_and_clamp() {
        let mut store = store_with(numbered(25));
        assert_eq!(store.total_pages(), 3);
        store.set_page(5);
        assert_eq!(store.page(), 3);
        assert_eq!(store.page_items().len(), 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = store_with(vec![
            json!({"_id": "1", "name": "Bootcamp A"}),
            json!({"_id": "2", "name": "Other"}),
            json!({"_id": "3", "name": "BOOTCAMP B"}),
        ]);
        store.set_search("boot");
        let names: Vec<&str> = store
            .filtered()
            .iter()
            .map(|r| r.name(store.schema()))
            .collect();
        assert_eq!(names, vec!["Bootcamp A", "BOOTCAMP B"]);
    }

    #[test]
    fn test_search_matches_description() {
        let mut store = store_with(vec![
            json!({"_id": "1", "name": "A", "description": "Learn Rust fast"}),
            json!({"_id": "2", "name": "B", "description": "Cooking"}),
        ]);
        store.set_search("  RUST ");
        assert_eq!(store.filtered_count(), 1);
    }

    #[test]
    fn test_category_filter_normalizes_shapes() {
        let mut store = store_with(vec![
            json!({"_id": "1", "name": "A", "category": "c1"}),
            json!({"_id": "2", "name": "B", "category": {"_id": "c1", "name": "Web"}}),
            json!({"_id": "3", "name": "C", "category": {"_id": "c2", "name": "Data"}}),
            json!({"_id": "4", "name": "D"}),
        ]);
        store.set_category_filter(CategoryFilter::Id("c1".into()));
        assert_eq!(store.filtered_count(), 2);

        store.set_category_filter(CategoryFilter::parse("all"));
        assert_eq!(store.filtered_count(), 4);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut store = store_with(numbered(30));
        store.set_page(3);
        store.set_search("item");
        assert_eq!(store.page(), 1);
    }

    #[test]
    fn test_reload_keeps_page_when_in_range() {
        let mut store = store_with(numbered(30));
        store.set_page(2);
        store.replace_items(numbered(25).into_iter().map(Record::new).collect());
        assert_eq!(store.page(), 2);

        store.set_page(3);
        store.replace_items(numbered(5).into_iter().map(Record::new).collect());
        assert_eq!(store.filter().page, 1);
    }

    #[test]
    fn test_page_size_change_reclamps() {
        let mut store = store_with(numbered(25));
        store.set_page(3);
        store.set_page_size(20);
        assert_eq!(store.page(), 2);
        store.set_page_size(0);
        assert_eq!(store.filter().page_size, 1);
    }

    #[test]
    fn test_select_visible_only_takes_current_page() {
        let mut store = store_with(numbered(25));
        store.set_page(3);
        store.select_visible();
        assert_eq!(store.selection().len(), 5);
        assert!(store.is_selected("id-24"));
        assert!(!store.is_selected("id-0"));
    }

    #[test]
    fn test_toggle_ignores_unknown_ids() {
        let mut store = store_with(numbered(3));
        assert!(!store.toggle_selection("ghost"));
        assert!(store.toggle_selection("id-1"));
        assert_eq!(store.selected_ids(), vec!["id-1"]);
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut store = store_with(numbered(3));
        store.toggle_selection("id-1");
        store.replace_items(numbered(3).into_iter().map(Record::new).collect());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_prev_and_next_page() {
        let mut store = store_with(numbered(25));
        store.next_page();
        store.next_page();
        store.next_page();
        assert_eq!(store.page(), 3);
        store.prev_page();
        store.prev_page();
        store.prev_page();
        assert_eq!(store.page(), 1);
    }
}
