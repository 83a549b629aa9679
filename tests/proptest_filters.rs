//! Property-based tests using proptest
//!
//! These tests verify pagination, search filtering, relation normalization,
//! and the form input conversions using randomized inputs.

use catadmin::form::{date_to_input_string, input_string_to_date, split_list};
use catadmin::resource::{get_resource, normalize, Record};
use catadmin::store::{paginate, total_pages, ResourceListStore};
use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

/// Generate a record the way the backend returns a bootcamp
fn arb_record() -> impl Strategy<Value = Record> {
    (
        "[a-f0-9]{24}",                // _id
        "[A-Za-z][A-Za-z0-9 ]{0,30}",  // name
        "[A-Za-z0-9 .,]{0,60}",        // description
        prop_oneof!["c1", "c2", "c3"], // category
        any::<bool>(),                 // expanded category
    )
        .prop_map(|(id, name, description, category, expanded)| {
            let category = if expanded {
                json!({"_id": category, "name": format!("Category {}", category)})
            } else {
                json!(category)
            };
            Record::new(json!({
                "_id": id,
                "name": name,
                "description": description,
                "category": category
            }))
        })
}

/// Generate a list of records
fn arb_record_list() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(arb_record(), 0..80)
}

fn store(items: Vec<Record>, page_size: usize) -> ResourceListStore {
    let mut store = ResourceListStore::new(get_resource("bootcamps").unwrap()).with_page_size(page_size);
    store.replace_items(items);
    store
}

proptest! {
    /// Walking every page yields every item exactly once, in order
    #[test]
    fn pages_partition_the_list(len in 0usize..200, page_size in 1usize..30) {
        let items: Vec<usize> = (0..len).collect();
        let pages = total_pages(len, page_size);

        prop_assert!(pages >= 1);
        let mut seen = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&items, page, page_size);
            prop_assert!(slice.len() <= page_size);
            if page < pages {
                prop_assert_eq!(slice.len(), page_size);
            }
            seen.extend_from_slice(slice);
        }
        prop_assert_eq!(seen, items);
    }

    /// Out-of-range pages are empty rather than panicking
    #[test]
    fn pages_past_the_end_are_empty(len in 0usize..50, page_size in 1usize..10, extra in 1usize..100) {
        let items: Vec<usize> = (0..len).collect();
        let past = total_pages(len, page_size) + extra;
        prop_assert!(paginate(&items, past, page_size).is_empty());
    }

    /// The store never reports a page outside [1, total_pages]
    #[test]
    fn store_page_is_always_in_range(items in arb_record_list(), page_size in 1usize..20, page in 0usize..50) {
        let mut store = store(items, page_size);
        store.set_page(page);
        prop_assert!(store.page() >= 1);
        prop_assert!(store.page() <= store.total_pages());
        prop_assert!(store.page_items().len() <= page_size);
    }

    /// Search ignores case
    #[test]
    fn search_is_case_insensitive(items in arb_record_list(), term in "[A-Za-z]{1,4}") {
        let mut lower = store(items.clone(), 10);
        lower.set_search(&term.to_lowercase());
        let mut upper = store(items, 10);
        upper.set_search(&term.to_uppercase());

        prop_assert_eq!(lower.filtered_count(), upper.filtered_count());
    }

    /// Filtering never invents records, and an empty term keeps them all
    #[test]
    fn filtering_is_a_subset(items in arb_record_list(), term in "[a-z ]{0,3}") {
        let total = items.len();
        let mut store = store(items, 10);
        prop_assert_eq!(store.filtered_count(), total);

        store.set_search(&term);
        prop_assert!(store.filtered_count() <= total);
        prop_assert_eq!(store.page(), 1);
    }

    /// Bare and expanded category references filter the same way
    #[test]
    fn category_filter_matches_both_shapes(items in arb_record_list(), category in prop_oneof!["c1", "c2", "c3"]) {
        let expected = items
            .iter()
            .filter(|r| normalize(&r.value()["category"]).as_deref() == Some(category.as_str()))
            .count();

        let mut store = store(items, 10);
        store.set_category_filter(catadmin::store::CategoryFilter::Id(category.to_string()));
        prop_assert_eq!(store.filtered_count(), expected);
    }

    /// normalize(bare id) == normalize(expanded id)
    #[test]
    fn normalize_ignores_shape(id in "[a-f0-9]{1,24}", label in "[A-Za-z ]{0,20}") {
        let bare = normalize(&json!(id));
        let expanded = normalize(&json!({"_id": id, "name": label}));
        prop_assert_eq!(bare.as_deref(), Some(id.as_str()));
        prop_assert_eq!(bare, expanded);
    }

    /// Every valid calendar date survives the input string round trip
    #[test]
    fn date_input_round_trip(year in 1900i32..2200, month in 1u32..=12, day in 1u32..=28) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let input = date_to_input_string(date);
        prop_assert_eq!(input.len(), 10);
        prop_assert_eq!(input_string_to_date(&input), Some(date));
    }

    /// Input that is not YYYY-MM-DD is rejected, never panics
    #[test]
    fn date_parser_handles_garbage(input in "\\PC{0,16}") {
        if let Some(date) = input_string_to_date(&input) {
            prop_assert_eq!(date_to_input_string(date), input.trim());
        }
    }

    /// Split items are trimmed and non-empty; joining and splitting again is stable
    #[test]
    fn split_list_is_trimmed(raw in "[a-z ,\\n]{0,40}") {
        let items = split_list(&raw);
        for item in &items {
            prop_assert!(!item.is_empty());
            prop_assert_eq!(item.trim(), item.as_str());
            prop_assert!(!item.contains(','));
        }
        prop_assert_eq!(split_list(&items.join(", ")), items);
    }
}

/// Scenario-style checks with fixed inputs
mod fixed_cases {
    use super::*;

    #[test]
    fn test_boot_matches_both_bootcamps() {
        let items = ["Bootcamp A", "Other", "BOOTCAMP B"]
            .iter()
            .enumerate()
            .map(|(i, name)| Record::new(json!({"_id": i.to_string(), "name": name})))
            .collect();
        let mut store = store(items, 10);
        store.set_search("boot");

        let names: Vec<String> = store
            .filtered()
            .iter()
            .map(|r| r.name(store.schema()).to_string())
            .collect();
        assert_eq!(names, vec!["Bootcamp A", "BOOTCAMP B"]);
    }

    #[test]
    fn test_twenty_five_items_clamp_to_page_three() {
        let items = (0..25)
            .map(|i| Record::new(json!({"_id": i.to_string(), "name": format!("Item {}", i)})))
            .collect();
        let mut store = store(items, 10);
        assert_eq!(store.total_pages(), 3);

        store.set_page(5);
        assert_eq!(store.page(), 3);
        assert_eq!(store.page_items().len(), 5);
    }
}
