//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the catalog's resources.
//! Resource schemas are loaded from JSON files at compile time, so the three
//! catalog types (bootcamps, categories, services) share one implementation.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource schemas from embedded JSON
//! - [`record`] - JSON-backed records read through a schema
//! - [`reference`] - Relation references (bare id or expanded object)
//! - [`fetcher`] - Fetches records and relation options from the API
//!
//! # Example
//!
//! ```ignore
//! use catadmin::resource::{fetch_records, get_resource};
//!
//! async fn list_bootcamps(client: &ResourceClient) -> Result<Vec<Record>, ApiError> {
//!     let schema = get_resource("bootcamps").unwrap();
//!     fetch_records(client, schema).await
//! }
//! ```

pub mod fetcher;
pub mod record;
pub mod reference;
mod registry;

pub use fetcher::{extract_json_value, fetch_record, fetch_records, fetch_relation_options};
pub use record::Record;
pub use reference::{normalize, Ref, RelationOption};
pub use registry::*;
