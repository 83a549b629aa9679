//! Client-side list state
//!
//! - [`list`] - `ResourceListStore`, the loaded collection with filters
//! - [`pagination`] - page math
//! - [`selection`] - selected ids for bulk operations

pub mod list;
pub mod pagination;
pub mod selection;

pub use list::{CategoryFilter, FilterState, ResourceListStore};
pub use pagination::{paginate, total_pages, DEFAULT_PAGE_SIZE};
pub use selection::SelectionSet;
