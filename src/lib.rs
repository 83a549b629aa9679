//! catadmin - terminal admin console for a catalog REST backend
//!
//! The library holds everything below the terminal UI: the API client, the
//! resource schemas, list/form/selection state, bulk operations, and the
//! confirmation gate. The `catadmin` binary renders it with ratatui.

pub mod api;
pub mod bulk;
pub mod config;
pub mod confirm;
pub mod form;
pub mod manager;
pub mod resource;
pub mod store;

pub use api::{ApiConfig, ApiError, ResourceClient};
pub use manager::{ConfirmOutcome, ResourceManager};
