//! Create/edit forms
//!
//! - [`state`] - `ResourceFormState`, the draft of one form session
//! - [`value`] - canonical field values per schema kind
//! - [`convert`] - date and list input conversions
//! - [`payload`] - JSON / multipart serialization driven by the schema
//! - [`error`] - validation and submit errors

pub mod convert;
pub mod error;
pub mod payload;
pub mod state;
pub mod value;

pub use convert::{date_to_input_string, input_string_to_date, split_list};
pub use error::{FieldIssue, SubmitError, ValidationError};
pub use state::ResourceFormState;
pub use value::FieldValue;
