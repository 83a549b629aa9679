//! Catalog API interaction module
//!
//! Everything that talks to the REST backend lives here: the typed client,
//! the HTTP layer with envelope unwrapping, request bodies, and the error
//! taxonomy.
//!
//! # Module Structure
//!
//! - [`client`] - `ResourceClient` and its injected `ApiConfig`
//! - [`http`] - reqwest wrapper, header handling, `{message, data}` unwrapping
//! - [`payload`] - JSON and multipart request bodies, file attachments
//! - [`error`] - `ApiError` and display formatting
//!
//! # Example
//!
//! ```ignore
//! use catadmin::api::{ApiConfig, ResourceClient};
//!
//! async fn example() -> Result<(), catadmin::api::ApiError> {
//!     let config = ApiConfig::new("http://localhost:3000/api", Some("token".into()))?;
//!     let client = ResourceClient::new(config)?;
//!     let bootcamps = client.list("bootcamps", &[]).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod payload;

pub use client::{ApiConfig, ResourceClient};
pub use error::{format_api_error, ApiError};
pub use payload::{Attachment, FormPart, MultipartBody, Payload};
