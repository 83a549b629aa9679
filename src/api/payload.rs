//! Request bodies
//!
//! A body is either plain JSON or a multipart form. Multipart bodies are kept
//! as an inspectable list of parts and only turned into a
//! [`reqwest::multipart::Form`] when the request is sent.

use super::ApiError;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;

/// Body of a mutating request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(MultipartBody),
}

impl Payload {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Multipart(_) => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match self {
            Payload::Multipart(body) => Some(body),
            Payload::Json(_) => None,
        }
    }
}

/// A file pending upload
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_for_path(path);

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// Guess a MIME type from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// One part of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File(Attachment),
}

/// Ordered multipart parts; a name may repeat (one entry per array element)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    parts: Vec<(String, FormPart)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, name: &str, value: impl Into<String>) {
        self.parts
            .push((name.to_string(), FormPart::Text(value.into())));
    }

    pub fn push_file(&mut self, name: &str, attachment: Attachment) {
        self.parts.push((name.to_string(), FormPart::File(attachment)));
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    /// Number of parts sent under `name`
    pub fn count(&self, name: &str) -> usize {
        self.parts.iter().filter(|(n, _)| n == name).count()
    }

    /// Text values sent under `name`, in order
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, part)| match part {
                FormPart::Text(value) => Some(value.as_str()),
                FormPart::File(_) => None,
            })
            .collect()
    }

    /// Attachments sent under `name`, in order
    pub fn files(&self, name: &str) -> Vec<&Attachment> {
        self.parts
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, part)| match part {
                FormPart::File(file) => Some(file),
                FormPart::Text(_) => None,
            })
            .collect()
    }

    /// Build the reqwest form; reqwest sets the boundary content type
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File(file) => {
                    let part = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime_type)
                        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_names_keep_order() {
        let mut body = MultipartBody::new();
        body.push_text("types", "online");
        body.push_text("name", "Rust 101");
        body.push_text("types", "onsite");

        assert_eq!(body.count("types"), 2);
        assert_eq!(body.texts("types"), vec!["online", "onsite"]);
        assert_eq!(body.texts("name"), vec!["Rust 101"]);
    }

    #[test]
    fn test_files_are_separate_from_texts() {
        let mut body = MultipartBody::new();
        body.push_file("images", Attachment::new("a.png", "image/png", vec![1, 2]));
        body.push_text("images", "not-a-file");

        assert_eq!(body.files("images").len(), 1);
        assert_eq!(body.texts("images"), vec!["not-a-file"]);
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_for_path(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("logo.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_to_form_rejects_bad_mime() {
        let mut body = MultipartBody::new();
        body.push_file("image", Attachment::new("x", "not a mime", vec![]));
        assert!(body.to_form().is_err());
    }

    #[test]
    fn test_payload_accessors() {
        let json = Payload::Json(serde_json::json!({"name": "x"}));
        assert!(!json.is_multipart());
        assert!(json.as_json().is_some());
        assert!(json.as_multipart().is_none());

        let multipart = Payload::Multipart(MultipartBody::new());
        assert!(multipart.is_multipart());
    }
}
