//! Resource Registry - Load resource schemas from JSON
//!
//! This module loads the catalog's resource schemas from embedded JSON files
//! and provides lookup functions for the rest of the application. A schema
//! declares the endpoint, the field list with their kinds, the upload field,
//! and the table columns of one resource type.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/bootcamps.json"),
    include_str!("../resources/categories.json"),
    include_str!("../resources/services.json"),
];

fn default_id_field() -> String {
    "_id".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

/// How a field is edited and serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    RichText,
    Number,
    Bool,
    Date,
    StringList,
    Relation,
    RelationList,
}

impl FieldKind {
    /// Kinds that hold several values and serialize one entry per element
    pub fn is_list(&self) -> bool {
        matches!(self, FieldKind::StringList | FieldKind::RelationList)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, FieldKind::Relation | FieldKind::RelationList)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::RichText => "rich text",
            FieldKind::Number => "number",
            FieldKind::Bool => "yes/no",
            FieldKind::Date => "date (YYYY-MM-DD)",
            FieldKind::StringList => "list (comma or newline separated)",
            FieldKind::Relation => "relation id",
            FieldKind::RelationList => "relation ids",
        }
    }
}

/// Field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Endpoint listing the options of a relation field
    #[serde(default)]
    pub source: Option<String>,
    /// Template value used when creating a new record
    #[serde(default)]
    pub default: Option<Value>,
}

/// Upload field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FileFieldDef {
    /// Multipart field name (`images` or `image`)
    pub name: String,
    #[serde(default)]
    pub multiple: bool,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
}

/// Resource schema from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSchema {
    #[serde(skip)]
    pub key: String,
    pub display_name: String,
    /// Singular noun used in prompts ("Delete bootcamp 'x'?")
    pub item_name: String,
    pub endpoint: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    #[serde(default)]
    pub description_field: Option<String>,
    /// Relation field used by the category filter
    #[serde(default)]
    pub category_field: Option<String>,
    #[serde(default)]
    pub file_field: Option<FileFieldDef>,
    /// Start and end date fields that must be ordered
    #[serde(default)]
    pub date_range: Option<(String, String)>,
    pub fields: Vec<FieldDef>,
    pub columns: Vec<ColumnDef>,
}

impl ResourceSchema {
    /// Get a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Endpoints that feed relation selects, deduplicated, in field order
    pub fn relation_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for field in &self.fields {
            if let Some(source) = field.source.as_deref() {
                if field.kind.is_relation() && !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }
        sources
    }

    pub fn has_category_filter(&self) -> bool {
        self.category_field.is_some()
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceSchema>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            for (key, mut schema) in partial.resources {
                schema.key = key.clone();
                final_config.resources.insert(key, schema);
            }
        }

        final_config
    })
}

/// Get a resource schema by key
pub fn get_resource(key: &str) -> Option<&'static ResourceSchema> {
    get_registry().resources.get(key)
}

/// Get all resource keys in a stable order
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
