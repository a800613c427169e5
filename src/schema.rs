//! Schema records extracted from one policy template.
//!
//! Optional values that were not found in the source are omitted from the
//! JSON output entirely, matching the shape downstream demo tooling expects.

use serde::{Deserialize, Serialize};

use crate::extract::{info_field, parse_incidents, top_level_string};

/// One exported incident-table column. Identity is the `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// One incident recovered from a `validate` / `validate_each` block.
///
/// `path` points at the fake incident table backing this incident; it is
/// attached by the driver after extraction, never computed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export: Vec<FieldEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Everything extracted from one policy template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TemplateSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "incident", default)]
    pub incidents: Vec<Incident>,
}

impl TemplateSchema {
    /// Extract a schema from raw template text.
    ///
    /// Fail-open throughout: anything the extractors cannot find is simply
    /// absent, and text with no recognizable structure yields an empty
    /// schema rather than an error. `url` and `filename` are left for the
    /// caller to attach.
    pub fn from_source(text: &str) -> Self {
        let name = top_level_string(text, "name");
        let version = info_field(text, "version").or_else(|| top_level_string(text, "version"));
        let incidents = parse_incidents(text, name.as_deref().unwrap_or(""));
        Self {
            name,
            version,
            cloud: info_field(text, "provider"),
            service: info_field(text, "service"),
            policy_set: info_field(text, "policy_set"),
            recommendation_type: info_field(text, "recommendation_type"),
            short_description: top_level_string(text, "short_description"),
            url: None,
            filename: None,
            incidents,
        }
    }
}
