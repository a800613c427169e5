//! Extractors for template metadata and incident structure.

mod incident;
mod metadata;

pub use incident::{export_fields, parse_incidents};
pub use metadata::{info_field, top_level_string};
