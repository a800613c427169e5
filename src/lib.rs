//! Policy template scraper and demo-data generator.
//!
//! Parses policy templates written in a Ruby-style block DSL
//! (`keyword ... do ... end`, quoted strings, heredocs) and extracts a
//! per-template schema: metadata from `name`/`info(...)` declarations plus
//! one incident record per `validate`/`validate_each` block with its
//! summary/detail templates and exported fields.
//!
//! ## Pipeline
//!
//! ```text
//! Raw .pt text → Block Scanner (byte spans)
//!                    ↓
//!           Metadata / Incident Extractors
//!                    ↓
//!          Placeholder Rewriter (prose cleanup)
//!                    ↓
//!              TemplateSchema (JSON)
//! ```
//!
//! Everything in the extraction path is fail-open: malformed or truncated
//! input yields a best-effort partial schema, never an error. Errors only
//! come from the collaborators around the core (HTTP fetch, file I/O).

// Core error handling
pub mod error;

// Block-aware lexical scanning
pub mod scanner;

// Metadata and incident extraction
pub mod extract;

// Placeholder rewriting for summary/detail prose
pub mod rewrite;

// Schema records and serialization shape
pub mod schema;

// Remote template retrieval
pub mod fetch;

// Fake incident tables and demo templates
pub mod generate;

pub use schema::{FieldEntry, Incident, TemplateSchema};
