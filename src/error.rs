//! Error types for the collaborator layers (fetch, file I/O, serialization).
//!
//! The extraction core never returns errors: missing or malformed input is
//! represented as `None` / empty collections. Errors here belong to the
//! machinery around the core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the scraper's collaborator layers.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed for {url}: status {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("template list {path} is not a JSON array")]
    TemplateListShape { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
