//! Remote template retrieval.
//!
//! Templates are listed in a JSON file and fetched from GitHub as raw text.
//! Fetch failures are skip-and-continue events for the driver; nothing in
//! here is load-bearing for the extraction core.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;
use url::Url;

use crate::error::ScrapeError;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// A source of raw template text, keyed by URL.
#[async_trait]
pub trait TemplateSource {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError>;
}

/// HTTP fetcher for raw GitHub content.
pub struct GithubFetcher {
    http: reqwest::Client,
}

impl GithubFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(concat!("ptl-scraper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl TemplateSource for GithubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::FetchStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

/// In-memory source for tests and offline runs.
#[derive(Debug, Default)]
pub struct StaticSource {
    texts: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(url.into(), text.into());
    }
}

#[async_trait]
impl TemplateSource for StaticSource {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::FetchStatus {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// Rewrite a github.com blob URL to its raw.githubusercontent.com form.
/// Already-raw and non-GitHub URLs pass through unchanged.
pub fn to_raw_github(url: &str) -> String {
    if url.contains("raw.githubusercontent.com") {
        return url.to_string();
    }
    if url.contains("github.com") && url.contains("/blob/") {
        return url
            .replace("https://github.com/", "https://raw.githubusercontent.com/")
            .replace("/blob/", "/");
    }
    url.to_string()
}

/// Last path segment of a template URL with any `.pt` suffix stripped,
/// e.g. `aws_rightsize_ec2_instances`.
pub fn template_basename(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|s| s.last().map(|p| p.to_string()))
        })
        .unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url).to_string());
    segment
        .strip_suffix(".pt")
        .map(|s| s.to_string())
        .unwrap_or(segment)
}

/// Load the template list: a JSON array whose items are either bare URL
/// strings or objects carrying a `url` key. Anything else is skipped with a
/// warning.
pub fn load_template_list(path: &Path) -> Result<Vec<String>, ScrapeError> {
    let raw = std::fs::read_to_string(path)?;
    let items: serde_json::Value = serde_json::from_str(&raw)?;
    let Some(items) = items.as_array() else {
        return Err(ScrapeError::TemplateListShape {
            path: path.to_path_buf(),
        });
    };

    let mut urls = Vec::new();
    for item in items {
        match item {
            serde_json::Value::String(url) => urls.push(url.clone()),
            serde_json::Value::Object(obj) => match obj.get("url").and_then(|v| v.as_str()) {
                Some(url) => urls.push(url.to_string()),
                None => warn!(item = %item, "skipping template list item without url"),
            },
            other => warn!(item = %other, "skipping invalid template list item"),
        }
    }
    Ok(urls)
}
