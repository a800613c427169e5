//! Metadata extraction: top-level scalar declarations and `info(...)` fields.
//!
//! All lookups are independent and order-insensitive; a missing key is
//! `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

static INFO_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)info\s*\(([^)]*)\)").unwrap());

/// Extract a top-level `key <value>` declaration.
///
/// `<value>` is either a quoted string or a heredoc; the heredoc form takes
/// precedence when both could match. The returned string is trimmed of the
/// heredoc's surrounding whitespace.
pub fn top_level_string(text: &str, key: &str) -> Option<String> {
    heredoc_value(text, key).or_else(|| quoted_value(text, key))
}

fn heredoc_value(text: &str, key: &str) -> Option<String> {
    let open_re = Regex::new(&format!(
        r"(?m)^\s*{}\s+<<-?'?([A-Za-z_][A-Za-z0-9_]*)'?",
        regex::escape(key)
    ))
    .ok()?;
    let caps = open_re.captures(text)?;
    let term = caps.get(1)?.as_str();
    let body_start = caps.get(0)?.end();
    let term_re = Regex::new(&format!(r"(?m){}\s*$", regex::escape(term))).ok()?;
    let term_at = term_re.find(&text[body_start..])?;
    Some(text[body_start..body_start + term_at.start()].trim().to_string())
}

fn quoted_value(text: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"(?m)^\s*{}\s+(?:'([^']+)'|"([^"]+)")\s*$"#,
        regex::escape(key)
    ))
    .ok()?;
    let caps = re.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Extract `key: '<value>'` from the first `info(...)` block.
///
/// Later `info(...)` blocks are never consulted.
pub fn info_field(text: &str, key: &str) -> Option<String> {
    let caps = INFO_BLOCK_RE.captures(text)?;
    let body = caps.get(1)?.as_str();
    let re = Regex::new(&format!(
        r#"\b{}\s*:\s*(?:'([^']+)'|"([^"]+)")"#,
        regex::escape(key)
    ))
    .ok()?;
    let caps = re.captures(body)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}
