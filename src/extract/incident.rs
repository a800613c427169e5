//! Incident extraction from `validate` / `validate_each` blocks.
//!
//! Each validation block yields at most one incident: its summary/detail
//! prose templates and the fields exported for the incident table. Field
//! declarations come in two surface syntaxes:
//!
//! - block style: `field "name" do label "..." path "..." end`
//! - inline style: `field "name", label: "...", path: "..."`
//!
//! Both are parsed into a tagged [`ParsedField`] first and merged into one
//! list afterwards, so the precedence rule stays in one place: block-style
//! entries land first and an inline entry never overwrites a name that is
//! already present.

use std::sync::LazyLock;

use regex::Regex;

use crate::rewrite::replace_policy_name_refs;
use crate::scanner::{find_blocks, scan_block};
use crate::schema::{FieldEntry, Incident};

static VALIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bvalidate(?:_each)?\b").unwrap());

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bexport\b").unwrap());

static FIELD_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"field\s+(?:'([^']+)'|"([^"]+)")\s+do"#).unwrap());

static FIELD_INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"field\s+(?:'([^']+)'|"([^"]+)")\s*,\s*([^;]*?)(?:\bend\b|\n|$)"#).unwrap()
});

static LABEL_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\blabel\s+(?:'([^']+)'|"([^"]+)")"#).unwrap());

static PATH_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bpath\s+(?:'([^']+)'|"([^"]+)")"#).unwrap());

static LABEL_KW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"label\s*:\s*(?:'([^']+)'|"([^"]+)")"#).unwrap());

static PATH_KW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"path\s*:\s*(?:'([^']+)'|"([^"]+)")"#).unwrap());

/// A field declaration in one of the two surface syntaxes.
#[derive(Debug, Clone)]
enum ParsedField {
    Block(FieldEntry),
    Inline(FieldEntry),
}

/// Extract every incident from a template.
///
/// Placeholder references in the summary/detail prose are resolved against
/// `template_name`. A validation block with no summary, no detail and no
/// exported fields produces no incident.
pub fn parse_incidents(text: &str, template_name: &str) -> Vec<Incident> {
    let mut incidents = Vec::new();
    for span in find_blocks(text, &VALIDATE_RE) {
        let block = span.slice(text);
        let summary = template_string(block, "summary_template")
            .map(|s| replace_policy_name_refs(&s, template_name));
        let detail = template_string(block, "detail_template")
            .map(|s| replace_policy_name_refs(&s, template_name));

        let mut export = Vec::new();
        for espan in find_blocks(block, &EXPORT_RE) {
            export.extend(export_fields(espan.slice(block)));
        }

        if summary.is_some() || detail.is_some() || !export.is_empty() {
            incidents.push(Incident {
                summary_template: summary,
                detail_template: detail,
                export,
                path: None,
            });
        }
    }
    incidents
}

/// Extract field declarations from one `export` block, both syntaxes merged.
pub fn export_fields(export_block: &str) -> Vec<FieldEntry> {
    let mut parsed = Vec::new();

    for caps in FIELD_BLOCK_RE.captures_iter(export_block) {
        let Some(name) = quoted_group(&caps) else {
            continue;
        };
        let Some(whole) = caps.get(0) else { continue };
        let body_start = whole.end();
        let span = scan_block(export_block, body_start);
        let body = block_body(export_block, body_start, span.end);
        parsed.push(ParsedField::Block(FieldEntry {
            name,
            label: capture_value(&LABEL_DECL_RE, body),
            path: capture_value(&PATH_DECL_RE, body),
        }));
    }

    for caps in FIELD_INLINE_RE.captures_iter(export_block) {
        let Some(name) = quoted_group(&caps) else {
            continue;
        };
        let kwargs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        parsed.push(ParsedField::Inline(FieldEntry {
            name,
            label: capture_value(&LABEL_KW_RE, kwargs),
            path: capture_value(&PATH_KW_RE, kwargs),
        }));
    }

    merge_fields(parsed)
}

/// Merge parsed fields: every block-style entry is kept, an inline entry is
/// kept only when its name has not been seen yet. First seen wins.
fn merge_fields(parsed: Vec<ParsedField>) -> Vec<FieldEntry> {
    let mut fields: Vec<FieldEntry> = Vec::new();
    for f in &parsed {
        if let ParsedField::Block(entry) = f {
            fields.push(entry.clone());
        }
    }
    for f in parsed {
        if let ParsedField::Inline(entry) = f {
            if !fields.iter().any(|e| e.name == entry.name) {
                fields.push(entry);
            }
        }
    }
    fields
}

/// Extract a `summary_template` / `detail_template` value from a validation
/// block, heredoc form preferred over the quoted form, trimmed.
fn template_string(block: &str, key: &str) -> Option<String> {
    if let Some(v) = heredoc_template(block, key) {
        return Some(v);
    }
    let re = Regex::new(&format!(
        r#"(?s){}\s+(?:'([^']*)'|"([^"]*)")"#,
        regex::escape(key)
    ))
    .ok()?;
    let caps = re.captures(block)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
}

fn heredoc_template(block: &str, key: &str) -> Option<String> {
    // Heredoc form requires a quoted terminator: summary_template <<-'EOS'
    let open_re = Regex::new(&format!(r"{}\s+<<-?'(\w+)'", regex::escape(key))).ok()?;
    let caps = open_re.captures(block)?;
    let term = caps.get(1)?.as_str();
    let body_start = caps.get(0)?.end();
    let rest = &block[body_start..];
    let term_at = rest.find(term)?;
    Some(rest[..term_at].trim().to_string())
}

/// The inner text of a scanned block, with the trailing `end` stripped.
fn block_body(text: &str, start: usize, block_end: usize) -> &str {
    let mut end = block_end.saturating_sub(3);
    if end <= start {
        return "";
    }
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[start..end]
}

fn quoted_group(caps: &regex::Captures<'_>) -> Option<String> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn capture_value(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}
