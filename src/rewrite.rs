//! Placeholder rewriting for summary/detail prose.
//!
//! Incident prose refers to the template's own name through Go-template
//! style placeholders, `{{ .policy_name }}` or `{{ .summary_policy_name }}`,
//! sometimes wrapped in `{{ with ... }} ... {{ end }}` conditionals. The
//! rewriter substitutes the literal template name for both forms and then
//! tidies the surrounding whitespace. Applying it twice changes nothing.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Upper bound on wrapper-unwrapping passes. Each pass can expose at most
/// one more wrapper level, so real templates converge in one or two.
const MAX_PASSES: usize = 16;

static WITH_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\{\{-?\s*with\b[^}]*\}\}(.*?)\{\{-?\s*end\s*-?\}\}").unwrap()
});

static POLICY_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{[^}]*\.(?:summary_)?policy_name[^}]*\}\}").unwrap());

static BARE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{-?\s*\.(?:summary_)?policy_name\s*-?\}\}").unwrap()
});

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

static SPACE_BEFORE_COLON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+:").unwrap());

/// Replace self-referential placeholders with the template's literal name.
///
/// Conditional wrappers whose body mentions the placeholder are replaced
/// whole, markers included; this repeats to a fixpoint because unwrapping an
/// outer conditional can expose another one. Remaining bare placeholders are
/// then substituted directly, and runs of horizontal whitespace plus any
/// whitespace before a colon are collapsed.
pub fn replace_policy_name_refs(text: &str, template_name: &str) -> String {
    if text.is_empty() || template_name.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    for _ in 0..MAX_PASSES {
        let next = WITH_BLOCK_RE
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                if POLICY_REF_RE.is_match(inner) {
                    template_name.to_string()
                } else {
                    caps.get(0).map(|m| m.as_str()).unwrap_or("").to_string()
                }
            })
            .into_owned();
        if next == out {
            break;
        }
        out = next;
    }

    let out = BARE_REF_RE.replace_all(&out, NoExpand(template_name));
    let out = MULTI_SPACE_RE.replace_all(&out, " ");
    SPACE_BEFORE_COLON_RE.replace_all(&out, ":").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_placeholder_both_spellings() {
        assert_eq!(
            replace_policy_name_refs("{{ .policy_name }} report", "Foo"),
            "Foo report"
        );
        assert_eq!(
            replace_policy_name_refs("{{ .summary_policy_name }} report", "Foo"),
            "Foo report"
        );
    }

    #[test]
    fn trim_markers_and_case_are_accepted() {
        assert_eq!(
            replace_policy_name_refs("{{- .Policy_Name -}}: found", "Foo"),
            "Foo: found"
        );
    }

    #[test]
    fn wrapper_containing_placeholder_is_replaced_whole() {
        let text = "{{ with .details }}{{ .policy_name }}{{ end }}: 3 items";
        assert_eq!(replace_policy_name_refs(text, "Foo"), "Foo: 3 items");
    }

    #[test]
    fn wrapper_without_placeholder_is_left_alone() {
        let text = "{{ with .x }}other{{ end }}";
        assert_eq!(replace_policy_name_refs(text, "Foo"), text);
    }

    #[test]
    fn doubly_wrapped_placeholder_needs_the_fixpoint() {
        let text = "{{ with .a }}{{ with .b }}{{ .policy_name }}{{ end }}{{ end }}";
        assert_eq!(replace_policy_name_refs(text, "Foo"), "Foo{{ end }}");
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(
            replace_policy_name_refs("{{ .policy_name }}  :  too   many spaces", "Foo"),
            "Foo: too many spaces"
        );
    }

    #[test]
    fn empty_name_leaves_text_untouched() {
        let text = "{{ .policy_name }}   kept";
        assert_eq!(replace_policy_name_refs(text, ""), text);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let samples = [
            "{{ with .a }}{{ .policy_name }}{{ end }} msg",
            "{{ .summary_policy_name }}: {{ .count }} items",
            "plain   text : with spaces",
            "{{ with .a }}{{ with .b }}{{ .policy_name }}{{ end }}{{ end }}",
        ];
        for text in samples {
            let once = replace_policy_name_refs(text, "Foo");
            let twice = replace_policy_name_refs(&once, "Foo");
            assert_eq!(once, twice, "not idempotent for {text:?}");
        }
    }
}
