//! Literal-aware lexer state.
//!
//! Tracks whether the current scan position sits inside a quoted string or a
//! heredoc, so block keyword matching can skip literal text. The state is
//! function-local to one scan pass and never persisted.

/// Transient literal-tracking state for a single scan pass.
///
/// Three literal forms are recognized:
/// - single/double-quoted strings, where a backslash suppresses the closing
///   quote for exactly one following character;
/// - heredocs opened by `<<TERM`, `<<-TERM` or `<<'TERM'`, closed by the
///   next word-boundary occurrence of `TERM`.
///
/// An unterminated string or heredoc extends to end of input: the scanner
/// then treats the whole remainder as literal rather than erroring out.
#[derive(Debug, Clone, Default)]
pub struct LexState {
    quote: Option<u8>,
    escaped: bool,
    heredoc_term: Option<String>,
}

impl LexState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while inside a quoted string or heredoc.
    pub fn in_literal(&self) -> bool {
        self.quote.is_some() || self.heredoc_term.is_some()
    }

    /// Classify the byte at `pos`.
    ///
    /// Returns `Some(next)` when the position is literal text or a literal
    /// delimiter, with `next` the position scanning should resume from.
    /// Returns `None` when the position is structural and the caller should
    /// attempt keyword matching there.
    pub fn step(&mut self, text: &[u8], pos: usize) -> Option<usize> {
        if let Some(term) = self.heredoc_term.take() {
            if is_word_at(text, pos, term.as_bytes()) {
                return Some(pos + term.len());
            }
            self.heredoc_term = Some(term);
            return Some(pos + 1);
        }

        if let Some(q) = self.quote {
            let c = text[pos];
            if !self.escaped && c == q {
                self.quote = None;
            }
            self.escaped = !self.escaped && c == b'\\';
            return Some(pos + 1);
        }

        match text[pos] {
            b'\'' | b'"' => {
                self.quote = Some(text[pos]);
                self.escaped = false;
                Some(pos + 1)
            }
            b'<' if text[pos..].starts_with(b"<<") => {
                let (term, len) = heredoc_marker(&text[pos..])?;
                self.heredoc_term = Some(term);
                Some(pos + len)
            }
            _ => None,
        }
    }
}

/// Parse a heredoc opener `<<-?'?IDENT'?` at the start of `s`.
///
/// Returns the terminator identifier and the number of bytes consumed.
fn heredoc_marker(s: &[u8]) -> Option<(String, usize)> {
    let mut i = 2; // past "<<"
    if s.get(i) == Some(&b'-') {
        i += 1;
    }
    if s.get(i) == Some(&b'\'') {
        i += 1;
    }
    let start = i;
    match s.get(i) {
        Some(c) if c.is_ascii_alphabetic() || *c == b'_' => i += 1,
        _ => return None,
    }
    while matches!(s.get(i), Some(c) if c.is_ascii_alphanumeric() || *c == b'_') {
        i += 1;
    }
    let term = String::from_utf8_lossy(&s[start..i]).into_owned();
    if s.get(i) == Some(&b'\'') {
        i += 1;
    }
    Some((term, i))
}

/// True when `word` occurs at `pos` with no alphanumeric neighbor on either
/// side, so `endpoint` is never mistaken for `end`.
pub(crate) fn is_word_at(text: &[u8], pos: usize, word: &[u8]) -> bool {
    text[pos..].starts_with(word)
        && (pos == 0 || !text[pos - 1].is_ascii_alphanumeric())
        && (pos + word.len() == text.len() || !text[pos + word.len()].is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the lexer over the whole input, collecting which positions were
    /// classified as literal.
    fn literal_positions(text: &str) -> Vec<bool> {
        let bytes = text.as_bytes();
        let mut state = LexState::new();
        let mut out = vec![false; bytes.len()];
        let mut i = 0;
        while i < bytes.len() {
            if let Some(next) = state.step(bytes, i) {
                for flag in out.iter_mut().take(next.min(bytes.len())).skip(i) {
                    *flag = true;
                }
                i = next;
            } else {
                i += 1;
            }
        }
        out
    }

    #[test]
    fn quoted_string_is_literal() {
        let text = r#"a "do" b"#;
        let lit = literal_positions(text);
        assert!(!lit[0]);
        assert!(lit[3] && lit[4]); // the "do" inside quotes
        assert!(!lit[7]);
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let text = r#""a\"b" c"#;
        let lit = literal_positions(text);
        assert!(lit[4]); // b is still inside the string
        assert!(!lit[7]); // c is structural
    }

    #[test]
    fn heredoc_runs_to_terminator_word() {
        let text = "x <<-'EOS'\nend end\nEOS done";
        let lit = literal_positions(text);
        let end_at = text.find("end").unwrap();
        assert!(lit[end_at]);
        let done_at = text.rfind("done").unwrap();
        assert!(!lit[done_at]);
    }

    #[test]
    fn heredoc_terminator_requires_word_boundary() {
        let text = "<<EOS\nEOSX\nEOS after";
        let lit = literal_positions(text);
        // EOSX does not close the heredoc; the bare EOS does.
        let x_at = text.find("EOSX").unwrap();
        assert!(lit[x_at]);
        let after_at = text.find("after").unwrap();
        assert!(!lit[after_at]);
    }

    #[test]
    fn unterminated_string_extends_to_end_of_input() {
        let lit = literal_positions("a 'never closed");
        assert!(lit[lit.len() - 1]);
    }

    #[test]
    fn word_boundary_rejects_keyword_prefixed_identifiers() {
        let text = b"endpoint end";
        assert!(!is_word_at(text, 0, b"end"));
        assert!(is_word_at(text, 9, b"end"));
    }
}
