//! Inline pre-pass rules
//!
//! The generic Markdown grammar is never patched. Syntax it lacks (the
//! `==highlight==` token) or handles too strictly (`**Tier(Free)**`) is
//! rewritten to explicit inline tags before the generic parse, by rules
//! handed to each [`MarkdownParser`](super::parser::MarkdownParser) when it
//! is built. Rules only ever see text outside code fences and code spans.

use crate::common::segments::starts_list_item;
use once_cell::sync::Lazy;
use regex::Regex;

/// A text rewrite applied before the generic Markdown parse.
pub trait InlineRule: Send + Sync {
    /// Short identifier, used in logs.
    fn name(&self) -> &str;

    /// Rewrite one stretch of non-code Markdown text.
    fn apply(&self, text: &str) -> String;
}

static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"==((?:\\.|[^=\\\n])+)==").expect("highlight pattern is valid")
});

/// `==text==` → `<mark>text</mark>`. An escaped opening (`\==`) is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightRule;

impl InlineRule for HighlightRule {
    fn name(&self) -> &str {
        "highlight"
    }

    fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut search = 0;

        while let Some(caps) = HIGHLIGHT.captures_at(text, search) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            if is_escaped(text, whole.start()) {
                search = whole.start() + 1;
                continue;
            }
            out.push_str(&text[copied..whole.start()]);
            out.push_str("<mark>");
            out.push_str(inner.as_str());
            out.push_str("</mark>");
            copied = whole.end();
            search = whole.end();
        }

        out.push_str(&text[copied..]);
        out
    }
}

/// `**…**` → `<strong>…</strong>`, tolerating single `*` inside the span.
///
/// The span closes at the first `**` after a non-empty body; that `**` must
/// not be followed by a third `*` or preceded by a backslash. The body may
/// not open with whitespace or run into a line that starts a new block
/// (blank line, list item, quote, heading or table row). Inner emphasis is left as
/// Markdown, so the generic parse still tokenizes it inside the emitted tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveStrongRule;

impl InlineRule for PermissiveStrongRule {
    fn name(&self) -> &str {
        "permissive-strong"
    }

    fn apply(&self, text: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;

        while i + 1 < bytes.len() {
            let opens = bytes[i] == b'*'
                && bytes[i + 1] == b'*'
                && (i == 0 || (bytes[i - 1] != b'*' && bytes[i - 1] != b'\\'));
            if !opens {
                i += 1;
                continue;
            }
            match strong_close(text, i + 2) {
                Some(close) => {
                    out.push_str(&text[copied..i]);
                    out.push_str("<strong>");
                    out.push_str(&text[i + 2..close]);
                    out.push_str("</strong>");
                    copied = close + 2;
                    i = close + 2;
                }
                None => i += 2,
            }
        }

        out.push_str(&text[copied..]);
        out
    }
}

/// Byte offset of the closing `**` for a body starting at `start`.
fn strong_close(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let close = text[start..].find("**")? + start;
    if close == start || text[start..].starts_with(char::is_whitespace) {
        return None;
    }
    if text[start..close].split('\n').skip(1).any(starts_block) {
        return None;
    }
    if bytes.get(close + 2) == Some(&b'*') || bytes[close - 1] == b'\\' {
        return None;
    }
    Some(close)
}

fn starts_block(line: &str) -> bool {
    let trimmed = line.trim_start_matches(' ');
    trimmed.trim().is_empty()
        || trimmed.starts_with(&['#', '>', '|'][..])
        || starts_list_item(line)
}

fn is_escaped(text: &str, at: usize) -> bool {
    let backslashes = text[..at]
        .bytes()
        .rev()
        .take_while(|b| *b == b'\\')
        .count();
    backslashes % 2 == 1
}
