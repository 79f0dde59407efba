//! Final normalization stages of the Markdown serializer.
//!
//! The tree walk converts every element it understands, but raw HTML kept on
//! purpose (underline, superscript, subscript) carries its inner markup
//! through untouched. The tag safety net rewrites any `strong`/`b`/`em`/`i`
//! pairs and `<br>` left in the output into Markdown tokens. It only looks at
//! text outside code fences, code spans and raw HTML tables, skips escaped
//! tags, and leaves `<br>` inside GFM table rows alone, so clean output passes
//! through unchanged.

use crate::common::segments::{split, Segment};
use once_cell::sync::Lazy;
use regex::Regex;

static STRONG_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<strong(?:\s[^>]*)?>(.*?)</strong\s*>").expect("strong pattern is valid")
});
static B_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<b(?:\s[^>]*)?>(.*?)</b\s*>").expect("b pattern is valid")
});
static EM_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<em(?:\s[^>]*)?>(.*?)</em\s*>").expect("em pattern is valid")
});
static I_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<i(?:\s[^>]*)?>(.*?)</i\s*>").expect("i pattern is valid")
});
static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br pattern is valid"));

/// Straighten curly double and single quotes.
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' | '\u{201e}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Rewrite leftover raw bold/italic/line-break tags into Markdown.
pub fn tag_safety_net(markdown: &str, strong: &str, emphasis: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut offset = 0;

    for segment in split(markdown, true) {
        match segment {
            Segment::Verbatim(raw) => out.push_str(raw),
            Segment::Text(text) => {
                let mut rewritten = text.to_string();
                for _ in 0..4 {
                    // Nested pairs unwrap one level per round.
                    let next = rewrite_pairs(&rewritten, strong, emphasis);
                    if next == rewritten {
                        break;
                    }
                    rewritten = next;
                }
                out.push_str(&rewrite_breaks(markdown, offset, &rewritten));
            }
        }
        offset += match segment {
            Segment::Text(t) | Segment::Verbatim(t) => t.len(),
        };
    }

    out
}

fn rewrite_pairs(text: &str, strong: &str, emphasis: &str) -> String {
    let text = replace_unescaped(&STRONG_TAG, text, strong);
    let text = replace_unescaped(&B_TAG, &text, strong);
    let text = replace_unescaped(&EM_TAG, &text, emphasis);
    replace_unescaped(&I_TAG, &text, emphasis)
}

fn replace_unescaped(pattern: &Regex, text: &str, delimiter: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(caps) = pattern.captures_at(text, search) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if text[..whole.start()].ends_with('\\') {
            search = whole.start() + 1;
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        let body = inner.as_str();
        let trimmed = body.trim();
        if trimmed.is_empty() {
            out.push_str(body);
        } else {
            let lead = &body[..body.len() - body.trim_start().len()];
            let trail = &body[body.trim_end().len()..];
            out.push_str(lead);
            out.push_str(delimiter);
            out.push_str(trimmed);
            out.push_str(delimiter);
            out.push_str(trail);
        }
        copied = whole.end();
        search = whole.end();
    }

    out.push_str(&text[copied..]);
    out
}

/// Replace `<br>` by a backslash line break, except on GFM table rows.
/// `offset` is where `text` started in `full`, used to find the row.
fn rewrite_breaks(full: &str, offset: usize, text: &str) -> String {
    let line_start = full[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut in_table_row = full[line_start..].trim_start().starts_with('|');

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for m in BR_TAG.find_iter(text) {
        let before = &text[copied..m.start()];
        if let Some(newline) = before.rfind('\n') {
            in_table_row = before[newline + 1..].trim_start().starts_with('|');
        }
        out.push_str(before);
        let escaped = text[..m.start()].ends_with('\\');
        if in_table_row || escaped {
            out.push_str(m.as_str());
        } else {
            out.push_str("\\\n");
        }
        copied = m.end();
    }
    out.push_str(&text[copied..]);
    out
}
