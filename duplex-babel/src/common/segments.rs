//! Split Markdown text into rewritable text and verbatim stretches.
//!
//! Regex passes over Markdown (the highlight and strong pre-passes, the
//! serializer's tag safety net) must never touch code: fenced blocks,
//! indented blocks or inline spans. Raw HTML tables can be kept verbatim too.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary Markdown text; safe to rewrite.
    Text(&'a str),
    /// Code blocks, code spans and (optionally) raw HTML tables.
    Verbatim(&'a str),
}

/// Split `source` into segments. With `raw_tables`, a line starting with
/// `<table` opens a verbatim stretch that ends with the line holding `</table>`.
///
/// A line indented by four columns opens an indented code block when it
/// follows a blank line (or starts the input) outside a list; the block runs
/// until the next line indented less that is not blank.
pub fn split(source: &str, raw_tables: bool) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut offset = 0;
    let mut lines = source.split_inclusive('\n').peekable();
    let mut after_blank = true;
    let mut in_list = false;

    while let Some(line) = lines.next() {
        let line_start = offset;
        offset += line.len();

        let blank = line.trim().is_empty();
        if after_blank && !in_list && !blank && indent_width(line) >= 4 {
            let mut end = offset;
            while let Some(next) = lines.next_if(|l| l.trim().is_empty() || indent_width(l) >= 4) {
                end += next.len();
            }
            split_code_spans(&source[text_start..line_start], &mut segments);
            segments.push(Segment::Verbatim(&source[line_start..end]));
            offset = end;
            text_start = end;
            after_blank = true;
            continue;
        }

        if !blank {
            if starts_list_item(line) {
                in_list = true;
            } else if after_blank && indent_width(line) < 2 {
                in_list = false;
            }
        }
        after_blank = blank;

        let block_end = if let Some((ch, len)) = fence_open(line) {
            let mut end = offset;
            for next in lines.by_ref() {
                end += next.len();
                if fence_closes(next, ch, len) {
                    break;
                }
            }
            Some(end)
        } else if raw_tables && line.trim_start().starts_with("<table") {
            let mut end = offset;
            if !line.contains("</table>") {
                for next in lines.by_ref() {
                    end += next.len();
                    if next.contains("</table>") {
                        break;
                    }
                }
            }
            Some(end)
        } else {
            None
        };

        if let Some(end) = block_end {
            split_code_spans(&source[text_start..line_start], &mut segments);
            segments.push(Segment::Verbatim(&source[line_start..end]));
            offset = end;
            text_start = end;
            after_blank = true;
        }
    }

    split_code_spans(&source[text_start..], &mut segments);
    segments
}

/// Apply `rewrite` to every text segment, copying verbatim segments as is.
pub fn map_text<F>(source: &str, raw_tables: bool, mut rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    split(source, raw_tables)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => rewrite(text),
            Segment::Verbatim(raw) => raw.to_string(),
        })
        .collect()
}

/// Whether `line` opens a bullet or ordered list item.
pub fn starts_list_item(line: &str) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let rest = match trimmed.chars().next() {
        Some('-' | '*' | '+') => &trimmed[1..],
        Some(c) if c.is_ascii_digit() => {
            let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
            match trimmed[digits..].chars().next() {
                Some('.' | ')') if digits <= 9 => &trimmed[digits + 1..],
                _ => return false,
            }
        }
        _ => return false,
    };
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

/// Leading indentation in columns; a tab advances to the next multiple of four.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

fn fence_open(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    if ch == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some((ch, len))
}

fn fence_closes(line: &str, ch: char, len: usize) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let run = trimmed.chars().take_while(|c| *c == ch).count();
    run >= len && trimmed[run..].trim().is_empty()
}

fn split_code_spans<'a>(text: &'a str, segments: &mut Vec<Segment<'a>>) {
    if text.is_empty() {
        return;
    }
    let bytes = text.as_bytes();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = backtick_run(bytes, i);
        if i > 0 && bytes[i - 1] == b'\\' {
            i += run;
            continue;
        }
        match find_closing_run(bytes, i + run, run) {
            Some(close) => {
                if plain_start < i {
                    segments.push(Segment::Text(&text[plain_start..i]));
                }
                segments.push(Segment::Verbatim(&text[i..close + run]));
                i = close + run;
                plain_start = i;
            }
            None => i += run,
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(&text[plain_start..]));
    }
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| **b == b'`').count()
}

fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = backtick_run(bytes, i);
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code_is_verbatim() {
        assert_eq!(
            split("a `==x==` b", false),
            vec![
                Segment::Text("a "),
                Segment::Verbatim("`==x==`"),
                Segment::Text(" b"),
            ]
        );
    }

    #[test]
    fn test_fenced_block_is_verbatim() {
        let source = "before\n```rust\nlet x = **y**;\n```\nafter";
        assert_eq!(
            split(source, false),
            vec![
                Segment::Text("before\n"),
                Segment::Verbatim("```rust\nlet x = **y**;\n```\n"),
                Segment::Text("after"),
            ]
        );
    }

    #[test]
    fn test_indented_block_is_verbatim() {
        assert_eq!(
            split("    a ==b== c", false),
            vec![Segment::Verbatim("    a ==b== c")]
        );
        let source = "intro\n\n    let x = **y**;\n\n    more\nafter";
        assert_eq!(
            split(source, false),
            vec![
                Segment::Text("intro\n\n"),
                Segment::Verbatim("    let x = **y**;\n\n    more\n"),
                Segment::Text("after"),
            ]
        );
    }

    #[test]
    fn test_indented_line_needs_blank_line_before() {
        let source = "para\n    still ==para==";
        assert_eq!(split(source, false), vec![Segment::Text(source)]);
    }

    #[test]
    fn test_indented_list_continuation_is_text() {
        let source = "- item\n\n    more ==x==";
        assert_eq!(split(source, false), vec![Segment::Text(source)]);
        let after_list = "- item\n\nplain\n\n    code ==x==";
        assert_eq!(
            split(after_list, false),
            vec![
                Segment::Text("- item\n\nplain\n\n"),
                Segment::Verbatim("    code ==x=="),
            ]
        );
    }

    #[test]
    fn test_list_item_starts() {
        assert!(starts_list_item("- a"));
        assert!(starts_list_item("12) a"));
        assert!(starts_list_item("*"));
        assert!(!starts_list_item("---"));
        assert!(!starts_list_item("**a**"));
        assert!(!starts_list_item("3.14"));
    }

    #[test]
    fn test_unclosed_backticks_stay_text() {
        assert_eq!(split("a ``b` c", false), vec![Segment::Text("a ``b` c")]);
    }

    #[test]
    fn test_raw_tables_only_when_requested() {
        let source = "x\n<table><tr><td><b>a</b></td></tr></table>\ny";
        assert_eq!(split(source, false), vec![Segment::Text(source)]);
        assert_eq!(
            split(source, true),
            vec![
                Segment::Text("x\n"),
                Segment::Verbatim("<table><tr><td><b>a</b></td></tr></table>\n"),
                Segment::Text("y"),
            ]
        );
    }

    #[test]
    fn test_map_text_rewrites_only_text() {
        let out = map_text("up `up` up", false, |t| t.to_uppercase());
        assert_eq!(out, "UP `up` UP");
    }
}
