//! Display-only decorations over the Document Tree
//!
//! A decoration is a `(range, style)` pair a rendering surface applies on
//! top of the document. Sources never mutate the tree and always return the
//! same set for the same tree, so they can be re-run after every change.
//!
//! The built-in source is [`CaptionScanner`]: a paragraph whose text is
//! wrapped in a marker (`^^^Figure 1^^^`) gets a `caption` node decoration,
//! and both markers get a `hidden-marker` inline decoration. The markers stay
//! in the text, so undo history and Markdown output keep them.

use crate::doc::{Block, Document, Inline, NodeRef};
use serde::Serialize;

pub const CAPTION_STYLE: &str = "caption";
pub const HIDDEN_MARKER_STYLE: &str = "hidden-marker";
pub const DEFAULT_CAPTION_MARKER: &str = "^^^";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    /// Applies to a whole node, `from` and `to` being its boundaries.
    Node,
    /// Applies to a run of inline content.
    Inline,
}

/// A render-only annotation over `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
    pub style: &'static str,
}

impl Decoration {
    pub fn node(from: usize, to: usize, style: &'static str) -> Self {
        Decoration {
            from,
            to,
            kind: DecorationKind::Node,
            style,
        }
    }

    pub fn inline(from: usize, to: usize, style: &'static str) -> Self {
        Decoration {
            from,
            to,
            kind: DecorationKind::Inline,
            style,
        }
    }
}

/// Anything that derives decorations from a document.
pub trait DecorationSource: Send + Sync {
    fn decorations(&self, doc: &Document) -> Vec<Decoration>;
}

/// Finds caption paragraphs.
#[derive(Debug, Clone)]
pub struct CaptionScanner {
    marker: String,
}

impl Default for CaptionScanner {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_MARKER)
    }
}

impl CaptionScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        CaptionScanner {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether `text` is a caption: marker, at least one character, marker.
    pub fn is_caption(&self, text: &str) -> bool {
        let m = self.marker.chars().count();
        m > 0
            && text.chars().count() > 2 * m
            && text.starts_with(self.marker.as_str())
            && text.ends_with(self.marker.as_str())
    }

    fn scan_paragraph(&self, content: &[Inline], pos: usize, size: usize, out: &mut Vec<Decoration>) {
        let text: String = content
            .iter()
            .filter_map(|inline| match inline {
                Inline::Text(run) => Some(run.text.as_str()),
                Inline::HardBreak => None,
            })
            .collect();
        if !self.is_caption(&text) {
            return;
        }

        let m = self.marker.chars().count();
        let n = text.chars().count();
        let (Some(lead_start), Some(lead_last), Some(trail_start), Some(trail_last)) = (
            char_position(content, pos + 1, 0),
            char_position(content, pos + 1, m - 1),
            char_position(content, pos + 1, n - m),
            char_position(content, pos + 1, n - 1),
        ) else {
            return;
        };

        out.push(Decoration::node(pos, pos + size, CAPTION_STYLE));
        out.push(Decoration::inline(lead_start, lead_last + 1, HIDDEN_MARKER_STYLE));
        out.push(Decoration::inline(trail_start, trail_last + 1, HIDDEN_MARKER_STYLE));
    }
}

impl DecorationSource for CaptionScanner {
    fn decorations(&self, doc: &Document) -> Vec<Decoration> {
        let mut out = Vec::new();
        doc.descendants(|node, pos| match node {
            NodeRef::Block(block @ Block::Paragraph(p)) => {
                self.scan_paragraph(&p.content, pos, block.node_size(), &mut out);
                false
            }
            NodeRef::Block(Block::Heading(_) | Block::CodeBlock(_)) => false,
            _ => true,
        });
        out
    }
}

/// Position of the `index`-th text character, counting from `start`.
/// Hard breaks occupy a position but no character.
fn char_position(content: &[Inline], start: usize, index: usize) -> Option<usize> {
    let mut pos = start;
    let mut seen = 0;
    for inline in content {
        match inline {
            Inline::Text(run) => {
                let len = run.text.chars().count();
                if index < seen + len {
                    return Some(pos + (index - seen));
                }
                seen += len;
                pos += len;
            }
            Inline::HardBreak => pos += 1,
        }
    }
    None
}

/// Run every source and concatenate the results, in source order.
pub fn collect(sources: &[Box<dyn DecorationSource>], doc: &Document) -> Vec<Decoration> {
    sources
        .iter()
        .flat_map(|source| source.decorations(doc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Blockquote, Mark};

    fn para(text: &str) -> Block {
        Block::paragraph(vec![Inline::text(text)])
    }

    #[test]
    fn test_caption() {
        let doc = Document::new(vec![para("^^^Figure 1^^^")]);
        assert_eq!(
            CaptionScanner::default().decorations(&doc),
            vec![
                Decoration::node(0, 16, CAPTION_STYLE),
                Decoration::inline(1, 4, HIDDEN_MARKER_STYLE),
                Decoration::inline(12, 15, HIDDEN_MARKER_STYLE),
            ]
        );
    }

    #[test]
    fn test_boundary() {
        let scanner = CaptionScanner::default();
        assert!(!scanner.is_caption("^^^^^^"));
        assert!(!scanner.is_caption("^^^^^"));
        assert!(scanner.is_caption("^^^x^^^"));
        assert!(scanner.is_caption("^^^^^^^"));
        assert!(!scanner.is_caption("^^^x^^"));
    }

    #[test]
    fn test_marks_and_hard_breaks() {
        let doc = Document::new(vec![
            para("intro"),
            Block::paragraph(vec![
                Inline::text("^^"),
                Inline::marked("^A", vec![Mark::Bold]),
                Inline::HardBreak,
                Inline::text("B^^^"),
            ]),
        ]);
        // The caption paragraph starts at 7; text "^^^AB^^^" with a break after 'A'.
        let decorations = CaptionScanner::default().decorations(&doc);
        assert_eq!(
            decorations,
            vec![
                Decoration::node(7, 18, CAPTION_STYLE),
                Decoration::inline(8, 11, HIDDEN_MARKER_STYLE),
                Decoration::inline(14, 17, HIDDEN_MARKER_STYLE),
            ]
        );
    }

    #[test]
    fn test_nested_paragraph() {
        let doc = Document::new(vec![Block::Blockquote(Blockquote {
            children: vec![para("^^^q^^^")],
        })]);
        let decorations = CaptionScanner::default().decorations(&doc);
        assert_eq!(decorations[0], Decoration::node(1, 10, CAPTION_STYLE));
    }

    #[test]
    fn test_custom_marker() {
        let doc = Document::new(vec![para("~~cap~~")]);
        assert_eq!(CaptionScanner::new("~~").decorations(&doc).len(), 3);
        assert!(CaptionScanner::default().decorations(&doc).is_empty());
    }

    #[test]
    fn test_headings_ignored() {
        let doc = Document::new(vec![Block::heading(1, vec![Inline::text("^^^x^^^")])]);
        assert!(CaptionScanner::default().decorations(&doc).is_empty());
    }
}
