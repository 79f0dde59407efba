//! XML-like Document Tree dump
//!
//! Serializes Document Tree nodes directly to an XML-like format, mostly for
//! inspecting what a conversion produced.
//!
//! ## Format
//!
//! - Node kind → tag name (kebab-case)
//! - Text runs → `<text>` with their marks as a `marks` attribute
//! - Children → nested tags (no wrapper)
//!
//! ## Example
//!
//! ```text
//! <document>
//!   <heading level="1">
//!     <text>Introduction</text>
//!   </heading>
//!   <paragraph>
//!     <text marks="bold">Welcome</text>
//!   </paragraph>
//! </document>
//! ```

use crate::doc::{Block, Document, Inline, Mark};
use crate::error::FormatError;
use crate::format::Format;
use std::collections::HashMap;

struct TagWriter {
    out: String,
    show_pos: bool,
}

impl TagWriter {
    fn open(&mut self, depth: usize, tag: &str, attrs: &[(&str, String)], pos: usize) {
        self.out.push_str(&"  ".repeat(depth));
        self.out.push('<');
        self.out.push_str(tag);
        for (key, value) in attrs {
            self.out
                .push_str(&format!(" {key}=\"{}\"", escape_xml(value)));
        }
        if self.show_pos {
            self.out.push_str(&format!(" pos=\"{pos}\""));
        }
        self.out.push('>');
    }

    fn close(&mut self, depth: usize, tag: &str) {
        self.out.push_str(&"  ".repeat(depth));
        self.out.push_str(&format!("</{tag}>\n"));
    }

    fn blocks(&mut self, blocks: &[Block], depth: usize, mut pos: usize) {
        for block in blocks {
            self.block(block, depth, pos);
            pos += block.node_size();
        }
    }

    fn block(&mut self, block: &Block, depth: usize, pos: usize) {
        let tag = to_tag_name(block.kind());
        let inner = pos + 1;
        match block {
            Block::Paragraph(p) => {
                self.open(depth, &tag, &[], pos);
                self.inlines(&p.content, depth + 1, inner, &tag);
            }
            Block::Heading(h) => {
                self.open(depth, &tag, &[("level", h.level.to_string())], pos);
                self.inlines(&h.content, depth + 1, inner, &tag);
            }
            Block::BulletList(l) => {
                self.open(depth, &tag, &[], pos);
                self.out.push('\n');
                self.items(l.items.iter().map(|i| (None, &i.children[..])), depth + 1, inner);
                self.close(depth, &tag);
            }
            Block::OrderedList(l) => {
                self.open(depth, &tag, &[("start", l.start.to_string())], pos);
                self.out.push('\n');
                self.items(l.items.iter().map(|i| (None, &i.children[..])), depth + 1, inner);
                self.close(depth, &tag);
            }
            Block::TaskList(l) => {
                self.open(depth, &tag, &[], pos);
                self.out.push('\n');
                self.items(
                    l.items.iter().map(|i| (Some(i.checked), &i.children[..])),
                    depth + 1,
                    inner,
                );
                self.close(depth, &tag);
            }
            Block::Table(t) => {
                self.open(depth, &tag, &[], pos);
                self.out.push('\n');
                let mut row_pos = inner;
                for row in &t.rows {
                    self.open(depth + 1, "table-row", &[], row_pos);
                    self.out.push('\n');
                    let mut cell_pos = row_pos + 1;
                    for cell in &row.cells {
                        let cell_tag = if cell.header {
                            "table-header-cell"
                        } else {
                            "table-cell"
                        };
                        self.open(depth + 2, cell_tag, &[], cell_pos);
                        self.out.push('\n');
                        self.blocks(&cell.children, depth + 3, cell_pos + 1);
                        self.close(depth + 2, cell_tag);
                        cell_pos += 2 + cell.children.iter().map(Block::node_size).sum::<usize>();
                    }
                    self.close(depth + 1, "table-row");
                    row_pos = cell_pos + 1;
                }
                self.close(depth, &tag);
            }
            Block::Blockquote(q) => {
                self.open(depth, &tag, &[], pos);
                self.out.push('\n');
                self.blocks(&q.children, depth + 1, inner);
                self.close(depth, &tag);
            }
            Block::CodeBlock(c) => {
                let attrs: Vec<(&str, String)> = c
                    .language
                    .iter()
                    .map(|lang| ("language", lang.clone()))
                    .collect();
                self.open(depth, &tag, &attrs, pos);
                self.out.push_str(&escape_xml(&c.code));
                self.out.push_str(&format!("</{tag}>\n"));
            }
            Block::HorizontalRule => {
                self.open(depth, &tag, &[], pos);
                self.out.push_str(&format!("</{tag}>\n"));
            }
            Block::Image(img) => {
                let mut attrs = vec![("src", img.src.clone())];
                if let Some(alt) = &img.alt {
                    attrs.push(("alt", alt.clone()));
                }
                if let Some(title) = &img.title {
                    attrs.push(("title", title.clone()));
                }
                self.open(depth, &tag, &attrs, pos);
                self.out.push_str(&format!("</{tag}>\n"));
            }
        }
    }

    fn items<'a, I>(&mut self, items: I, depth: usize, mut pos: usize)
    where
        I: Iterator<Item = (Option<bool>, &'a [Block])>,
    {
        for (checked, children) in items {
            let (tag, attrs) = match checked {
                Some(checked) => ("task-item", vec![("checked", checked.to_string())]),
                None => ("list-item", vec![]),
            };
            self.open(depth, tag, &attrs, pos);
            self.out.push('\n');
            self.blocks(children, depth + 1, pos + 1);
            self.close(depth, tag);
            pos += 2 + children.iter().map(Block::node_size).sum::<usize>();
        }
    }

    fn inlines(&mut self, content: &[Inline], depth: usize, mut pos: usize, parent: &str) {
        if content.is_empty() {
            self.out.push_str(&format!("</{parent}>\n"));
            return;
        }
        self.out.push('\n');
        for inline in content {
            match inline {
                Inline::Text(run) => {
                    let attrs: Vec<(&str, String)> = if run.marks.is_empty() {
                        vec![]
                    } else {
                        vec![("marks", marks_attr(&run.marks))]
                    };
                    self.open(depth, "text", &attrs, pos);
                    self.out.push_str(&escape_xml(&run.text));
                    self.out.push_str("</text>\n");
                    pos += run.text.chars().count();
                }
                Inline::HardBreak => {
                    self.open(depth, "hard-break", &[], pos);
                    self.out.push_str("</hard-break>\n");
                    pos += 1;
                }
            }
        }
        self.close(depth - 1, parent);
    }
}

fn marks_attr(marks: &[Mark]) -> String {
    marks
        .iter()
        .map(|mark| match mark {
            Mark::Link { href } => format!("link:{href}"),
            Mark::Bold => "bold".to_string(),
            Mark::Italic => "italic".to_string(),
            Mark::Strike => "strike".to_string(),
            Mark::Highlight => "highlight".to_string(),
            Mark::Code => "code".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a kind name to a tag name (e.g., "bulletList" → "bullet-list")
fn to_tag_name(kind: &str) -> String {
    let mut tag = String::new();
    for (i, c) in kind.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            tag.push('-');
        }
        tag.extend(c.to_lowercase());
    }
    tag
}

/// Serialize a document to tag format
pub fn serialize_document(doc: &Document) -> String {
    serialize_document_with_params(doc, &HashMap::new())
}

/// Serialize a document to tag format with optional parameters
///
/// # Parameters
///
/// - `"show-pos"`: When set to anything but `"false"`, every tag carries a
///   `pos` attribute with the position where the node starts.
pub fn serialize_document_with_params(doc: &Document, params: &HashMap<String, String>) -> String {
    let show_pos = params
        .get("show-pos")
        .map(|v| v != "false")
        .unwrap_or(false);

    let mut writer = TagWriter {
        out: String::from("<document>\n"),
        show_pos,
    };
    writer.blocks(&doc.children, 1, 0);
    writer.out.push_str("</document>");
    writer.out
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

/// Format implementation for XML-like tag format
pub struct TagFormat;

impl Format for TagFormat {
    fn name(&self) -> &str {
        "tag"
    }

    fn description(&self) -> &str {
        "XML-like dump of the document tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tag", "xml"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_document(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        Ok(serialize_document_with_params(doc, options))
    }
}
