//! Core data structures for the Document Tree.
//!
//! The tree mirrors the block and mark vocabulary of the rich-text editor:
//! blocks own other blocks or inline content, inline content is either a
//! text run carrying marks or a hard break. Marks never attach to blocks,
//! which the types enforce by only giving [`Text`] a `marks` field.

use serde::Serialize;

/// Root of a document. Always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Block>,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    BulletList(BulletList),
    OrderedList(OrderedList),
    TaskList(TaskList),
    Table(Table),
    Blockquote(Blockquote),
    CodeBlock(CodeBlock),
    HorizontalRule,
    Image(Image),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub content: Vec<Inline>,
}

/// Heading with a level between 1 and 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulletList {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedList {
    pub start: u32,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub children: Vec<Block>,
}

/// A list whose items carry a checked flag. Task items only live here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub items: Vec<TaskItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    pub checked: bool,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A table cell. `header` is only ever true in the first row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub header: bool,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Blockquote {
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
}

/// Inline content of paragraphs and headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text(Text),
    HardBreak,
}

/// A run of text with its marks, kept in canonical (sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// Formatting marks. The variant order is the nesting order used when the
/// markup form is written: links outermost, inline code innermost.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Link { href: String },
    Bold,
    Italic,
    Strike,
    Highlight,
    Code,
}

impl Document {
    /// Build a document, inserting an empty paragraph when there are no blocks.
    pub fn new(children: Vec<Block>) -> Self {
        if children.is_empty() {
            Document {
                children: vec![Block::Paragraph(Paragraph::default())],
            }
        } else {
            Document { children }
        }
    }

    /// A document holding `text` verbatim as one unformatted paragraph.
    pub fn plain_text(text: &str) -> Self {
        let content = if text.is_empty() {
            vec![]
        } else {
            vec![Inline::text(text)]
        };
        Document::new(vec![Block::Paragraph(Paragraph { content })])
    }

    /// Concatenated text of every text run in the document.
    pub fn text_content(&self) -> String {
        self.children.iter().map(Block::text_content).collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new(vec![])
    }
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph(Paragraph { content })
    }

    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading(Heading {
            level: level.clamp(1, 3),
            content,
        })
    }

    /// Short kind name used by tree dumps and skeletons.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading(_) => "heading",
            Block::BulletList(_) => "bulletList",
            Block::OrderedList(_) => "orderedList",
            Block::TaskList(_) => "taskList",
            Block::Table(_) => "table",
            Block::Blockquote(_) => "blockquote",
            Block::CodeBlock(_) => "codeBlock",
            Block::HorizontalRule => "horizontalRule",
            Block::Image(_) => "image",
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            Block::Paragraph(p) => inline_text(&p.content),
            Block::Heading(h) => inline_text(&h.content),
            Block::BulletList(l) => l.items.iter().map(|i| blocks_text(&i.children)).collect(),
            Block::OrderedList(l) => l.items.iter().map(|i| blocks_text(&i.children)).collect(),
            Block::TaskList(l) => l.items.iter().map(|i| blocks_text(&i.children)).collect(),
            Block::Table(t) => t
                .rows
                .iter()
                .flat_map(|r| r.cells.iter())
                .map(|c| blocks_text(&c.children))
                .collect(),
            Block::Blockquote(q) => blocks_text(&q.children),
            Block::CodeBlock(c) => c.code.clone(),
            Block::HorizontalRule | Block::Image(_) => String::new(),
        }
    }
}

impl Paragraph {
    pub fn text_content(&self) -> String {
        inline_text(&self.content)
    }
}

impl Inline {
    /// Unmarked text run.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(Text {
            text: text.into(),
            marks: vec![],
        })
    }

    /// Text run with marks; the marks are sorted and deduplicated.
    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut marks = marks;
        marks.sort();
        marks.dedup();
        Inline::Text(Text {
            text: text.into(),
            marks,
        })
    }
}

fn inline_text(content: &[Inline]) -> String {
    content
        .iter()
        .filter_map(|inline| match inline {
            Inline::Text(t) => Some(t.text.as_str()),
            Inline::HardBreak => None,
        })
        .collect()
}

fn blocks_text(blocks: &[Block]) -> String {
    blocks.iter().map(Block::text_content).collect()
}
