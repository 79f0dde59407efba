//! Integer positions over the Document Tree.
//!
//! Positions follow the editor's model: every node that has content takes
//! one position for its opening boundary and one for its closing boundary,
//! a text run takes one position per character, and leaf nodes (hard break,
//! horizontal rule, image) take one. The document's own content starts at 0.

use super::nodes::{Block, Document, Inline, ListItem, TableCell, TableRow, TaskItem, Text};

/// A borrowed view of any node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Block(&'a Block),
    ListItem(&'a ListItem),
    TaskItem(&'a TaskItem),
    TableRow(&'a TableRow),
    TableCell(&'a TableCell),
    Text(&'a Text),
    HardBreak,
}

impl NodeRef<'_> {
    pub fn node_size(&self) -> usize {
        match self {
            NodeRef::Block(b) => b.node_size(),
            NodeRef::ListItem(i) => 2 + blocks_size(&i.children),
            NodeRef::TaskItem(i) => 2 + blocks_size(&i.children),
            NodeRef::TableRow(r) => 2 + r.cells.iter().map(cell_size).sum::<usize>(),
            NodeRef::TableCell(c) => cell_size(c),
            NodeRef::Text(t) => t.text.chars().count(),
            NodeRef::HardBreak => 1,
        }
    }
}

impl Block {
    /// Number of positions this block occupies, boundaries included.
    pub fn node_size(&self) -> usize {
        match self {
            Block::Paragraph(p) => 2 + inline_size(&p.content),
            Block::Heading(h) => 2 + inline_size(&h.content),
            Block::BulletList(l) => 2 + l.items.iter().map(item_size).sum::<usize>(),
            Block::OrderedList(l) => 2 + l.items.iter().map(item_size).sum::<usize>(),
            Block::TaskList(l) => {
                2 + l
                    .items
                    .iter()
                    .map(|i| 2 + blocks_size(&i.children))
                    .sum::<usize>()
            }
            Block::Table(t) => {
                2 + t
                    .rows
                    .iter()
                    .map(|r| 2 + r.cells.iter().map(cell_size).sum::<usize>())
                    .sum::<usize>()
            }
            Block::Blockquote(q) => 2 + blocks_size(&q.children),
            Block::CodeBlock(c) => 2 + c.code.chars().count(),
            Block::HorizontalRule | Block::Image(_) => 1,
        }
    }
}

impl Document {
    /// Size of the document's content.
    pub fn content_size(&self) -> usize {
        blocks_size(&self.children)
    }

    /// Visit every node in document order with the position where it starts.
    ///
    /// The callback returns `false` to skip a node's children.
    pub fn descendants<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(NodeRef<'a>, usize) -> bool,
    {
        walk_blocks(&self.children, 0, &mut f);
    }
}

fn walk_blocks<'a, F>(blocks: &'a [Block], start: usize, f: &mut F) -> usize
where
    F: FnMut(NodeRef<'a>, usize) -> bool,
{
    let mut pos = start;
    for block in blocks {
        if f(NodeRef::Block(block), pos) {
            let inner = pos + 1;
            match block {
                Block::Paragraph(p) => {
                    walk_inlines(&p.content, inner, f);
                }
                Block::Heading(h) => {
                    walk_inlines(&h.content, inner, f);
                }
                Block::BulletList(l) => walk_items(&l.items, inner, f),
                Block::OrderedList(l) => walk_items(&l.items, inner, f),
                Block::TaskList(l) => {
                    let mut p = inner;
                    for item in &l.items {
                        let size = NodeRef::TaskItem(item).node_size();
                        if f(NodeRef::TaskItem(item), p) {
                            walk_blocks(&item.children, p + 1, f);
                        }
                        p += size;
                    }
                }
                Block::Table(t) => {
                    let mut p = inner;
                    for row in &t.rows {
                        let size = NodeRef::TableRow(row).node_size();
                        if f(NodeRef::TableRow(row), p) {
                            let mut cp = p + 1;
                            for cell in &row.cells {
                                if f(NodeRef::TableCell(cell), cp) {
                                    walk_blocks(&cell.children, cp + 1, f);
                                }
                                cp += cell_size(cell);
                            }
                        }
                        p += size;
                    }
                }
                Block::Blockquote(q) => {
                    walk_blocks(&q.children, inner, f);
                }
                Block::CodeBlock(_) | Block::HorizontalRule | Block::Image(_) => {}
            }
        }
        pos += block.node_size();
    }
    pos
}

fn walk_items<'a, F>(items: &'a [ListItem], start: usize, f: &mut F)
where
    F: FnMut(NodeRef<'a>, usize) -> bool,
{
    let mut pos = start;
    for item in items {
        if f(NodeRef::ListItem(item), pos) {
            walk_blocks(&item.children, pos + 1, f);
        }
        pos += item_size(item);
    }
}

fn walk_inlines<'a, F>(content: &'a [Inline], start: usize, f: &mut F) -> usize
where
    F: FnMut(NodeRef<'a>, usize) -> bool,
{
    let mut pos = start;
    for inline in content {
        match inline {
            Inline::Text(t) => {
                f(NodeRef::Text(t), pos);
                pos += t.text.chars().count();
            }
            Inline::HardBreak => {
                f(NodeRef::HardBreak, pos);
                pos += 1;
            }
        }
    }
    pos
}

fn inline_size(content: &[Inline]) -> usize {
    content
        .iter()
        .map(|inline| match inline {
            Inline::Text(t) => t.text.chars().count(),
            Inline::HardBreak => 1,
        })
        .sum()
}

fn blocks_size(blocks: &[Block]) -> usize {
    blocks.iter().map(Block::node_size).sum()
}

fn item_size(item: &ListItem) -> usize {
    2 + blocks_size(&item.children)
}

fn cell_size(cell: &TableCell) -> usize {
    2 + blocks_size(&cell.children)
}
