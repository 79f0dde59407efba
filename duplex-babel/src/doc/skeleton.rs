//! Structural skeleton of a document: node kinds, nesting and checked flags.
//!
//! Two documents with equal skeletons have the same block structure even if
//! their text, whitespace or marks differ. Round-trip tests compare these.

use super::nodes::{Block, Document, ListItem, TableCell};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub kind: &'static str,
    pub checked: Option<bool>,
    pub children: Vec<Skeleton>,
}

impl Skeleton {
    fn leaf(kind: &'static str) -> Self {
        Skeleton {
            kind,
            checked: None,
            children: vec![],
        }
    }

    fn branch(kind: &'static str, children: Vec<Skeleton>) -> Self {
        Skeleton {
            kind,
            checked: None,
            children,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}{}", "  ".repeat(depth), self.kind)?;
        if let Some(checked) = self.checked {
            write!(f, "({})", if checked { "x" } else { " " })?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl Document {
    pub fn skeleton(&self) -> Skeleton {
        Skeleton::branch("doc", blocks(&self.children))
    }
}

fn blocks(children: &[Block]) -> Vec<Skeleton> {
    children.iter().map(block).collect()
}

fn block(b: &Block) -> Skeleton {
    match b {
        Block::Paragraph(_) | Block::Heading(_) | Block::CodeBlock(_) => Skeleton::leaf(b.kind()),
        Block::HorizontalRule | Block::Image(_) => Skeleton::leaf(b.kind()),
        Block::BulletList(l) => Skeleton::branch(b.kind(), l.items.iter().map(list_item).collect()),
        Block::OrderedList(l) => {
            Skeleton::branch(b.kind(), l.items.iter().map(list_item).collect())
        }
        Block::TaskList(l) => Skeleton::branch(
            b.kind(),
            l.items
                .iter()
                .map(|item| Skeleton {
                    kind: "taskItem",
                    checked: Some(item.checked),
                    children: blocks(&item.children),
                })
                .collect(),
        ),
        Block::Table(t) => Skeleton::branch(
            b.kind(),
            t.rows
                .iter()
                .map(|row| Skeleton::branch("tableRow", row.cells.iter().map(cell).collect()))
                .collect(),
        ),
        Block::Blockquote(q) => Skeleton::branch(b.kind(), blocks(&q.children)),
    }
}

fn list_item(item: &ListItem) -> Skeleton {
    Skeleton::branch("listItem", blocks(&item.children))
}

fn cell(c: &TableCell) -> Skeleton {
    let kind = if c.header {
        "tableHeaderCell"
    } else {
        "tableCell"
    };
    Skeleton::leaf(kind)
}
