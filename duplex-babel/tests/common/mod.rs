//! Shared builders and fixture access for the integration tests.

use duplex_babel::doc::{
    Block, Blockquote, BulletList, CodeBlock, Document, Image, Inline, ListItem, Mark,
    OrderedList, Table, TableCell, TableRow, TaskItem, TaskList,
};
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

pub fn para(text: &str) -> Block {
    Block::paragraph(vec![Inline::text(text)])
}

pub fn item(text: &str) -> ListItem {
    ListItem {
        children: vec![para(text)],
    }
}

pub fn task(checked: bool, text: &str) -> TaskItem {
    TaskItem {
        checked,
        children: vec![para(text)],
    }
}

pub fn cell(header: bool, text: &str) -> TableCell {
    TableCell {
        header,
        children: vec![para(text)],
    }
}

/// A document using every block kind and every mark.
pub fn kitchen_sink() -> Document {
    Document::new(vec![
        Block::heading(1, vec![Inline::text("Release notes")]),
        Block::paragraph(vec![
            Inline::text("Plain "),
            Inline::marked("bold", vec![Mark::Bold]),
            Inline::text(" "),
            Inline::marked("italic", vec![Mark::Italic]),
            Inline::text(" "),
            Inline::marked("gone", vec![Mark::Strike]),
            Inline::text(" "),
            Inline::marked("key", vec![Mark::Highlight]),
            Inline::text(" "),
            Inline::marked("code", vec![Mark::Code]),
            Inline::text(" "),
            Inline::marked(
                "link",
                vec![Mark::Link {
                    href: "https://example.com".to_string(),
                }],
            ),
            Inline::text(" then"),
            Inline::HardBreak,
            Inline::marked("both", vec![Mark::Bold, Mark::Italic]),
        ]),
        Block::BulletList(BulletList {
            items: vec![
                item("first"),
                ListItem {
                    children: vec![
                        para("second"),
                        Block::BulletList(BulletList {
                            items: vec![item("nested")],
                        }),
                    ],
                },
            ],
        }),
        Block::BulletList(BulletList {
            items: vec![item("separate list")],
        }),
        Block::TaskList(TaskList {
            items: vec![task(true, "shipped"), task(false, "pending")],
        }),
        Block::OrderedList(OrderedList {
            start: 3,
            items: vec![item("three"), item("four")],
        }),
        Block::OrderedList(OrderedList {
            start: 1,
            items: vec![item("again")],
        }),
        Block::Table(Table {
            rows: vec![
                TableRow {
                    cells: vec![cell(true, "Name"), cell(true, "Tier")],
                },
                TableRow {
                    cells: vec![cell(false, "Ann"), cell(false, "Free")],
                },
            ],
        }),
        Block::Blockquote(Blockquote {
            children: vec![para("quoted"), para("twice")],
        }),
        Block::CodeBlock(CodeBlock {
            language: Some("rust".to_string()),
            code: "fn main() {\n    println!(\"**not bold**\");\n}".to_string(),
        }),
        Block::HorizontalRule,
        Block::Image(Image {
            src: "/img/diagram.png".to_string(),
            alt: Some("Diagram".to_string()),
            title: None,
        }),
        para("^^^Figure 1^^^"),
    ])
}
