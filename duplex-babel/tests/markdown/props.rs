//! Property checks for the Markdown pipeline.

use duplex_babel::doc::{
    Block, Blockquote, BulletList, CodeBlock, Document, Image, Inline, ListItem, Mark, OrderedList,
    Table, TableCell, TableRow, TaskItem, TaskList,
};
use duplex_babel::formats::markdown::normalize::tag_safety_net;
use duplex_babel::formats::markdown::serializer::{
    serialize_document, serialize_markup_to_markdown,
};
use duplex_babel::{MarkdownOptions, MarkdownParser};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn mark() -> impl Strategy<Value = Option<Mark>> {
    prop_oneof![
        Just(None),
        Just(Some(Mark::Bold)),
        Just(Some(Mark::Italic)),
        Just(Some(Mark::Strike)),
        Just(Some(Mark::Highlight)),
        Just(Some(Mark::Code)),
        word().prop_map(|w| Some(Mark::Link {
            href: format!("https://example.com/{w}")
        })),
    ]
}

/// Words separated by plain spaces, each with at most one mark.
fn inlines() -> impl Strategy<Value = Vec<Inline>> {
    prop::collection::vec((word(), mark()), 1..5).prop_map(|runs| {
        let mut content = Vec::new();
        for (index, (text, mark)) in runs.into_iter().enumerate() {
            if index > 0 {
                content.push(Inline::text(" "));
            }
            content.push(Inline::marked(text, mark.into_iter().collect()));
        }
        content
    })
}

fn paragraph() -> impl Strategy<Value = Block> {
    inlines().prop_map(Block::paragraph)
}

/// Item bodies: a paragraph, optionally followed by a nested list.
fn item_bodies(depth: u32) -> BoxedStrategy<Vec<Vec<Block>>> {
    let body = if depth == 0 {
        paragraph().prop_map(|p| vec![p]).boxed()
    } else {
        (paragraph(), prop::option::of(list(depth - 1)))
            .prop_map(|(p, nested)| {
                let mut body = vec![p];
                body.extend(nested);
                body
            })
            .boxed()
    };
    prop::collection::vec(body, 1..4).boxed()
}

fn list(depth: u32) -> BoxedStrategy<Block> {
    let items = |bodies: Vec<Vec<Block>>| {
        bodies
            .into_iter()
            .map(|children| ListItem { children })
            .collect::<Vec<_>>()
    };
    prop_oneof![
        item_bodies(depth).prop_map(move |bodies| Block::BulletList(BulletList {
            items: items(bodies)
        })),
        (1u32..12, item_bodies(depth)).prop_map(move |(start, bodies)| {
            Block::OrderedList(OrderedList {
                start,
                items: items(bodies),
            })
        }),
        (item_bodies(depth), prop::collection::vec(any::<bool>(), 3)).prop_map(
            |(bodies, flags)| Block::TaskList(TaskList {
                items: bodies
                    .into_iter()
                    .zip(flags)
                    .map(|(children, checked)| TaskItem { checked, children })
                    .collect(),
            })
        ),
    ]
    .boxed()
}

fn table() -> impl Strategy<Value = Block> {
    (1usize..4, 2usize..4)
        .prop_flat_map(|(columns, rows)| {
            prop::collection::vec(prop::collection::vec(word(), columns), rows)
        })
        .prop_map(|rows| {
            Block::Table(Table {
                rows: rows
                    .into_iter()
                    .enumerate()
                    .map(|(index, words)| TableRow {
                        cells: words
                            .into_iter()
                            .map(|w| TableCell {
                                header: index == 0,
                                children: vec![Block::paragraph(vec![Inline::text(w)])],
                            })
                            .collect(),
                    })
                    .collect(),
            })
        })
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        paragraph(),
        (1u8..=3, inlines()).prop_map(|(level, content)| Block::heading(level, content)),
        list(1),
        table(),
        prop::collection::vec(paragraph(), 1..3)
            .prop_map(|children| Block::Blockquote(Blockquote { children })),
        (
            prop::option::of("[a-z]{1,6}"),
            "[a-z]{1,8}( [a-z]{1,8}){0,3}"
        )
            .prop_map(|(language, code)| Block::CodeBlock(CodeBlock { language, code })),
        Just(Block::HorizontalRule),
        (word(), word()).prop_map(|(name, alt)| Block::Image(Image {
            src: format!("/img/{name}.png"),
            alt: Some(alt),
            title: None,
        })),
    ]
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(block(), 1..6).prop_map(Document::new)
}

proptest! {
    #[test]
    fn document_structure_survives_markdown(doc in document()) {
        let markdown = serialize_document(&doc, &MarkdownOptions::default()).unwrap();
        let back = MarkdownParser::new().parse(&markdown);
        prop_assert_eq!(back.skeleton(), doc.skeleton(), "markdown:\n{}", markdown);
    }

    #[test]
    fn bullet_lists_round_trip(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let source = words.iter().map(|w| format!("- {w}")).collect::<Vec<_>>().join("\n");
        let markup = MarkdownParser::new().parse_to_markup(&source);
        let back = serialize_markup_to_markdown(&markup, &MarkdownOptions::default()).unwrap();
        prop_assert_eq!(back, source);
    }

    #[test]
    fn highlight_round_trips(word in "[a-z]{1,12}") {
        let source = format!("=={word}==");
        let markup = MarkdownParser::new().parse_to_markup(&source);
        prop_assert_eq!(&markup, &format!("<p><mark>{word}</mark></p>"));
        let back = serialize_markup_to_markdown(&markup, &MarkdownOptions::default()).unwrap();
        prop_assert_eq!(back, source);
    }

    #[test]
    fn safety_net_leaves_clean_output_alone(text in "[a-z ]{0,40}") {
        let markup = format!("<p>{text}</p>");
        let markdown = serialize_markup_to_markdown(&markup, &MarkdownOptions::default()).unwrap();
        prop_assert_eq!(tag_safety_net(&markdown, "**", "_"), markdown);
    }
}
