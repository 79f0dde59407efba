//! Markdown → Document Tree / markup

use duplex_babel::doc::{Block, Inline, Mark};
use duplex_babel::formats::markdown::{MarkdownParser, StrongRule};
use duplex_babel::Document;

fn parse(source: &str) -> Document {
    MarkdownParser::new()
        .parse_to_document(source)
        .expect("markdown to parse")
}

fn first_paragraph(doc: &Document) -> &[Inline] {
    match &doc.children[0] {
        Block::Paragraph(p) => &p.content,
        other => panic!("expected a paragraph, got {}", other.kind()),
    }
}

#[test]
fn test_strong_around_punctuation() {
    let doc = parse("**Tier(Free)** plans");
    let content = first_paragraph(&doc);
    assert_eq!(content[0], Inline::marked("Tier(Free)", vec![Mark::Bold]));
    assert_eq!(content[1], Inline::text(" plans"));
}

#[test]
fn test_stock_strong_rule_is_stricter() {
    let parser = MarkdownParser::builder()
        .strong_rule(StrongRule::Stock)
        .build();
    let markup = parser.parse_to_markup("a**Tier(Free)**b");
    assert!(!markup.contains("<strong>"), "got {markup}");
}

#[test]
fn test_highlight_round_trips() {
    let parser = MarkdownParser::new();
    let doc = parser.parse_to_document("==urgent== now").unwrap();
    assert_eq!(
        first_paragraph(&doc)[0],
        Inline::marked("urgent", vec![Mark::Highlight])
    );
    assert_eq!(parser.parse_to_markup("==urgent=="), "<p><mark>urgent</mark></p>");
}

#[test]
fn test_highlight_inside_code_is_literal() {
    let doc = parse("```\n==x==\n```");
    match &doc.children[0] {
        Block::CodeBlock(code) => assert_eq!(code.code, "==x=="),
        other => panic!("expected code, got {}", other.kind()),
    }
    let markup = MarkdownParser::new().parse_to_markup("`==y==`");
    assert_eq!(markup, "<p><code>==y==</code></p>");
}

#[test]
fn test_task_list() {
    let doc = parse("- [ ] write\n- [x] test");
    match &doc.children[0] {
        Block::TaskList(list) => {
            let checked: Vec<bool> = list.items.iter().map(|i| i.checked).collect();
            assert_eq!(checked, vec![false, true]);
        }
        other => panic!("expected a task list, got {}", other.kind()),
    }
}

#[test]
fn test_brackets_mid_text_stay_plain() {
    let doc = parse("- see [x] later");
    assert!(matches!(doc.children[0], Block::BulletList(_)));
}

#[test]
fn test_table_skeleton() {
    let doc = parse("| Name | Tier |\n| --- | --- |\n| Ann | Free |");
    assert_eq!(
        doc.skeleton().to_string(),
        "doc\n  table\n    tableRow\n      tableHeaderCell\n      tableHeaderCell\n    tableRow\n      tableCell\n      tableCell\n"
    );
}

#[test]
fn test_ordered_start() {
    let markup = MarkdownParser::new().parse_to_markup("3. three\n4. four");
    assert!(markup.starts_with("<ol start=\"3\">"), "got {markup}");
}

#[test]
fn test_deep_heading_is_clamped() {
    let doc = parse("##### Deep");
    match &doc.children[0] {
        Block::Heading(h) => assert_eq!(h.level, 3),
        other => panic!("expected a heading, got {}", other.kind()),
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(MarkdownParser::new().parse_to_markup(""), "<p></p>");
}
