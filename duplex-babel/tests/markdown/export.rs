//! Markup → Markdown

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use duplex_babel::formats::markdown::{serialize_markup_to_markdown, MarkdownOptions};
use duplex_babel::markup_to_markdown;

fn to_markdown(markup: &str) -> String {
    serialize_markup_to_markdown(markup, &MarkdownOptions::default())
        .expect("markup to serialize")
}

fn gfm() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.tasklist = true;
    options.extension.strikethrough = true;
    options
}

fn find_first<'a>(
    node: &'a AstNode<'a>,
    predicate: &dyn Fn(&NodeValue) -> bool,
) -> Option<&'a AstNode<'a>> {
    if predicate(&node.data.borrow().value) {
        return Some(node);
    }
    node.children().find_map(|child| find_first(child, predicate))
}

#[test]
fn test_task_item_from_markup() {
    let markup = r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><label><input type="checkbox" checked></label><div><p>Done</p></div></li></ul>"#;
    assert_eq!(to_markdown(markup), "- [x] Done");
}

#[test]
fn test_header_row_inside_tbody() {
    let markup = "<table><colgroup><col><col></colgroup><tbody>\
        <tr><th><p>Name</p></th><th><p>Tier</p></th></tr>\
        <tr><td><p>Ann</p></td><td><p>Free</p></td></tr>\
        </tbody></table>";
    let markdown = to_markdown(markup);
    assert_eq!(markdown, "| Name | Tier |\n| --- | --- |\n| Ann | Free |");

    // A GFM reader sees exactly one header row.
    let arena = Arena::new();
    let root = parse_document(&arena, &markdown, &gfm());
    let header = find_first(root, &|v| matches!(v, NodeValue::TableRow(true)));
    assert!(header.is_some(), "table should have a header row");
    let rows = find_first(root, &|v| matches!(v, NodeValue::Table(_)))
        .map(|table| table.children().count());
    assert_eq!(rows, Some(2));
}

#[test]
fn test_headerless_table_stays_html() {
    let markup = "<table><tbody><tr><td><p>a</p></td><td><p>b</p></td></tr></tbody></table>";
    let markdown = to_markdown(markup);
    assert!(markdown.starts_with("<table>"), "got {markdown}");
    assert!(!markdown.contains('\n'));
}

#[test]
fn test_kept_tags_get_markdown_inside() {
    assert_eq!(to_markdown("<p><u><strong>a</strong></u></p>"), "<u>**a**</u>");
}

#[test]
fn test_curly_quotes_are_straightened() {
    assert_eq!(
        to_markdown("<p>\u{201c}quoted\u{201d} and \u{2018}single\u{2019}</p>"),
        "\"quoted\" and 'single'"
    );
}

#[test]
fn test_curly_quotes_kept_when_disabled() {
    let options = MarkdownOptions {
        normalize_quotes: false,
        ..MarkdownOptions::default()
    };
    let markdown = serialize_markup_to_markdown("<p>\u{201c}q\u{201d}</p>", &options).unwrap();
    assert_eq!(markdown, "\u{201c}q\u{201d}");
}

#[test]
fn test_code_block_with_language() {
    assert_eq!(
        to_markdown(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#),
        "```rust\nfn main() {}\n```"
    );
}

#[test]
fn test_highlight_is_written_with_equals() {
    assert_eq!(to_markdown("<p><mark>key</mark> point</p>"), "==key== point");
}

#[test]
fn test_fail_soft_conversion_returns_text() {
    let markdown = markup_to_markdown("<p>plain</p>", &MarkdownOptions::default());
    assert_eq!(markdown, "plain");
}

#[test]
fn test_kitchen_sink_snapshot() {
    let markup = concat!(
        "<h1>Release notes</h1>",
        "<p>Some <strong>bold</strong>, <em>italic</em>, <s>gone</s> and <mark>key</mark> text ",
        "with <code>code</code> and a <a href=\"https://example.com\">link</a>.</p>",
        "<ul><li><p>one</p></li><li><p>two</p></li></ul>",
        "<ol start=\"3\"><li><p>three</p></li></ol>",
        "<blockquote><p>quoted</p></blockquote>",
        "<hr>",
        "<p>^^^Figure 1^^^</p>",
    );
    insta::assert_snapshot!(to_markdown(markup), @r###"
    # Release notes

    Some **bold**, _italic_, ~gone~ and ==key== text with `code` and a [link](https://example.com).

    - one
    - two

    <!-- end list -->

    3.  three

    > quoted

    -----

    ^^^Figure 1^^^
    "###);
}
