//! The markup form in both directions.

use crate::common::kitchen_sink;
use duplex_babel::doc::{Block, Inline, Mark};
use duplex_babel::markup;

#[test]
fn test_canonical_markup_is_stable() {
    let canonical = "<h2>T</h2><p><strong>a<em>b</em></strong>c</p>";
    let doc = markup::parse(canonical).unwrap();
    assert_eq!(markup::serialize(&doc).unwrap(), canonical);
}

#[test]
fn test_kitchen_sink_survives_markup() {
    let doc = kitchen_sink();
    let html = markup::serialize(&doc).unwrap();
    assert_eq!(markup::parse(&html).unwrap(), doc);
}

#[test]
fn test_equivalent_bold_spellings_merge() {
    let doc = markup::parse(r#"<p><b>x</b><span style="font-weight:700">y</span></p>"#).unwrap();
    match &doc.children[0] {
        Block::Paragraph(p) => {
            assert_eq!(p.content, vec![Inline::marked("xy", vec![Mark::Bold])])
        }
        other => panic!("expected a paragraph, got {}", other.kind()),
    }
}

#[test]
fn test_task_list_markup() {
    let doc = markup::parse(
        r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><p>a</p></li><li><p>b</p></li></ul>"#,
    )
    .unwrap();
    assert_eq!(
        doc.skeleton().to_string(),
        "doc\n  taskList\n    taskItem(x)\n      paragraph\n    taskItem( )\n      paragraph\n"
    );
    let html = markup::serialize(&doc).unwrap();
    assert!(html.starts_with(r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><label><input type="checkbox" checked="checked"><span></span></label><div><p>a</p></div></li>"#), "got {html}");
}

#[test]
fn test_th_outside_first_row_is_a_cell() {
    let doc = markup::parse(
        "<table><tr><th>h</th></tr><tr><th>not a header</th></tr></table>",
    )
    .unwrap();
    match &doc.children[0] {
        Block::Table(table) => {
            assert!(table.rows[0].cells[0].header);
            assert!(!table.rows[1].cells[0].header);
        }
        other => panic!("expected a table, got {}", other.kind()),
    }
}

#[test]
fn test_images_are_lifted_out_of_paragraphs() {
    let doc = markup::parse(r#"<p><img src="/a.png" alt="A"></p>"#).unwrap();
    assert_eq!(doc.skeleton().to_string(), "doc\n  image\n");
}

#[test]
fn test_heading_levels_clamp() {
    let doc = markup::parse("<h6>deep</h6>").unwrap();
    assert_eq!(markup::serialize(&doc).unwrap(), "<h3>deep</h3>");
}

#[test]
fn test_empty_markup_is_one_paragraph() {
    let doc = markup::parse("").unwrap();
    assert_eq!(markup::serialize(&doc).unwrap(), "<p></p>");
}
