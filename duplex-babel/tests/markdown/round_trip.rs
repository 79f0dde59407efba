//! Document Tree → Markdown → Document Tree keeps the structure.

use crate::common::{fixture, kitchen_sink};
use duplex_babel::decorations::{CaptionScanner, DecorationSource};
use duplex_babel::formats::markdown::serializer::serialize_document;
use duplex_babel::{MarkdownOptions, MarkdownParser};

#[test]
fn test_kitchen_sink_structure_survives() {
    let doc = kitchen_sink();
    let markdown = serialize_document(&doc, &MarkdownOptions::default()).unwrap();
    let back = MarkdownParser::new().parse(&markdown);
    assert_eq!(back.skeleton(), doc.skeleton(), "markdown was:\n{markdown}");
}

#[test]
fn test_kitchen_sink_text_survives() {
    let doc = kitchen_sink();
    let markdown = serialize_document(&doc, &MarkdownOptions::default()).unwrap();
    let back = MarkdownParser::new().parse(&markdown);
    assert_eq!(back.text_content(), doc.text_content());
}

#[test]
fn test_custom_options_keep_structure() {
    let options = MarkdownOptions {
        bullet_marker: '*',
        emphasis_delimiter: "*".to_string(),
        strong_delimiter: "__".to_string(),
        ..MarkdownOptions::default()
    };
    let doc = kitchen_sink();
    let markdown = serialize_document(&doc, &options).unwrap();
    let back = MarkdownParser::new().parse(&markdown);
    assert_eq!(back.skeleton(), doc.skeleton(), "markdown was:\n{markdown}");
}

#[test]
fn test_fixture_is_stable() {
    let parser = MarkdownParser::new();
    let source = fixture("kitchensink.md");
    let first = parser.parse(&source);
    let markdown = serialize_document(&first, &MarkdownOptions::default()).unwrap();
    let second = parser.parse(&markdown);
    assert_eq!(second.skeleton(), first.skeleton(), "markdown was:\n{markdown}");

    let again = serialize_document(&second, &MarkdownOptions::default()).unwrap();
    assert_eq!(again, markdown);
}

#[test]
fn test_fixture_caption() {
    let doc = MarkdownParser::new().parse(&fixture("kitchensink.md"));
    assert_eq!(CaptionScanner::default().decorations(&doc).len(), 3);
}
