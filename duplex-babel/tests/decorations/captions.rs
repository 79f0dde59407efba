//! Caption decorations over parsed documents.

use duplex_babel::decorations::{
    collect, CaptionScanner, Decoration, DecorationKind, DecorationSource, CAPTION_STYLE,
    HIDDEN_MARKER_STYLE,
};
use duplex_babel::{markup, MarkdownParser};
use proptest::prelude::*;

#[test]
fn test_caption_after_other_blocks() {
    let doc = MarkdownParser::new().parse("# T\n\n^^^Fig^^^");
    // heading "T" takes 3 positions
    assert_eq!(
        CaptionScanner::default().decorations(&doc),
        vec![
            Decoration::node(3, 14, CAPTION_STYLE),
            Decoration::inline(4, 7, HIDDEN_MARKER_STYLE),
            Decoration::inline(10, 13, HIDDEN_MARKER_STYLE),
        ]
    );
}

#[test]
fn test_marker_only_paragraph_is_not_a_caption() {
    let doc = markup::parse("<p>^^^^^^</p>").unwrap();
    assert!(CaptionScanner::default().decorations(&doc).is_empty());
}

#[test]
fn test_caption_inside_list_item() {
    let doc = markup::parse("<ul><li><p>^^^x^^^</p></li></ul>").unwrap();
    let decorations = CaptionScanner::default().decorations(&doc);
    assert_eq!(decorations[0], Decoration::node(2, 11, CAPTION_STYLE));
}

#[test]
fn test_collect_keeps_source_order() {
    let doc = markup::parse("<p>^^^a^^^</p><p>~~b~~</p>").unwrap();
    let sources: Vec<Box<dyn DecorationSource>> = vec![
        Box::new(CaptionScanner::new("~~")),
        Box::new(CaptionScanner::default()),
    ];
    let all = collect(&sources, &doc);
    assert_eq!(all.len(), 6);
    assert_eq!(all[0], Decoration::node(9, 16, CAPTION_STYLE));
    assert_eq!(all[3], Decoration::node(0, 9, CAPTION_STYLE));
}

#[test]
fn test_decorations_serialize() {
    let json = serde_json::to_string(&Decoration::inline(1, 4, HIDDEN_MARKER_STYLE)).unwrap();
    assert_eq!(
        json,
        r#"{"from":1,"to":4,"kind":"inline","style":"hidden-marker"}"#
    );
}

proptest! {
    #[test]
    fn captions_stay_in_bounds(inner in "[a-zA-Z0-9 ]{1,20}") {
        let doc = markup::parse(&format!("<p>^^^{inner}^^^</p>")).unwrap();
        let size = doc.content_size();
        for decoration in CaptionScanner::default().decorations(&doc) {
            prop_assert!(decoration.from < decoration.to);
            prop_assert!(decoration.to <= size);
            if decoration.kind == DecorationKind::Inline {
                prop_assert_eq!(decoration.to - decoration.from, 3);
            }
        }
    }

    #[test]
    fn plain_text_has_no_captions(text in "[a-z ]{0,30}") {
        let doc = markup::parse(&format!("<p>{text}</p>")).unwrap();
        prop_assert!(CaptionScanner::default().decorations(&doc).is_empty());
    }
}
