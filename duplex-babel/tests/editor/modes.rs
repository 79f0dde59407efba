//! Mode switching against the in-memory engine.

use duplex_babel::decorations::CaptionScanner;
use duplex_babel::editor::EditorHost;
use duplex_babel::{MarkdownOptions, MarkdownParser, MemoryEditor, Mode, ModeController};
use std::cell::RefCell;
use std::rc::Rc;

type Seen = Rc<RefCell<Vec<String>>>;

fn controller(markup: &str) -> (ModeController<MemoryEditor>, Seen) {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let editor = MemoryEditor::from_markup(markup)
        .unwrap()
        .with_source(CaptionScanner::default());
    let ctl = ModeController::new(editor)
        .with_listener(move |markup: &str| sink.borrow_mut().push(markup.to_string()));
    (ctl, seen)
}

#[test]
fn test_task_list_survives_two_toggles() {
    let markup = r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><label><input type="checkbox" checked="checked"><span></span></label><div><p>Done</p></div></li></ul>"#;
    let (mut ctl, seen) = controller(markup);
    ctl.toggle().unwrap();
    assert_eq!(ctl.markdown(), Some("- [x] Done"));
    ctl.toggle().unwrap();
    assert_eq!(ctl.host().markup().unwrap(), markup);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_caption_decorations_after_switch_back() {
    let (mut ctl, _) = controller("<p>x</p>");
    assert!(ctl.host().decorations().is_empty());
    ctl.toggle().unwrap();
    ctl.edit_markdown("^^^Figure 1^^^").unwrap();
    assert!(ctl.host().decorations().is_empty());
    ctl.toggle().unwrap();
    assert_eq!(ctl.host().decorations().len(), 3);
}

#[test]
fn test_configured_serializer_is_used() {
    let options = MarkdownOptions {
        bullet_marker: '*',
        ..MarkdownOptions::default()
    };
    let editor = MemoryEditor::from_markup("<ul><li><p>a</p></li></ul>").unwrap();
    let mut ctl = ModeController::new(editor)
        .with_options(options)
        .with_parser(MarkdownParser::new());
    assert_eq!(ctl.toggle().unwrap(), Mode::Markdown);
    assert_eq!(ctl.markdown(), Some("* a"));
}

#[test]
fn test_edits_in_rich_mode_reach_listener() {
    let (mut ctl, seen) = controller("<p>x</p>");
    ctl.host_mut().edit(|doc| {
        doc.children
            .push(duplex_babel::doc::Block::HorizontalRule)
    });
    ctl.document_changed().unwrap();
    assert_eq!(seen.borrow().last().map(String::as_str), Some("<p>x</p><hr>"));
}
