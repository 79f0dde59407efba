//! Document Tree → markup form
//!
//! Builds an rcdom tree in the editor's own conventions and serializes it:
//! task lists carry `data-type`/`data-checked` with a checkbox label and a
//! content `div`, tables carry a `colgroup` and keep their header row inside
//! `tbody`, and text runs that share marks share the mark elements.

use super::dom::{append, create_element, create_text, serialize_node};
use crate::doc::{Block, Document, Inline, Mark, Table, TaskList};
use crate::error::FormatError;
use markup5ever_rcdom::Handle;

/// Serialize a Document Tree to the markup form.
pub fn serialize_markup(doc: &Document) -> Result<String, FormatError> {
    let mut output = String::new();
    for block in &doc.children {
        output.push_str(&serialize_node(&block_node(block))?);
    }
    Ok(output)
}

fn block_node(block: &Block) -> Handle {
    match block {
        Block::Paragraph(p) => inline_container("p", &p.content),
        Block::Heading(h) => inline_container(&format!("h{}", h.level.clamp(1, 3)), &h.content),
        Block::BulletList(list) => {
            let ul = create_element("ul", vec![]);
            for item in &list.items {
                append(&ul, block_container("li", vec![], &item.children));
            }
            ul
        }
        Block::OrderedList(list) => {
            let start = list.start.to_string();
            let attrs = if list.start == 1 {
                vec![]
            } else {
                vec![("start", start.as_str())]
            };
            let ol = create_element("ol", attrs);
            for item in &list.items {
                append(&ol, block_container("li", vec![], &item.children));
            }
            ol
        }
        Block::TaskList(list) => task_list_node(list),
        Block::Table(table) => table_node(table),
        Block::Blockquote(q) => block_container("blockquote", vec![], &q.children),
        Block::CodeBlock(code) => {
            let pre = create_element("pre", vec![]);
            let class = code.language.as_ref().map(|l| format!("language-{l}"));
            let attrs = match &class {
                Some(class) => vec![("class", class.as_str())],
                None => vec![],
            };
            let code_el = create_element("code", attrs);
            append(&code_el, create_text(&code.code));
            append(&pre, code_el);
            pre
        }
        Block::HorizontalRule => create_element("hr", vec![]),
        Block::Image(image) => {
            let mut attrs = vec![("src", image.src.as_str())];
            if let Some(alt) = &image.alt {
                attrs.push(("alt", alt.as_str()));
            }
            if let Some(title) = &image.title {
                attrs.push(("title", title.as_str()));
            }
            create_element("img", attrs)
        }
    }
}

fn block_container(tag: &str, attrs: Vec<(&str, &str)>, children: &[Block]) -> Handle {
    let node = create_element(tag, attrs);
    for child in children {
        append(&node, block_node(child));
    }
    node
}

fn task_list_node(list: &TaskList) -> Handle {
    let ul = create_element("ul", vec![("data-type", "taskList")]);
    for item in &list.items {
        let checked = if item.checked { "true" } else { "false" };
        let li = create_element(
            "li",
            vec![("data-type", "taskItem"), ("data-checked", checked)],
        );
        let label = create_element("label", vec![]);
        let input_attrs = if item.checked {
            vec![("type", "checkbox"), ("checked", "checked")]
        } else {
            vec![("type", "checkbox")]
        };
        append(&label, create_element("input", input_attrs));
        append(&label, create_element("span", vec![]));
        append(&li, label);
        append(&li, block_container("div", vec![], &item.children));
        append(&ul, li);
    }
    ul
}

fn table_node(table: &Table) -> Handle {
    let node = create_element("table", vec![]);
    let columns = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let colgroup = create_element("colgroup", vec![]);
    for _ in 0..columns {
        append(&colgroup, create_element("col", vec![]));
    }
    append(&node, colgroup);

    let tbody = create_element("tbody", vec![]);
    for row in &table.rows {
        let tr = create_element("tr", vec![]);
        for cell in &row.cells {
            let tag = if cell.header { "th" } else { "td" };
            append(
                &tr,
                block_container(tag, vec![("colspan", "1"), ("rowspan", "1")], &cell.children),
            );
        }
        append(&tbody, tr);
    }
    append(&node, tbody);
    node
}

fn mark_element(mark: &Mark) -> Handle {
    match mark {
        Mark::Link { href } => create_element("a", vec![("href", href.as_str())]),
        Mark::Bold => create_element("strong", vec![]),
        Mark::Italic => create_element("em", vec![]),
        Mark::Strike => create_element("s", vec![]),
        Mark::Highlight => create_element("mark", vec![]),
        Mark::Code => create_element("code", vec![]),
    }
}

/// An element holding inline content. Mark elements stay open across runs
/// for as long as the runs share a prefix of their (sorted) marks.
fn inline_container(tag: &str, content: &[Inline]) -> Handle {
    let node = create_element(tag, vec![]);
    let mut open: Vec<(Mark, Handle)> = Vec::new();

    for inline in content {
        let marks: &[Mark] = match inline {
            Inline::Text(run) => &run.marks,
            Inline::HardBreak => &[],
        };
        let shared = open
            .iter()
            .zip(marks.iter())
            .take_while(|((open_mark, _), mark)| open_mark == *mark)
            .count();
        let shared = if matches!(inline, Inline::HardBreak) {
            open.len()
        } else {
            shared
        };
        open.truncate(shared);

        if matches!(inline, Inline::Text(_)) {
            for mark in &marks[shared..] {
                let element = mark_element(mark);
                let parent = open.last().map(|(_, h)| h.clone()).unwrap_or(node.clone());
                append(&parent, element.clone());
                open.push((mark.clone(), element));
            }
        }

        let parent = open.last().map(|(_, h)| h.clone()).unwrap_or(node.clone());
        match inline {
            Inline::Text(run) => append(&parent, create_text(&run.text)),
            Inline::HardBreak => append(&parent, create_element("br", vec![])),
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{CodeBlock, TableCell, TableRow, TaskItem};

    fn one(block: Block) -> String {
        serialize_markup(&Document::new(vec![block])).unwrap()
    }

    #[test]
    fn test_shared_marks_stay_open() {
        let markup = one(Block::paragraph(vec![
            Inline::marked("a", vec![Mark::Bold]),
            Inline::marked("b", vec![Mark::Bold, Mark::Italic]),
            Inline::text("c"),
        ]));
        assert_eq!(markup, "<p><strong>a<em>b</em></strong>c</p>");
    }

    #[test]
    fn test_hard_break_inside_mark() {
        let markup = one(Block::paragraph(vec![
            Inline::marked("a", vec![Mark::Bold]),
            Inline::HardBreak,
            Inline::marked("b", vec![Mark::Bold]),
        ]));
        assert_eq!(markup, "<p><strong>a<br>b</strong></p>");
    }

    #[test]
    fn test_task_list_markup() {
        let markup = one(Block::TaskList(TaskList {
            items: vec![TaskItem {
                checked: true,
                children: vec![Block::paragraph(vec![Inline::text("Done")])],
            }],
        }));
        assert_eq!(
            markup,
            r#"<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><label><input type="checkbox" checked="checked"><span></span></label><div><p>Done</p></div></li></ul>"#
        );
    }

    #[test]
    fn test_table_keeps_header_row_in_body() {
        let cell = |header: bool, text: &str| TableCell {
            header,
            children: vec![Block::paragraph(vec![Inline::text(text)])],
        };
        let markup = one(Block::Table(Table {
            rows: vec![
                TableRow {
                    cells: vec![cell(true, "h")],
                },
                TableRow {
                    cells: vec![cell(false, "d")],
                },
            ],
        }));
        assert_eq!(
            markup,
            r#"<table><colgroup><col></colgroup><tbody><tr><th colspan="1" rowspan="1"><p>h</p></th></tr><tr><td colspan="1" rowspan="1"><p>d</p></td></tr></tbody></table>"#
        );
    }

    #[test]
    fn test_code_block_markup() {
        let markup = one(Block::CodeBlock(CodeBlock {
            language: Some("rust".into()),
            code: "a < b".into(),
        }));
        assert_eq!(
            markup,
            r#"<pre><code class="language-rust">a &lt; b</code></pre>"#
        );
    }
}
