//! Markup form → Document Tree
//!
//! Tolerant loader for the editor's markup. Whatever html5ever makes of the
//! input is walked once, block by block, and the Document Tree invariants
//! are enforced on the way in:
//!
//! - items of a `taskList` list always become task items, checked only when
//!   `data-checked="true"`
//! - `th` cells count as header cells in the first row only
//! - marks only ever land on text runs; images inside paragraphs are lifted
//!   out as blocks of their own
//! - heading levels are clamped to 1..=3
//!
//! Unknown elements are dropped but their content is kept.

use super::dom::{attr, element_children, is_element, parse_body, tag_name, text_content, text_of};
use crate::doc::{
    Block, Blockquote, BulletList, CodeBlock, Document, Image, Inline, ListItem, Mark,
    OrderedList, Paragraph, Table, TableCell, TableRow, TaskItem, TaskList, Text,
};
use crate::error::FormatError;
use markup5ever_rcdom::Handle;

/// Parse markup into a Document Tree.
pub fn parse_markup(markup: &str) -> Result<Document, FormatError> {
    let body = parse_body(markup)?;
    Ok(document_from_body(&body))
}

/// Build a Document Tree from an already parsed `<body>` (or any container).
pub fn document_from_body(body: &Handle) -> Document {
    let children: Vec<Handle> = body.children.borrow().iter().cloned().collect();
    Document::new(parse_blocks(&children))
}

/// An inline piece before images are lifted out of their paragraph.
enum Piece {
    Inline(Inline),
    Image(Image),
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "table"
            | "blockquote"
            | "pre"
            | "hr"
            | "div"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "main"
            | "figure"
    )
}

fn parse_blocks(nodes: &[Handle]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Piece> = Vec::new();

    for node in nodes {
        let tag = match tag_name(node) {
            Some(tag) => tag.to_string(),
            None => {
                collect_inline(node, &[], &mut pending);
                continue;
            }
        };

        if !is_block_tag(&tag) {
            if tag != "input" && tag != "colgroup" {
                collect_inline(node, &[], &mut pending);
            }
            continue;
        }

        flush_loose(&mut pending, &mut blocks);
        match tag.as_str() {
            "p" => {
                let mut pieces = Vec::new();
                collect_children_inline(node, &[], &mut pieces);
                push_paragraphs(pieces, true, &mut blocks);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                let mut pieces = Vec::new();
                collect_children_inline(node, &[], &mut pieces);
                let (content, images) = split_images(pieces);
                blocks.push(Block::heading(level, content));
                blocks.extend(images.into_iter().map(Block::Image));
            }
            "ul" => {
                if attr(node, "data-type").as_deref() == Some("taskList") {
                    blocks.push(Block::TaskList(parse_task_list(node)));
                } else {
                    blocks.push(Block::BulletList(BulletList {
                        items: list_items(node),
                    }));
                }
            }
            "ol" => {
                let start = attr(node, "start")
                    .and_then(|s| s.trim().parse::<u32>().ok())
                    .unwrap_or(1);
                blocks.push(Block::OrderedList(OrderedList {
                    start,
                    items: list_items(node),
                }));
            }
            "li" => {
                // Stray item outside a list.
                blocks.push(Block::BulletList(BulletList {
                    items: vec![list_item(node)],
                }));
            }
            "table" => blocks.push(Block::Table(parse_table(node))),
            "blockquote" => blocks.push(Block::Blockquote(Blockquote {
                children: container_blocks(node),
            })),
            "pre" => blocks.push(Block::CodeBlock(parse_code_block(node))),
            "hr" => blocks.push(Block::HorizontalRule),
            _ => {
                let children: Vec<Handle> = node.children.borrow().iter().cloned().collect();
                blocks.extend(parse_blocks(&children));
            }
        }
    }

    flush_loose(&mut pending, &mut blocks);
    blocks
}

/// Blocks of a container node; never empty.
fn container_blocks(node: &Handle) -> Vec<Block> {
    let children: Vec<Handle> = node.children.borrow().iter().cloned().collect();
    non_empty(parse_blocks(&children))
}

fn non_empty(blocks: Vec<Block>) -> Vec<Block> {
    if blocks.is_empty() {
        vec![Block::Paragraph(Paragraph::default())]
    } else {
        blocks
    }
}

fn list_items(list: &Handle) -> Vec<ListItem> {
    let mut items = Vec::new();
    for child in list.children.borrow().iter() {
        if is_element(child, "li") {
            items.push(list_item(child));
        } else if tag_name(child).is_some() {
            items.push(ListItem {
                children: non_empty(parse_blocks(std::slice::from_ref(child))),
            });
        }
    }
    items
}

fn list_item(li: &Handle) -> ListItem {
    ListItem {
        children: container_blocks(li),
    }
}

fn parse_task_list(list: &Handle) -> TaskList {
    let mut items = Vec::new();
    for child in list.children.borrow().iter() {
        if tag_name(child).is_none() {
            continue;
        }
        let checked = attr(child, "data-checked").as_deref() == Some("true");
        let content: Vec<Handle> = child
            .children
            .borrow()
            .iter()
            .filter(|c| !is_element(c, "label") && !is_element(c, "input"))
            .cloned()
            .collect();
        items.push(TaskItem {
            checked,
            children: non_empty(parse_blocks(&content)),
        });
    }
    TaskList { items }
}

fn parse_table(table: &Handle) -> Table {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);

    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, tr)| TableRow {
            cells: element_children(tr)
                .iter()
                .filter(|c| is_element(c, "th") || is_element(c, "td"))
                .map(|cell| TableCell {
                    header: index == 0 && is_element(cell, "th"),
                    children: container_blocks(cell),
                })
                .collect(),
        })
        .collect();
    Table { rows }
}

fn collect_rows(node: &Handle, rows: &mut Vec<Handle>) {
    for child in element_children(node) {
        match tag_name(&child) {
            Some("tr") => rows.push(child.clone()),
            Some("thead") | Some("tbody") | Some("tfoot") => collect_rows(&child, rows),
            _ => {}
        }
    }
}

fn parse_code_block(pre: &Handle) -> CodeBlock {
    let code = element_children(pre)
        .into_iter()
        .find(|c| is_element(c, "code"));
    let language = code
        .as_ref()
        .and_then(|c| attr(c, "class"))
        .or_else(|| attr(pre, "class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-").map(str::to_string))
        })
        .filter(|lang| !lang.is_empty());
    let mut text = match &code {
        Some(c) => text_content(c),
        None => text_content(pre),
    };
    if text.ends_with('\n') {
        text.pop();
    }
    CodeBlock {
        language,
        code: text,
    }
}

fn collect_children_inline(node: &Handle, marks: &[Mark], out: &mut Vec<Piece>) {
    for child in node.children.borrow().iter() {
        collect_inline(child, marks, out);
    }
}

fn collect_inline(node: &Handle, marks: &[Mark], out: &mut Vec<Piece>) {
    if let Some(text) = text_of(node) {
        let text = if marks.contains(&Mark::Code) {
            text
        } else {
            collapse_whitespace(&text)
        };
        if !text.is_empty() {
            out.push(Piece::Inline(Inline::marked(text, marks.to_vec())));
        }
        return;
    }

    let tag = match tag_name(node) {
        Some(tag) => tag,
        None => return,
    };

    let added = match tag {
        "br" => {
            out.push(Piece::Inline(Inline::HardBreak));
            return;
        }
        "img" => {
            out.push(Piece::Image(image_from(node)));
            return;
        }
        "input" | "colgroup" | "script" | "style" => return,
        "strong" | "b" => vec![Mark::Bold],
        "em" | "i" => vec![Mark::Italic],
        "s" | "del" | "strike" => vec![Mark::Strike],
        "mark" => vec![Mark::Highlight],
        "code" => vec![Mark::Code],
        "a" => attr(node, "href")
            .map(|href| vec![Mark::Link { href }])
            .unwrap_or_default(),
        "span" => style_marks(attr(node, "style").as_deref().unwrap_or("")),
        _ => vec![],
    };

    let mut nested = marks.to_vec();
    nested.extend(added);
    collect_children_inline(node, &nested, out);
}

fn image_from(node: &Handle) -> Image {
    Image {
        src: attr(node, "src").unwrap_or_default(),
        alt: attr(node, "alt").filter(|a| !a.is_empty()),
        title: attr(node, "title").filter(|t| !t.is_empty()),
    }
}

/// Marks implied by an inline `style` attribute, as produced by pasted content.
pub(crate) fn style_marks(style: &str) -> Vec<Mark> {
    let mut marks = Vec::new();
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        match prop.as_str() {
            "font-weight" if matches!(value.as_str(), "bold" | "bolder" | "700" | "800" | "900") => {
                marks.push(Mark::Bold)
            }
            "font-style" if value == "italic" => marks.push(Mark::Italic),
            _ => {}
        }
    }
    marks
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() && ch != '\u{a0}' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Separate lifted images from the inline content of a paragraph-like block.
fn split_images(pieces: Vec<Piece>) -> (Vec<Inline>, Vec<Image>) {
    let mut inlines = Vec::new();
    let mut images = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Inline(inline) => inlines.push(inline),
            Piece::Image(image) => images.push(image),
        }
    }
    (normalize_inlines(inlines), images)
}

/// Emit paragraphs for `pieces`, splitting around images.
///
/// With `keep_empty`, a paragraph with no content at all still yields one
/// empty paragraph; loose inline content between blocks does not.
fn push_paragraphs(pieces: Vec<Piece>, keep_empty: bool, blocks: &mut Vec<Block>) {
    let mut run: Vec<Inline> = Vec::new();
    let mut emitted = false;
    for piece in pieces {
        match piece {
            Piece::Inline(inline) => run.push(inline),
            Piece::Image(image) => {
                let content = normalize_inlines(std::mem::take(&mut run));
                if !content.is_empty() {
                    blocks.push(Block::paragraph(content));
                }
                blocks.push(Block::Image(image));
                emitted = true;
            }
        }
    }
    let content = normalize_inlines(run);
    if !content.is_empty() || (keep_empty && !emitted) {
        blocks.push(Block::paragraph(content));
    }
}

fn flush_loose(pending: &mut Vec<Piece>, blocks: &mut Vec<Block>) {
    if !pending.is_empty() {
        push_paragraphs(std::mem::take(pending), false, blocks);
    }
}

/// Trim whitespace at the edges and around hard breaks, collapse spaces
/// across run boundaries and merge neighbouring runs with equal marks.
fn normalize_inlines(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();
    for inline in inlines {
        match inline {
            Inline::HardBreak => {
                trim_last_end(&mut out);
                out.push(Inline::HardBreak);
            }
            Inline::Text(mut run) => {
                let code = run.marks.contains(&Mark::Code);
                let at_line_start = matches!(out.last(), None | Some(Inline::HardBreak));
                let after_space = match out.last() {
                    Some(Inline::Text(prev)) => prev.text.ends_with(' '),
                    _ => false,
                };
                if !code && (at_line_start || after_space) {
                    run.text = run.text.trim_start_matches(' ').to_string();
                }
                if run.text.is_empty() {
                    continue;
                }
                match out.last_mut() {
                    Some(Inline::Text(prev)) if prev.marks == run.marks => {
                        prev.text.push_str(&run.text)
                    }
                    _ => out.push(Inline::Text(run)),
                }
            }
        }
    }
    trim_last_end(&mut out);
    out
}

fn trim_last_end(out: &mut Vec<Inline>) {
    if let Some(Inline::Text(Text { text, marks })) = out.last_mut() {
        if !marks.contains(&Mark::Code) {
            let trimmed = text.trim_end_matches(' ').len();
            text.truncate(trimmed);
        }
        if text.is_empty() {
            out.pop();
        }
    }
}
