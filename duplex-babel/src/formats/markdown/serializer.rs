//! Markdown serialization (markup form → Markdown)
//!
//! Pipeline: markup → generic HTML tree → table repair → comrak AST →
//! `format_commonmark` → tag safety net → quote normalization.
//!
//! The walk works on the generic tree rather than the Document Tree so that
//! pasted content the editor keeps verbatim (style spans, `b`/`i` tags, kept
//! raw tags) is still converted. Syntax comrak has no node for goes into the
//! AST as raw inline nodes: `==` around highlights, `_`/`__` delimiters where
//! the neighbouring text allows them, and backslash escapes for text the
//! import pre-pass would otherwise pick up.

use super::normalize::{normalize_quotes, tag_safety_net};
use crate::common::table_repair::{has_header_row, repair_tables};
use crate::doc::{Document, Mark};
use crate::error::FormatError;
use crate::formats::html::dom::{
    attr, element_children, is_element, parse_body, serialize_node, tag_name, text_content,
    text_of,
};
use crate::formats::html::parser::style_marks;
use crate::formats::html::serialize_markup;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeTable, NodeValue, TableAlignment,
};
use comrak::{format_commonmark, Arena, ComrakOptions, ListStyleType};
use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Output conventions for the Markdown serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Marker for bullet list items (`-`, `*` or `+`)
    pub bullet_marker: char,
    /// Delimiter for italic text (`_` or `*`)
    pub emphasis_delimiter: String,
    /// Delimiter for bold text (`**` or `__`)
    pub strong_delimiter: String,
    /// Straighten curly quotes in the output
    pub normalize_quotes: bool,
    /// Inline elements emitted as raw HTML
    pub keep_tags: Vec<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            bullet_marker: '-',
            emphasis_delimiter: "_".to_string(),
            strong_delimiter: "**".to_string(),
            normalize_quotes: true,
            keep_tags: vec!["u".to_string(), "sup".to_string(), "sub".to_string()],
        }
    }
}

/// Serialize markup to Markdown.
pub fn serialize_markup_to_markdown(
    markup: &str,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    let body = parse_body(markup)?;
    repair_tables(&body);

    let arena = Arena::new();
    let writer = AstWriter {
        arena: &arena,
        options,
    };
    let root = writer.node(NodeValue::Document);
    writer.blocks(&body, root)?;
    writer.lower_delimiters(root);
    writer.escape_markers(root);

    let mut output = Vec::new();
    format_commonmark(root, &comrak_options(options), &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {e}"))
    })?;
    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))?;

    let markdown = tag_safety_net(
        &markdown,
        &options.strong_delimiter,
        &options.emphasis_delimiter,
    );
    let markdown = if options.normalize_quotes {
        normalize_quotes(&markdown)
    } else {
        markdown
    };
    Ok(markdown.trim_end_matches('\n').to_string())
}

/// Serialize a Document Tree to Markdown through its markup form.
pub fn serialize_document(doc: &Document, options: &MarkdownOptions) -> Result<String, FormatError> {
    serialize_markup_to_markdown(&serialize_markup(doc)?, options)
}

/// Fail-soft conversion used on mode switches: on any failure the markup is
/// returned unconverted and the failure is logged.
pub fn markup_to_markdown(markup: &str, options: &MarkdownOptions) -> String {
    match serialize_markup_to_markdown(markup, options) {
        Ok(markdown) => markdown,
        Err(err) => {
            log::warn!("markdown serialization failed, keeping markup: {err}");
            markup.to_string()
        }
    }
}

fn comrak_options(options: &MarkdownOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = true;
    comrak.extension.strikethrough = true;
    comrak.extension.tasklist = true;
    comrak.extension.autolink = true;
    // Highlight markers, kept tags and headerless tables are raw HTML.
    comrak.render.unsafe_ = true;
    comrak.render.prefer_fenced = true;
    comrak.render.list_style = match options.bullet_marker {
        '*' => ListStyleType::Star,
        '+' => ListStyleType::Plus,
        _ => ListStyleType::Dash,
    };
    comrak
}

/// Where inline content lands; decides how a `<br>` is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Paragraph,
    Heading,
    Cell,
}

/// How a marked span is delimited in the output.
enum Wrapper {
    Node(NodeValue),
    Raw(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered(usize),
    Task,
}

impl ListKind {
    fn of(list: &Handle) -> Self {
        if is_element(list, "ol") {
            let start = attr(list, "start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1);
            ListKind::Ordered(start)
        } else if attr(list, "data-type").as_deref() == Some("taskList") {
            ListKind::Task
        } else {
            ListKind::Bullet
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// Builds a comrak AST from the repaired HTML tree.
struct AstWriter<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    options: &'o MarkdownOptions,
}

impl<'a> AstWriter<'a, '_> {
    fn node(&self, value: NodeValue) -> &'a AstNode<'a> {
        self.arena
            .alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
    }

    fn text(&self, text: &str) -> &'a AstNode<'a> {
        self.node(NodeValue::Text(text.to_string()))
    }

    fn raw(&self, html: &str) -> &'a AstNode<'a> {
        self.node(NodeValue::HtmlInline(html.to_string()))
    }

    /// Convert the children of `dom` into blocks under `parent`. Inline
    /// content between blocks is gathered into paragraphs.
    fn blocks(&self, dom: &Handle, parent: &'a AstNode<'a>) -> Result<(), FormatError> {
        let mut loose: Option<&'a AstNode<'a>> = None;

        for child in dom.children.borrow().iter() {
            let tag = tag_name(child).unwrap_or("");
            if is_block(tag) {
                if let Some(paragraph) = loose.take() {
                    finish_inlines(paragraph);
                }
                self.block(child, parent)?;
            } else if tag != "input" {
                let paragraph = match loose {
                    Some(paragraph) => paragraph,
                    None => {
                        let paragraph = self.node(NodeValue::Paragraph);
                        parent.append(paragraph);
                        loose = Some(paragraph);
                        paragraph
                    }
                };
                self.inline(child, paragraph, Flow::Paragraph)?;
            }
        }

        if let Some(paragraph) = loose {
            finish_inlines(paragraph);
        }
        Ok(())
    }

    fn block(&self, dom: &Handle, parent: &'a AstNode<'a>) -> Result<(), FormatError> {
        let tag = tag_name(dom).unwrap_or("");
        match tag {
            "p" => {
                let paragraph = self.node(NodeValue::Paragraph);
                parent.append(paragraph);
                self.inline_children(dom, paragraph, Flow::Paragraph)?;
                finish_inlines(paragraph);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse().unwrap_or(1);
                let heading = self.node(NodeValue::Heading(NodeHeading {
                    level,
                    setext: false,
                }));
                parent.append(heading);
                self.inline_children(dom, heading, Flow::Heading)?;
                finish_inlines(heading);
            }
            "blockquote" => {
                let quote = self.node(NodeValue::BlockQuote);
                parent.append(quote);
                self.blocks(dom, quote)?;
                if quote.first_child().is_none() {
                    quote.detach();
                }
            }
            "pre" => parent.append(self.code_block(dom)),
            "hr" => parent.append(self.node(NodeValue::ThematicBreak)),
            "table" => self.table(dom, parent)?,
            "ul" | "ol" => self.list(&element_children(dom), parent, ListKind::of(dom))?,
            "li" => self.list(&[dom.clone()], parent, ListKind::Bullet)?,
            _ => self.blocks(dom, parent)?,
        }
        Ok(())
    }

    fn list(
        &self,
        items: &[Handle],
        parent: &'a AstNode<'a>,
        kind: ListKind,
    ) -> Result<(), FormatError> {
        let (list_type, start, padding) = match kind {
            ListKind::Ordered(start) => (ListType::Ordered, start, 3),
            _ => (ListType::Bullet, 1, 2),
        };
        let shape = NodeList {
            list_type,
            marker_offset: 0,
            padding,
            start,
            delimiter: ListDelimType::Period,
            bullet_char: self.options.bullet_marker as u8,
            tight: true,
        };

        let list = self.node(NodeValue::List(shape));
        for item in items.iter().filter(|item| is_element(item, "li")) {
            let value = match kind {
                ListKind::Task => {
                    let checked = attr(item, "data-checked").as_deref() == Some("true");
                    NodeValue::TaskItem(checked.then_some('x'))
                }
                _ => NodeValue::Item(shape),
            };
            let node = self.node(value);
            list.append(node);
            self.blocks(item, node)?;
        }

        if list.first_child().is_none() {
            return Ok(());
        }
        if !list.children().all(is_tight_item) {
            if let NodeValue::List(ref mut shape) = list.data.borrow_mut().value {
                shape.tight = false;
            }
        }
        parent.append(list);
        Ok(())
    }

    fn code_block(&self, pre: &Handle) -> &'a AstNode<'a> {
        let code = element_children(pre)
            .into_iter()
            .find(|c| is_element(c, "code"));
        let info = code
            .as_ref()
            .and_then(|c| attr(c, "class"))
            .and_then(|class| {
                class
                    .split_whitespace()
                    .find_map(|c| c.strip_prefix("language-").map(str::to_string))
            })
            .unwrap_or_default();
        let mut literal = match &code {
            Some(c) => text_content(c),
            None => text_content(pre),
        };
        if !literal.is_empty() && !literal.ends_with('\n') {
            literal.push('\n');
        }
        self.node(NodeValue::CodeBlock(NodeCodeBlock {
            fenced: true,
            fence_char: b'`',
            fence_length: 3,
            fence_offset: 0,
            info,
            literal,
        }))
    }

    fn table(&self, dom: &Handle, parent: &'a AstNode<'a>) -> Result<(), FormatError> {
        if !has_header_row(dom) {
            log::debug!("table without a header row is kept as raw HTML");
            let literal = serialize_node(dom)?.replace('\n', " ");
            parent.append(self.node(NodeValue::HtmlBlock(NodeHtmlBlock {
                block_type: 6,
                literal,
            })));
            return Ok(());
        }

        let rows = table_rows(dom);
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let table = self.node(NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; columns],
            num_columns: columns,
            num_rows: rows.len(),
            num_nonempty_cells: 0,
        }));

        for (index, cells) in rows.iter().enumerate() {
            let row = self.node(NodeValue::TableRow(index == 0));
            table.append(row);
            for column in 0..columns {
                let cell = self.node(NodeValue::TableCell);
                row.append(cell);
                if let Some(source) = cells.get(column) {
                    self.inline_children(source, cell, Flow::Cell)?;
                    trim_inlines(cell);
                }
            }
        }

        parent.append(table);
        Ok(())
    }

    fn inline_children(
        &self,
        dom: &Handle,
        parent: &'a AstNode<'a>,
        flow: Flow,
    ) -> Result<(), FormatError> {
        for child in dom.children.borrow().iter() {
            self.inline(child, parent, flow)?;
        }
        Ok(())
    }

    fn inline(&self, dom: &Handle, parent: &'a AstNode<'a>, flow: Flow) -> Result<(), FormatError> {
        if let Some(text) = text_of(dom) {
            let text = collapse_whitespace(&text);
            if !text.is_empty() {
                parent.append(self.text(&text));
            }
            return Ok(());
        }
        let Some(tag) = tag_name(dom) else {
            return Ok(());
        };

        if self.options.keep_tags.iter().any(|k| k == tag) {
            parent.append(self.raw(&format!("<{tag}>")));
            self.inline_children(dom, parent, flow)?;
            parent.append(self.raw(&format!("</{tag}>")));
            return Ok(());
        }

        let children = |inner: &'a AstNode<'a>| self.inline_children(dom, inner, flow);
        match tag {
            "br" => parent.append(match flow {
                Flow::Paragraph => self.node(NodeValue::LineBreak),
                Flow::Heading => self.text(" "),
                Flow::Cell => self.raw("<br>"),
            }),
            "strong" | "b" => self.wrap(parent, Wrapper::Node(NodeValue::Strong), children)?,
            "em" | "i" => self.wrap(parent, Wrapper::Node(NodeValue::Emph), children)?,
            "s" | "del" | "strike" => {
                self.wrap(parent, Wrapper::Node(NodeValue::Strikethrough), children)?
            }
            "mark" => self.wrap(parent, Wrapper::Raw("=="), children)?,
            "code" => {
                let literal = text_content(dom).replace('\n', " ");
                if !literal.is_empty() {
                    parent.append(self.node(NodeValue::Code(NodeCode {
                        num_backticks: 1,
                        literal,
                    })));
                }
            }
            "a" => match attr(dom, "href") {
                Some(url) => {
                    let title = attr(dom, "title").unwrap_or_default();
                    let link = NodeValue::Link(NodeLink { url, title });
                    self.wrap(parent, Wrapper::Node(link), children)?
                }
                None => children(parent)?,
            },
            "img" => parent.append(self.image(dom)),
            "span" => {
                let marks = style_marks(attr(dom, "style").as_deref().unwrap_or(""));
                let italic = marks.contains(&Mark::Italic);
                let content = |inner: &'a AstNode<'a>| {
                    if italic {
                        self.wrap(inner, Wrapper::Node(NodeValue::Emph), children)
                    } else {
                        children(inner)
                    }
                };
                if marks.contains(&Mark::Bold) {
                    self.wrap(parent, Wrapper::Node(NodeValue::Strong), content)?
                } else {
                    content(parent)?
                }
            }
            "input" => {}
            _ => children(parent)?,
        }
        Ok(())
    }

    /// Build a marked span under `parent`. Spaces at the edges of the span
    /// move outside the delimiters; a blank span is written unmarked.
    fn wrap<F>(&self, parent: &'a AstNode<'a>, wrapper: Wrapper, content: F) -> Result<(), FormatError>
    where
        F: FnOnce(&'a AstNode<'a>) -> Result<(), FormatError>,
    {
        let (holder, raw) = match wrapper {
            Wrapper::Node(value) => (self.node(value), None),
            // Scratch container, emptied below.
            Wrapper::Raw(delimiter) => (self.node(NodeValue::Paragraph), Some(delimiter)),
        };
        content(holder)?;

        if is_blank(holder) {
            move_children(holder, parent);
            return Ok(());
        }

        let lead = take_space(holder, Edge::Start);
        let trail = take_space(holder, Edge::End);
        if lead {
            parent.append(self.text(" "));
        }
        match raw {
            None => parent.append(holder),
            Some(delimiter) => {
                parent.append(self.raw(delimiter));
                move_children(holder, parent);
                parent.append(self.raw(delimiter));
            }
        }
        if trail {
            parent.append(self.text(" "));
        }
        Ok(())
    }

    fn image(&self, dom: &Handle) -> &'a AstNode<'a> {
        let url = attr(dom, "src").unwrap_or_default();
        let title = attr(dom, "title").unwrap_or_default();
        let image = self.node(NodeValue::Image(NodeLink { url, title }));
        if let Some(alt) = attr(dom, "alt").filter(|alt| !alt.is_empty()) {
            image.append(self.text(&alt));
        }
        image
    }

    /// Write emphasis and strong emphasis with `_`/`__` where configured and
    /// the neighbouring text cannot glue onto the delimiter. Everything else
    /// keeps comrak's `*`/`**`.
    fn lower_delimiters(&self, root: &'a AstNode<'a>) {
        let emphasis = self.options.emphasis_delimiter == "_";
        let strong = self.options.strong_delimiter == "__";
        let spans: Vec<&'a AstNode<'a>> = root
            .descendants()
            .filter(|node| match node.data.borrow().value {
                NodeValue::Emph => emphasis,
                NodeValue::Strong => strong,
                _ => false,
            })
            .collect();

        for span in spans {
            if !flanks_cleanly(span) {
                continue;
            }
            let delimiter = match span.data.borrow().value {
                NodeValue::Emph => "_",
                _ => "__",
            };
            span.insert_before(self.raw(delimiter));
            while let Some(child) = span.first_child() {
                span.insert_before(child);
            }
            span.insert_before(self.raw(delimiter));
            span.detach();
        }
    }

    /// Escape the `=` runs the highlight pre-pass would read back as a
    /// highlight, `~` the strikethrough extension would read as a strike,
    /// and `&#` entity openings. comrak leaves all three alone.
    fn escape_markers(&self, root: &'a AstNode<'a>) {
        let texts: Vec<&'a AstNode<'a>> = root
            .descendants()
            .filter(|node| matches!(node.data.borrow().value, NodeValue::Text(_)))
            .collect();

        for node in texts {
            let pieces = match &node.data.borrow().value {
                NodeValue::Text(text) => escape_pieces(text),
                _ => continue,
            };
            if pieces.iter().all(|(escaped, _)| !escaped) {
                continue;
            }
            for (escaped, piece) in pieces {
                let replacement = if escaped {
                    self.raw(&piece)
                } else {
                    self.text(&piece)
                };
                node.insert_before(replacement);
            }
            node.detach();
        }
    }
}

fn is_block(tag: &str) -> bool {
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

/// A tight item holds one paragraph; a later paragraph, rule, table or an
/// ordered list not starting at 1 would run into the text before it without
/// a blank line.
fn is_tight_item<'a>(item: &'a AstNode<'a>) -> bool {
    item.children().skip(1).all(|child| match child.data.borrow().value {
        NodeValue::Paragraph | NodeValue::ThematicBreak | NodeValue::Table(_) => false,
        NodeValue::List(shape) => shape.list_type == ListType::Bullet || shape.start == 1,
        _ => true,
    })
}

/// Header and body rows of a repaired table, cells in order.
fn table_rows(table: &Handle) -> Vec<Vec<Handle>> {
    let mut rows = Vec::new();
    for section in element_children(table) {
        let trs = if is_element(&section, "tr") {
            vec![section.clone()]
        } else {
            element_children(&section)
        };
        for tr in trs.iter().filter(|r| is_element(r, "tr")) {
            let cells: Vec<Handle> = element_children(tr)
                .into_iter()
                .filter(|c| is_element(c, "th") || is_element(c, "td"))
                .collect();
            rows.push(cells);
        }
    }
    rows
}

/// Trim a paragraph or heading and drop it when nothing is left.
fn finish_inlines<'a>(container: &'a AstNode<'a>) {
    if !trim_inlines(container) {
        container.detach();
    }
}

/// Trim spaces at the edges of `container` and around its hard breaks, and
/// drop hard breaks at the edges. Returns whether any content is left.
fn trim_inlines<'a>(container: &'a AstNode<'a>) -> bool {
    for edge in [Edge::Start, Edge::End] {
        loop {
            take_space(container, edge);
            match edge_child(container, edge) {
                Some(child) if is_line_break(child) => child.detach(),
                _ => break,
            }
        }
    }

    let breaks: Vec<&'a AstNode<'a>> = container.children().filter(|c| is_line_break(c)).collect();
    for line_break in breaks {
        if let Some(before) = line_break.previous_sibling() {
            strip_text(before, Edge::End);
        }
        if let Some(after) = line_break.next_sibling() {
            strip_text(after, Edge::Start);
        }
    }

    container.first_child().is_some()
}

fn edge_child<'a>(container: &'a AstNode<'a>, edge: Edge) -> Option<&'a AstNode<'a>> {
    match edge {
        Edge::Start => container.first_child(),
        Edge::End => container.last_child(),
    }
}

fn is_line_break(node: &AstNode<'_>) -> bool {
    matches!(node.data.borrow().value, NodeValue::LineBreak)
}

/// Strip spaces from the text children at one edge of `container`.
fn take_space<'a>(container: &'a AstNode<'a>, edge: Edge) -> bool {
    let mut taken = false;
    while let Some(child) = edge_child(container, edge) {
        if !strip_text(child, edge) {
            break;
        }
        taken = true;
        if child.parent().is_some() {
            break;
        }
    }
    taken
}

/// Strip spaces from one end of a text node, detaching it once empty.
/// Returns whether anything was stripped.
fn strip_text<'a>(node: &'a AstNode<'a>, edge: Edge) -> bool {
    let emptied = {
        let mut data = node.data.borrow_mut();
        let NodeValue::Text(ref mut text) = data.value else {
            return false;
        };
        let stripped = match edge {
            Edge::Start => text.trim_start_matches(' '),
            Edge::End => text.trim_end_matches(' '),
        };
        if stripped.len() == text.len() {
            return false;
        }
        *text = stripped.to_string();
        text.is_empty()
    };
    if emptied {
        node.detach();
    }
    true
}

/// Whether a span has nothing but spaces and breaks below it.
fn is_blank<'a>(node: &'a AstNode<'a>) -> bool {
    node.descendants().skip(1).all(|n| match &n.data.borrow().value {
        NodeValue::Text(text) => text.trim_matches(' ').is_empty(),
        NodeValue::LineBreak
        | NodeValue::Strong
        | NodeValue::Emph
        | NodeValue::Strikethrough
        | NodeValue::Link(_) => true,
        _ => false,
    })
}

fn move_children<'a>(from: &'a AstNode<'a>, to: &'a AstNode<'a>) {
    while let Some(child) = from.first_child() {
        to.append(child);
    }
}

/// `_` delimiters only work where no letter, digit or underscore touches
/// them from outside.
fn flanks_cleanly<'a>(node: &'a AstNode<'a>) -> bool {
    let before = node
        .previous_sibling()
        .map(|n| boundary_char(n, Edge::End));
    let after = node.next_sibling().map(|n| boundary_char(n, Edge::Start));
    [before, after].into_iter().all(|side| match side {
        None => true,
        Some(Some(c)) => !c.is_alphanumeric() && c != '_',
        Some(None) => false,
    })
}

fn boundary_char<'a>(node: &'a AstNode<'a>, edge: Edge) -> Option<char> {
    match &node.data.borrow().value {
        NodeValue::Text(text) => match edge {
            Edge::Start => text.chars().next(),
            Edge::End => text.chars().last(),
        },
        NodeValue::LineBreak | NodeValue::SoftBreak => Some(' '),
        _ => None,
    }
}

/// Split `text` into plain runs and backslash-escaped runs.
fn escape_pieces(text: &str) -> Vec<(bool, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces: Vec<(bool, String)> = Vec::new();

    for (i, &c) in chars.iter().enumerate() {
        let escape = match c {
            '~' => true,
            '=' => {
                i == 0 || i + 1 == chars.len() || chars[i - 1] == '=' || chars[i + 1] == '='
            }
            '&' => chars.get(i + 1) == Some(&'#'),
            _ => false,
        };
        let piece = if escape {
            format!("\\{c}")
        } else {
            c.to_string()
        };
        match pieces.last_mut() {
            Some((escaped, run)) if *escaped == escape => run.push_str(&piece),
            _ => pieces.push((escape, piece)),
        }
    }
    pieces
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
