//! Table repair pass
//!
//! The editor writes tables with a `colgroup`, keeps the header row inside
//! `tbody` and lets cells hold several paragraphs. GFM tables need none of
//! the first, an explicit header row, and single-line cells, so before
//! conversion every table is repaired in place:
//!
//! 1. `colgroup` / `col` nodes are dropped
//! 2. a first body row holding `th` cells moves into a new `thead`
//! 3. paragraphs inside cells become spans joined by `<br>`
//!
//! A table whose first row has no header cell is left without a header; the
//! serializer emits it as raw HTML instead of inventing one.

use crate::formats::html::dom::{append, create_element, element_children, is_element, tag_name};
use markup5ever_rcdom::Handle;

/// Repair every table below `root`.
pub fn repair_tables(root: &Handle) {
    for child in element_children(root) {
        if is_element(&child, "table") {
            repair_table(&child);
        } else {
            repair_tables(&child);
        }
    }
}

/// Whether the table has an explicit header section with a row in it.
pub fn has_header_row(table: &Handle) -> bool {
    element_children(table)
        .iter()
        .filter(|c| is_element(c, "thead"))
        .any(|thead| element_children(thead).iter().any(|r| is_element(r, "tr")))
}

fn repair_table(table: &Handle) {
    table
        .children
        .borrow_mut()
        .retain(|c| !is_element(c, "colgroup") && !is_element(c, "col"));

    if !has_header_row(table) {
        promote_header_row(table);
    }

    for section in element_children(table) {
        let rows = if is_element(&section, "tr") {
            vec![section.clone()]
        } else {
            element_children(&section)
        };
        for row in rows.iter().filter(|r| is_element(r, "tr")) {
            for cell in element_children(row) {
                if is_element(&cell, "th") || is_element(&cell, "td") {
                    flatten_cell(&cell);
                    // Nested tables are repaired with their own cells.
                    repair_tables(&cell);
                }
            }
        }
    }
}

/// Move a header-cell first row out of the body into a new `thead`.
fn promote_header_row(table: &Handle) {
    let body = element_children(table)
        .into_iter()
        .find(|c| is_element(c, "tbody"));
    let container = body.clone().unwrap_or_else(|| table.clone());

    let first_row = element_children(&container)
        .into_iter()
        .find(|c| is_element(c, "tr"));
    let Some(row) = first_row else {
        return;
    };
    if !element_children(&row).iter().any(|c| is_element(c, "th")) {
        log::debug!("table has no header cells in its first row; leaving it unrepaired");
        return;
    }

    container
        .children
        .borrow_mut()
        .retain(|c| !std::rc::Rc::ptr_eq(c, &row));

    let thead = create_element("thead", vec![]);
    append(&thead, row);

    let mut children = table.children.borrow_mut();
    let index = match &body {
        Some(body) => children
            .iter()
            .position(|c| std::rc::Rc::ptr_eq(c, body))
            .unwrap_or(0),
        None => children
            .iter()
            .position(|c| is_element(c, "tr"))
            .unwrap_or(children.len()),
    };
    thead.parent.set(Some(std::rc::Rc::downgrade(table)));
    children.insert(index, thead);
}

/// Replace paragraph children of a cell by spans separated by `<br>`.
fn flatten_cell(cell: &Handle) {
    let has_paragraphs = cell.children.borrow().iter().any(|c| is_element(c, "p"));
    if !has_paragraphs {
        return;
    }

    let old: Vec<Handle> = cell.children.borrow_mut().drain(..).collect();
    let paragraph_count = old.iter().filter(|c| is_element(c, "p")).count();
    let mut seen = 0;

    for child in old {
        if tag_name(&child) == Some("p") {
            seen += 1;
            let span = create_element("span", vec![]);
            let inner: Vec<Handle> = child.children.borrow_mut().drain(..).collect();
            for grandchild in inner {
                append(&span, grandchild);
            }
            append(cell, span);
            if seen < paragraph_count {
                append(cell, create_element("br", vec![]));
            }
        } else {
            append(cell, child);
        }
    }
}
