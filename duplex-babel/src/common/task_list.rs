//! Task-list normalization
//!
//! Generic Markdown output knows nothing about the editor's task lists. This
//! pass relabels list items in place so the markup loader sees
//! `<ul data-type="taskList">` / `<li data-type="taskItem" data-checked>`.
//!
//! Two strategies run in order for every item of a bullet list:
//!
//! - native: the first checkbox `input` of the item is removed and its
//!   checked state becomes the item's
//! - literal (optional): an item whose text starts with `[ ]`, `[x]` or `[X]`
//!   followed by whitespace or the end is tagged, and the marker is stripped
//!   from the first text node matching the pattern by itself
//!
//! Items of ordered lists are never converted; a native checkbox there is
//! written back as its literal marker so nothing is lost.

use crate::formats::html::dom::{
    attr, create_text, element_children, has_attr, is_element, set_attr, set_text, tag_name,
    text_content, text_of,
};
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;

static TASK_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[([ xX])\](\s|$)").expect("task prefix pattern is valid")
});

/// Tag task lists and task items below `root`.
pub fn normalize_task_lists(root: &Handle, literal_fallback: bool) {
    for child in element_children(root) {
        match tag_name(&child) {
            Some("ul") => normalize_list(&child, false, literal_fallback),
            Some("ol") => normalize_list(&child, true, literal_fallback),
            _ => normalize_task_lists(&child, literal_fallback),
        }
    }
}

fn normalize_list(list: &Handle, ordered: bool, literal_fallback: bool) {
    for item in element_children(list) {
        if !is_element(&item, "li") {
            continue;
        }

        if ordered {
            take_checkbox(&item, true);
        } else if let Some(checked) = take_checkbox(&item, false) {
            mark_task(list, &item, checked);
        } else if literal_fallback && attr(&item, "data-type").is_none() {
            literal_task(list, &item);
        }

        normalize_task_lists(&item, literal_fallback);
    }
}

fn mark_task(list: &Handle, item: &Handle, checked: bool) {
    set_attr(list, "data-type", "taskList");
    set_attr(item, "data-type", "taskItem");
    set_attr(item, "data-checked", if checked { "true" } else { "false" });
}

/// Remove the first checkbox input under `node` (not looking into nested
/// lists) and return its state. With `as_text` the input is replaced by its
/// literal marker instead.
fn take_checkbox(node: &Handle, as_text: bool) -> Option<bool> {
    let children: Vec<Handle> = node.children.borrow().iter().cloned().collect();
    for (index, child) in children.iter().enumerate() {
        if is_checkbox(child) {
            let checked = has_attr(child, "checked");
            let mut slots = node.children.borrow_mut();
            if as_text {
                let marker = if checked { "[x]" } else { "[ ]" };
                let text = create_text(marker);
                text.parent.set(child.parent.take());
                slots[index] = text;
            } else {
                slots.remove(index);
            }
            return Some(checked);
        }
        let nested_list = is_element(child, "ul") || is_element(child, "ol");
        if tag_name(child).is_some() && !nested_list {
            if let Some(checked) = take_checkbox(child, as_text) {
                return Some(checked);
            }
        }
    }
    None
}

fn is_checkbox(node: &Handle) -> bool {
    is_element(node, "input")
        && attr(node, "type")
            .map(|t| t.eq_ignore_ascii_case("checkbox"))
            .unwrap_or(false)
}

fn literal_task(list: &Handle, item: &Handle) {
    let text = text_content(item);
    let Some(captures) = TASK_PREFIX.captures(&text) else {
        return;
    };
    let checked = captures
        .get(1)
        .map(|m| m.as_str().eq_ignore_ascii_case("x"))
        .unwrap_or(false);
    mark_task(list, item, checked);
    strip_first_marker(item);
}

/// Strip the marker from the first text node that carries it on its own.
/// A marker split across several runs is left in place.
fn strip_first_marker(node: &Handle) -> bool {
    for child in node.children.borrow().iter() {
        if let Some(text) = text_of(child) {
            if TASK_PREFIX.is_match(&text) {
                set_text(child, &TASK_PREFIX.replacen(&text, 1, ""));
                return true;
            }
        } else if strip_first_marker(child) {
            return true;
        }
    }
    false
}
