//! Small helpers over the `markup5ever_rcdom` tree.
//!
//! Both directions of the markup form, the table repair pass and the task
//! list normalization work on this generic tree, so the node plumbing lives
//! here once.

use crate::error::FormatError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::ops::Deref;
use std::rc::Rc;

/// A parsed fragment: the `<body>` element together with the tree owning it.
///
/// Dropping an rcdom tree empties every node below its document, including
/// nodes still referenced elsewhere, so the body is only usable while the
/// tree is alive. Derefs to the body handle.
pub struct ParsedMarkup {
    body: Handle,
    _dom: RcDom,
}

impl ParsedMarkup {
    pub fn body(&self) -> &Handle {
        &self.body
    }
}

impl Deref for ParsedMarkup {
    type Target = Handle;

    fn deref(&self) -> &Handle {
        &self.body
    }
}

/// Parse an HTML fragment and return its `<body>` element.
///
/// The HTML5 tree builder never fails; malformed input is repaired the way a
/// browser would repair it.
pub fn parse_body(markup: &str) -> Result<ParsedMarkup, FormatError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    let body = find_element(&dom.document, "body")
        .ok_or_else(|| FormatError::ParseError("markup has no body element".to_string()))?;
    Ok(ParsedMarkup { body, _dom: dom })
}

/// Depth-first search for the first element named `tag`.
pub fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if is_element(node, tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Local name of an element, `None` for text, comments and the document.
pub fn tag_name(node: &Node) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Node, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub fn attr(node: &Node, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Node, key: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|a| &*a.name.local == key),
        _ => false,
    }
}

pub fn set_attr(node: &Node, key: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|a| &*a.name.local == key) {
            Some(existing) => existing.value = value.to_string().into(),
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(key)),
                value: value.to_string().into(),
            }),
        }
    }
}

/// Text of a text node, `None` for anything else.
pub fn text_of(node: &Node) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Replace the contents of a text node.
pub fn set_text(node: &Node, text: &str) {
    if let NodeData::Text { contents } = &node.data {
        *contents.borrow_mut() = text.to_string().into();
    }
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let Some(text) = text_of(node) {
        out.push_str(&text);
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Element children of `node`, skipping text and comments.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| tag_name(c).is_some())
        .cloned()
        .collect()
}

/// Create an element node with the given attributes.
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Append `child` to `parent`, updating the child's parent link.
pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Serialize `node` including its own tag.
pub fn serialize_node(node: &Handle) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(node.clone()), opts)
        .map_err(|e| FormatError::SerializationError(format!("HTML serialization failed: {e}")))?;
    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

/// Serialize the children of `node`, leaving out its own tag.
pub fn serialize_children(node: &Handle) -> Result<String, FormatError> {
    let mut out = String::new();
    for child in node.children.borrow().iter() {
        match text_of(child) {
            Some(text) => out.push_str(&escape_text(&text)),
            None => out.push_str(&serialize_node(child)?),
        }
    }
    Ok(out)
}

/// Escape text the same way the HTML serializer escapes text nodes.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
