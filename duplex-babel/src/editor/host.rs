//! The editing engine seen from the conversion core.

use crate::decorations::{self, Decoration, DecorationSource};
use crate::doc::{Block, Document, Image};
use crate::error::FormatError;
use crate::formats::html::{parse_markup, serialize_markup};

/// What the core needs from a rich-text editing engine.
pub trait EditorHost {
    /// Current Document Tree.
    fn document(&self) -> &Document;

    /// Current document in markup form.
    fn markup(&self) -> Result<String, FormatError> {
        serialize_markup(self.document())
    }

    /// Replace the whole document with `markup`.
    fn replace_markup(&mut self, markup: &str) -> Result<(), FormatError>;

    /// Insert an image node.
    fn insert_image(&mut self, image: Image) -> Result<(), FormatError>;

    /// Decorations for the current document.
    fn decorations(&self) -> &[Decoration];
}

/// In-process editing engine holding the tree in memory.
///
/// Decorations are recomputed from the registered sources after every
/// mutation. Images are appended at the end of the document.
#[derive(Default)]
pub struct MemoryEditor {
    doc: Document,
    sources: Vec<Box<dyn DecorationSource>>,
    decorations: Vec<Decoration>,
}

impl MemoryEditor {
    pub fn new(doc: Document) -> Self {
        MemoryEditor {
            doc,
            sources: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn from_markup(markup: &str) -> Result<Self, FormatError> {
        Ok(Self::new(parse_markup(markup)?))
    }

    /// Register a decoration source.
    pub fn with_source<S: DecorationSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self.refresh();
        self
    }

    /// Apply a direct edit to the tree, as a user typing in rich mode would.
    pub fn edit<F: FnOnce(&mut Document)>(&mut self, f: F) {
        f(&mut self.doc);
        if self.doc.children.is_empty() {
            self.doc = Document::default();
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.decorations = decorations::collect(&self.sources, &self.doc);
    }
}

impl EditorHost for MemoryEditor {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn replace_markup(&mut self, markup: &str) -> Result<(), FormatError> {
        self.doc = parse_markup(markup)?;
        self.refresh();
        Ok(())
    }

    fn insert_image(&mut self, image: Image) -> Result<(), FormatError> {
        if image.src.trim().is_empty() {
            return Err(FormatError::ParseError("image source is empty".to_string()));
        }
        self.doc.children.push(Block::Image(image));
        self.refresh();
        Ok(())
    }

    fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }
}
