//! Markup form (HTML) implementation
//!
//! The markup form is the nested-tag serialization of the Document Tree and
//! the one content format the hosting application ever sees.
//!
//! # Library Choice
//!
//! Parsing and serialization go through `html5ever` + `markup5ever_rcdom`:
//! a browser-grade HTML5 tree builder that repairs malformed input the way
//! the editor's own engine would, and a reference-counted tree we can walk
//! and relabel in place for the repair passes.
//!
//! # Element Mapping
//!
//! | Document Tree   | Markup                                                          |
//! |-----------------|-----------------------------------------------------------------|
//! | paragraph       | `<p>`                                                           |
//! | heading         | `<h1>`..`<h3>` (`h4`..`h6` load as level 3)                     |
//! | bulletList      | `<ul>` / `<li>`                                                 |
//! | orderedList     | `<ol start>` / `<li>`                                           |
//! | taskList        | `<ul data-type="taskList">`                                     |
//! | taskItem        | `<li data-type="taskItem" data-checked>` + label + `<div>`      |
//! | table           | `<table><colgroup>..<tbody>`, header row stays in `tbody`       |
//! | blockquote      | `<blockquote>`                                                  |
//! | codeBlock       | `<pre><code class="language-x">`                                |
//! | horizontalRule  | `<hr>`                                                          |
//! | image           | `<img src alt title>`                                           |
//! | hardBreak       | `<br>`                                                          |
//! | bold / italic   | `<strong>` / `<em>` (`b`, `i` and CSS style spans on import)    |
//! | strike          | `<s>` (`del`, `strike` on import)                               |
//! | code            | `<code>`                                                        |
//! | highlight       | `<mark>`                                                        |
//! | link            | `<a href>`                                                      |

pub mod dom;
pub mod parser;
pub mod serializer;

pub use parser::{document_from_body, parse_markup};
pub use serializer::serialize_markup;

use crate::doc::Document;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for the markup form
#[derive(Default)]
pub struct HtmlFormat;

impl HtmlFormat {
    pub fn new() -> Self {
        HtmlFormat
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Editor markup form (HTML fragment)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_markup(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serialize_markup(doc)
    }
}
