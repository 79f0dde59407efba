//! Markdown format implementation
//!
//! Bidirectional conversion between the markup form and GitHub-flavored
//! Markdown extended with a `==highlight==` token.
//!
//! # Library Choice
//!
//! Parsing goes through `comrak` (GFM tables, task lists, strikethrough,
//! autolinks) rendering to HTML, which html5ever then turns into the generic
//! tree the repair passes work on. Serialization walks that same generic tree
//! into a comrak AST and renders it with `format_commonmark`, so escaping and
//! block layout are comrak's. The editor's own tokens (`==` highlights, `_`
//! emphasis where it flanks cleanly) go in as raw inline nodes.
//!
//! # Element Mapping
//!
//! | Markup                         | Markdown                        | Notes                                  |
//! |--------------------------------|---------------------------------|----------------------------------------|
//! | `h1`..`h6`                     | `#`..`######`                   |                                        |
//! | `ul` / `ol start`              | `- ` / `N.  `                   | sibling lists split by `<!-- end list -->` |
//! | task list / task item          | `- [ ] ` / `- [x] `             | list itself is transparent             |
//! | `blockquote`                   | `> `                            |                                        |
//! | `pre > code.language-x`        | fenced block with info string   |                                        |
//! | `hr`                           | `-----`                         |                                        |
//! | `img`                          | `![alt](src "title")`           |                                        |
//! | `table`                        | GFM table                       | headerless tables stay raw HTML        |
//! | `strong`, `b`, bold span       | `**text**`                      |                                        |
//! | `em`, `i`, italic span         | `_text_`                        | `*text*` inside a word                 |
//! | `s`, `del`, `strike`           | `~text~`                        |                                        |
//! | `mark`                         | `==text==`                      | pre-pass on import                     |
//! | `code`                         | backtick span                   |                                        |
//! | `a href`                       | `[text](href)`                  |                                        |
//! | `br`                           | backslash break / `<br>` in cells |                                      |
//! | `u`, `sup`, `sub`              | raw HTML                        | configurable                           |
//!
//! # Lossy Conversions
//!
//! - Whitespace inside paragraphs is collapsed
//! - Cells with several paragraphs come back as one paragraph with breaks
//! - Heading levels 4 to 6 load as level 3

pub mod normalize;
pub mod parser;
pub mod rules;
pub mod serializer;

pub use parser::{MarkdownParser, MarkdownParserBuilder, ParserSettings, StrongRule};
pub use rules::{HighlightRule, InlineRule, PermissiveStrongRule};
pub use serializer::{markup_to_markdown, serialize_markup_to_markdown, MarkdownOptions};

use crate::doc::Document;
use crate::error::FormatError;
use crate::format::Format;
use std::collections::HashMap;

/// Format implementation for Markdown
#[derive(Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
    parser: MarkdownParser,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions, parser: MarkdownParser) -> Self {
        Self { options, parser }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "GitHub-flavored Markdown with ==highlight=="
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        self.parser.parse_to_document(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_document(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut effective = self.options.clone();
        for (key, value) in options {
            match key.as_str() {
                "bullet-marker" => {
                    effective.bullet_marker = match value.as_str() {
                        "-" | "*" | "+" => value.chars().next().unwrap_or('-'),
                        other => {
                            return Err(FormatError::SerializationError(format!(
                                "Invalid bullet marker '{other}'"
                            )))
                        }
                    }
                }
                "emphasis" => effective.emphasis_delimiter = value.clone(),
                "strong" => effective.strong_delimiter = value.clone(),
                "normalize-quotes" => {
                    effective.normalize_quotes = value.parse().map_err(|_| {
                        FormatError::SerializationError(format!(
                            "Invalid boolean for normalize-quotes: '{value}'"
                        ))
                    })?
                }
                "keep-tags" => {
                    effective.keep_tags = value
                        .split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                }
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Unknown markdown option '{other}'"
                    )))
                }
            }
        }
        serializer::serialize_document(doc, &effective)
    }
}
