//! Markdown parsing (Markdown → markup form)
//!
//! Pipeline: inline pre-pass rules → comrak (GFM) → generic HTML tree →
//! task-list normalization → Document Tree → canonical markup.
//!
//! Each [`MarkdownParser`] carries its own rule set, chosen when it is
//! built, so parsers with different grammars can live side by side.

use super::rules::{HighlightRule, InlineRule, PermissiveStrongRule};
use crate::common::segments::map_text;
use crate::common::task_list::normalize_task_lists;
use crate::doc::Document;
use crate::error::FormatError;
use crate::formats::html::dom::{escape_text, parse_body};
use crate::formats::html::{document_from_body, serialize_markup};
use comrak::{markdown_to_html, ComrakOptions};
use serde::{Deserialize, Serialize};

/// Parser strategies as they appear in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Use the permissive `**…**` rule instead of the stock grammar
    pub permissive_strong: bool,
    /// Translate `==text==` into highlights
    pub highlight: bool,
    /// Recognize `[ ]`/`[x]` typed as plain text at the start of list items
    pub literal_task_items: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            permissive_strong: true,
            highlight: true,
            literal_task_items: true,
        }
    }
}

/// Which strong-emphasis grammar to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrongRule {
    /// Accepts single `*` inside the span, e.g. `**Name(Qualifier)**`
    Permissive,
    /// CommonMark's own delimiter rules
    Stock,
}

pub struct MarkdownParserBuilder {
    strong: StrongRule,
    highlight: bool,
    literal_task_items: bool,
    extra_rules: Vec<Box<dyn InlineRule>>,
}

impl MarkdownParserBuilder {
    pub fn strong_rule(mut self, rule: StrongRule) -> Self {
        self.strong = rule;
        self
    }

    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    pub fn literal_task_items(mut self, enabled: bool) -> Self {
        self.literal_task_items = enabled;
        self
    }

    /// Append a custom rule; it runs after the built-in ones.
    pub fn rule<R: InlineRule + 'static>(mut self, rule: R) -> Self {
        self.extra_rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> MarkdownParser {
        let mut rules: Vec<Box<dyn InlineRule>> = Vec::new();
        if self.highlight {
            rules.push(Box::new(HighlightRule));
        }
        if self.strong == StrongRule::Permissive {
            rules.push(Box::new(PermissiveStrongRule));
        }
        rules.extend(self.extra_rules);
        MarkdownParser {
            rules,
            literal_task_items: self.literal_task_items,
        }
    }
}

/// Markdown → markup parser with its own pre-pass rules
pub struct MarkdownParser {
    rules: Vec<Box<dyn InlineRule>>,
    literal_task_items: bool,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MarkdownParser {
    /// Parser with every strategy enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MarkdownParserBuilder {
        MarkdownParserBuilder {
            strong: StrongRule::Permissive,
            highlight: true,
            literal_task_items: true,
            extra_rules: Vec::new(),
        }
    }

    pub fn from_settings(settings: &ParserSettings) -> Self {
        let strong = if settings.permissive_strong {
            StrongRule::Permissive
        } else {
            StrongRule::Stock
        };
        Self::builder()
            .strong_rule(strong)
            .highlight(settings.highlight)
            .literal_task_items(settings.literal_task_items)
            .build()
    }

    /// Names of the active pre-pass rules, in the order they run.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run the pre-pass rules over the text outside code and raw tables.
    pub fn prepare(&self, source: &str) -> String {
        map_text(source, true, |text| {
            self.rules
                .iter()
                .fold(text.to_string(), |acc, rule| rule.apply(&acc))
        })
    }

    /// Parse Markdown into a Document Tree.
    pub fn parse_to_document(&self, source: &str) -> Result<Document, FormatError> {
        let prepared = self.prepare(source);
        let html = markdown_to_html(&prepared, &comrak_options());
        let body = parse_body(&html)?;
        normalize_task_lists(&body, self.literal_task_items);
        Ok(document_from_body(&body))
    }

    /// Fail-soft parse: on failure the source becomes one plain paragraph.
    pub fn parse(&self, source: &str) -> Document {
        match self.parse_to_document(source) {
            Ok(doc) => doc,
            Err(err) => {
                log::warn!("markdown parse failed, using plain text: {err}");
                Document::plain_text(source)
            }
        }
    }

    /// Parse Markdown into the canonical markup form. Never fails.
    pub fn parse_to_markup(&self, source: &str) -> String {
        match serialize_markup(&self.parse(source)) {
            Ok(markup) => markup,
            Err(err) => {
                log::warn!("markup serialization failed, using plain text: {err}");
                format!("<p>{}</p>", escape_text(source))
            }
        }
    }
}

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    // Pre-pass rules emit inline tags that must reach the HTML tree.
    options.render.unsafe_ = true;
    options
}
