//! JSON dump of the Document Tree
//!
//! Serialization only. Blocks, inlines and marks are tagged with a camelCase
//! `type` field, the shape an editor expects when it loads a document from
//! structured content.

use crate::doc::Document;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for the JSON tree dump
#[derive(Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Document tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serde_json::to_string_pretty(doc)
            .map_err(|e| FormatError::SerializationError(format!("JSON encoding failed: {e}")))
    }
}
