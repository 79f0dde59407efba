//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the Document Tree and various text representations.

pub mod html;
pub mod json;
pub mod markdown;
pub mod tag;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
pub use tag::TagFormat;
