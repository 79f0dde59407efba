//! Structural repair passes shared by the Markdown serializer and parser.
//!
//! They work on the generic HTML tree (see [`crate::formats::html::dom`]) by
//! relabeling and moving nodes in place, and on Markdown text split into
//! code-aware segments.

pub mod segments;
pub mod table_repair;
pub mod task_list;
