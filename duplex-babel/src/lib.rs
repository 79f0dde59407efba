//! Markdown and rich-text conversion for dual-mode editors
//!
//!     This crate lets an editor hold a document either as a structured rich-text tree or as
//!     GitHub-flavored Markdown, and move between the two without losing formatting.
//!
//!     TLDR:
//!         - The Document Tree (./doc) is the structure; the markup form (./formats/html) is its
//!           stable, nested-tag interchange form with the hosting application.
//!         - Markdown goes through the markup form in both directions, with repair passes for
//!           tables and task lists on the generic tree in between.
//!         - Nothing here is allowed to block an editing session: the entry points used on mode
//!           switches fall back to the least destructive content instead of failing.
//!
//! Architecture
//!
//!     This is a pure lib, it powers duplex-cli but is shell agnostic: no code here prints, reads
//!     env vars or touches files. Failures are logged through the `log` facade.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── doc                     # Document Tree, positions, skeletons
//!     ├── common                  # Passes over the generic parse tree
//!     │   ├── segments.rs         # code-aware text segmentation
//!     │   ├── table_repair.rs
//!     │   └── task_list.rs
//!     ├── formats
//!     │   ├── html                # markup form
//!     │   ├── markdown            # parser, serializer, pre-pass rules
//!     │   ├── json
//!     │   └── tag
//!     ├── decorations.rs          # caption scanner
//!     ├── editor                  # mode state machine and host interfaces
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Rust does not discover tests in subdirectories by itself, so tests/lib.rs includes them.
//!
//! Conversions
//!
//!     Rich → Markdown: markup → generic tree (html5ever) → table repair → tree walk →
//!     tag safety net → quote normalization.
//!
//!     Markdown → Rich: inline pre-pass rules (highlight, permissive strong) → comrak →
//!     generic tree → task-list normalization → Document Tree → markup.
//!
//!     Both sides hand the generic tree work to html5ever and the Markdown grammar to comrak;
//!     what lives here is the adaptation to the editor's conventions.

pub mod common;
pub mod decorations;
pub mod doc;
pub mod editor;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use decorations::{CaptionScanner, Decoration, DecorationKind, DecorationSource};
pub use doc::Document;
pub use editor::{ChangeListener, EditorHost, MemoryEditor, Mode, ModeController};
pub use error::FormatError;
pub use format::Format;
pub use formats::markdown::{markup_to_markdown, MarkdownOptions, MarkdownParser, ParserSettings};
pub use registry::FormatRegistry;

/// The markup form: the nested-tag serialization of the Document Tree.
pub mod markup {
    pub use crate::formats::html::{parse_markup as parse, serialize_markup as serialize};
}
