//! Dual-mode editing
//!
//! A [`ModeController`] sits between a rich-text editing engine
//! ([`EditorHost`]) and the hosting application ([`ChangeListener`]). In rich
//! mode the engine's Document Tree is authoritative; in Markdown mode a text
//! buffer is. Content only crosses between the two on a toggle.
//!
//! The application always receives the markup form, never Markdown text.

pub mod host;
pub mod mode;
pub mod upload;

pub use host::{EditorHost, MemoryEditor};
pub use mode::{Mode, ModeController};
pub use upload::{ImageUploader, UploadPayload};

/// Receives the markup form whenever the authoritative content changes.
pub trait ChangeListener {
    fn content_changed(&self, markup: &str);
}

impl<F: Fn(&str)> ChangeListener for F {
    fn content_changed(&self, markup: &str) {
        self(markup)
    }
}
