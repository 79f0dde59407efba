//! Rich / Markdown mode state machine.

use super::host::EditorHost;
use super::upload::{ImageUploader, UploadPayload};
use super::ChangeListener;
use crate::doc::{Block, Document, Image};
use crate::error::FormatError;
use crate::formats::markdown::normalize::normalize_quotes;
use crate::formats::markdown::serializer::{markup_to_markdown, serialize_document};
use crate::formats::markdown::{MarkdownOptions, MarkdownParser};
use log::debug;

/// Which representation is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rich,
    Markdown,
}

/// Owns the mode and drives conversions on every transition.
pub struct ModeController<H: EditorHost> {
    host: H,
    mode: Mode,
    buffer: String,
    parser: MarkdownParser,
    options: MarkdownOptions,
    listener: Option<Box<dyn ChangeListener>>,
}

impl<H: EditorHost> ModeController<H> {
    pub fn new(host: H) -> Self {
        ModeController {
            host,
            mode: Mode::Rich,
            buffer: String::new(),
            parser: MarkdownParser::default(),
            options: MarkdownOptions::default(),
            listener: None,
        }
    }

    pub fn with_parser(mut self, parser: MarkdownParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_options(mut self, options: MarkdownOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_listener<L: ChangeListener + 'static>(mut self, listener: L) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The Markdown buffer, while in Markdown mode.
    pub fn markdown(&self) -> Option<&str> {
        match self.mode {
            Mode::Markdown => Some(&self.buffer),
            Mode::Rich => None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Switch modes, converting the authoritative content.
    ///
    /// Rich → Markdown never fails once the markup is read: a broken
    /// conversion leaves the markup itself in the buffer. Markdown → Rich
    /// stays in Markdown mode if the engine refuses the new content.
    pub fn toggle(&mut self) -> Result<Mode, FormatError> {
        match self.mode {
            Mode::Rich => {
                let markup = self.host.markup()?;
                self.buffer = markup_to_markdown(&markup, &self.options);
                self.mode = Mode::Markdown;
                debug!("rich -> markdown ({} bytes)", self.buffer.len());
            }
            Mode::Markdown => {
                let markup = self.parser.parse_to_markup(&self.buffer);
                self.host.replace_markup(&markup)?;
                self.mode = Mode::Rich;
                debug!("markdown -> rich ({} bytes)", markup.len());
                self.notify_host()?;
            }
        }
        Ok(self.mode)
    }

    /// Replace the Markdown buffer and publish the derived markup.
    ///
    /// The engine's tree is not touched; only the listener sees the result.
    pub fn edit_markdown(&mut self, text: &str) -> Result<(), FormatError> {
        if self.mode != Mode::Markdown {
            return Err(FormatError::NotSupported(
                "markdown edits need markdown mode".to_string(),
            ));
        }
        self.buffer = text.to_string();
        self.sync_buffer();
        Ok(())
    }

    /// Called by the engine after it mutated the document.
    pub fn document_changed(&mut self) -> Result<(), FormatError> {
        match self.mode {
            Mode::Rich => self.notify_host(),
            Mode::Markdown => {
                debug!("document change ignored in markdown mode");
                Ok(())
            }
        }
    }

    /// Load content supplied by the application, if it differs from what the
    /// engine already holds. The listener is not notified.
    pub fn set_content(&mut self, markup: &str) -> Result<(), FormatError> {
        if self.host.markup()? != markup {
            self.host.replace_markup(markup)?;
        }
        Ok(())
    }

    /// Upload `payload` and insert the resulting image.
    ///
    /// Nothing is applied unless the upload resolves to an address.
    pub async fn insert_image(
        &mut self,
        uploader: &dyn ImageUploader,
        payload: UploadPayload,
        alt: Option<String>,
    ) -> Result<(), FormatError> {
        if !payload.is_image() {
            return Err(FormatError::Upload(format!(
                "'{}' is not an image ({})",
                payload.name, payload.mime
            )));
        }
        let url = uploader.upload(payload).await?;
        if url.trim().is_empty() {
            return Err(FormatError::Upload(
                "uploader returned an empty address".to_string(),
            ));
        }
        self.insert_image_url(&url, alt)
    }

    /// Insert an image that is already hosted at `url`.
    pub fn insert_image_url(&mut self, url: &str, alt: Option<String>) -> Result<(), FormatError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FormatError::ParseError("image address is empty".to_string()));
        }
        let image = Image {
            src: url.to_string(),
            alt: alt.filter(|a| !a.is_empty()),
            title: None,
        };

        match self.mode {
            Mode::Rich => {
                self.host.insert_image(image)?;
                self.notify_host()
            }
            Mode::Markdown => {
                let snippet =
                    serialize_document(&Document::new(vec![Block::Image(image)]), &self.options)?;
                let trimmed = self.buffer.trim_end();
                self.buffer = if trimmed.is_empty() {
                    snippet
                } else {
                    format!("{trimmed}\n\n{snippet}")
                };
                self.sync_buffer();
                Ok(())
            }
        }
    }

    fn sync_buffer(&self) {
        let markup = self.parser.parse_to_markup(&normalize_quotes(&self.buffer));
        self.notify(&markup);
    }

    fn notify_host(&self) -> Result<(), FormatError> {
        let markup = self.host.markup()?;
        self.notify(&markup);
        Ok(())
    }

    fn notify(&self, markup: &str) {
        if let Some(listener) = &self.listener {
            listener.content_changed(markup);
        }
    }
}
