//! Image upload provider interface

use crate::error::FormatError;
use async_trait::async_trait;

/// The file handed to an uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadPayload {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Stores a file somewhere and resolves to the address it can be loaded from.
///
/// Failures are reported as they are; callers never retry.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, payload: UploadPayload) -> Result<String, FormatError>;
}
