//! Material image attachments.

use crate::{ApiError, ApiResult};
use labora_core::form::check_image_size;
use labora_core::CoreError;
use reqwest::multipart::Part;
use std::path::Path;

/// An image ready to be attached to a create/update request as the `image` part.
#[derive(Clone)]
pub struct ImageUpload {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Checks the size limit and sniffs the content type from the bytes.
    ///
    /// # Errors
    ///
    /// - `ImageTooLarge` over 5 MiB
    /// - `InvalidInput` when the bytes are not a recognised image format
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> ApiResult<Self> {
        check_image_size(bytes.len() as u64)?;
        let kind = infer::get(&bytes)
            .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| CoreError::InvalidInput("file is not a supported image".into()))?;
        Ok(Self {
            file_name: file_name.into(),
            mime_type: kind.mime_type(),
            bytes,
        })
    }

    /// Reads an image from disk. The size is checked before the file is read.
    pub async fn from_path(path: &Path) -> ApiResult<Self> {
        let read_error = |source| ApiError::ImageRead {
            path: path.to_path_buf(),
            source,
        };
        let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
        check_image_size(metadata.len())?;
        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self::new(file_name, bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_part(self) -> ApiResult<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime_type)?)
    }
}

#[cfg(test)]
pub(crate) const PNG_HEADER: [u8; 16] = [
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];
