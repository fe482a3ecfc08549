//! A Markdown document as read from disk

use super::encoding::TextEncoding;
use super::transform::{transform, Transformation};
use crate::error::{HeadshiftError, Result};
use std::path::{Path, PathBuf};

/// One file's original bytes together with their decoded text
///
/// The document is never edited in place: [`Document::transform`] computes
/// the new text and the writer persists it.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    raw: Vec<u8>,
    encoding: TextEncoding,
    text: String,
}

impl Document {
    /// Decode `raw` using the fallback encoding order
    pub fn from_bytes(path: impl Into<PathBuf>, raw: Vec<u8>) -> Result<Self> {
        let path = path.into();
        let (encoding, text) =
            TextEncoding::detect(&raw).ok_or_else(|| HeadshiftError::decode(&path))?;

        Ok(Self {
            path,
            raw,
            encoding,
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes exactly as they were on disk
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Decoded text, without any byte-order mark
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compute the demoted text for this document
    pub fn transform(&self) -> Transformation {
        transform(&self.text)
    }
}
