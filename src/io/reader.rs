//! Document reading with encoding detection

use crate::core::Document;
use crate::error::{HeadshiftError, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Read `path` once and decode it with the fallback encoding order
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HeadshiftError::file_not_found(path));
    }

    let raw = fs::read(path).map_err(|e| HeadshiftError::from_io(path, e))?;
    let document = Document::from_bytes(path, raw)?;
    debug!(
        "Read {} ({} bytes, {})",
        path.display(),
        document.raw().len(),
        document.encoding()
    );

    Ok(document)
}
