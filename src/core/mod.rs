//! Core types and pure text processing
//!
//! - LineClassifier: per-line state machine over front matter and fences
//! - transform: rewrites level-1 headings to level 2
//! - TextEncoding: fixed-order encoding detection and re-encoding
//! - Document: a file's original bytes and decoded text

pub mod classify;
pub mod document;
pub mod encoding;
pub mod transform;

pub use classify::{classify_lines, LineClass, LineClassifier, ScanState};
pub use document::Document;
pub use encoding::TextEncoding;
pub use transform::{transform, Conversion, Transformation};
