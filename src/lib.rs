//! headshift: demote Markdown H1 headings to H2 across a vault
//!
//! Every line of every document is classified by a small state machine that
//! knows about YAML front matter and fenced code blocks. Level-1 headings
//! outside those regions get a second `#`; everything else is copied byte for
//! byte. Changes are persisted with an atomic rename, optionally after a
//! timestamped backup of the original.
//!
//! # Quick Start
//!
//! ## Transforming text
//!
//! ```rust
//! use headshift::core::transform;
//!
//! let result = transform("---\ntitle: X\n---\n# Heading\n");
//! assert_eq!(result.text, "---\ntitle: X\n---\n## Heading\n");
//! assert_eq!(result.conversions[0].line_number, 4);
//! ```
//!
//! ## Converting a vault
//!
//! ```rust,no_run
//! use headshift::{ConvertConfig, Converter, Result};
//!
//! fn main() -> Result<()> {
//!     let config = ConvertConfig::new("/path/to/vault")
//!         .with_dry_run(false)
//!         .with_excludes(["templates"]);
//!     let summary = Converter::new(config)?.run()?;
//!     println!("{} heading(s) converted", summary.total_conversions);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: line classification, the transform, encodings and documents
//! - [`io`]: vault traversal, reading and the safe writer
//! - [`converter`]: the per-vault pipeline and its reports
//! - [`error`]: error types

// Public API exports
pub use error::{ErrorCategory, HeadshiftError, Result};

// Core types
pub use self::core::{
    classify_lines, transform, Conversion, Document, LineClass, LineClassifier, ScanState,
    TextEncoding, Transformation,
};

// IO types
pub use io::{FileResolver, ResolverConfig, SafeWriter, WriteResult, WriterConfig};

// Pipeline
pub use converter::{parse_excludes, ConvertConfig, Converter, FileReport, Summary};

pub mod converter;
pub mod core;
pub mod error;
pub mod io;
