//! File I/O: vault traversal, reading with encoding detection, and safe writes

pub mod reader;
pub mod resolver;
pub mod writer;

pub use reader::read_document;
pub use resolver::{is_markdown, FileResolver, ResolverConfig, DEFAULT_EXCLUDES};
pub use writer::{SafeWriter, WriteResult, WriterConfig, BACKUP_TIMESTAMP_FORMAT, DEFAULT_BACKUP_DIR};
