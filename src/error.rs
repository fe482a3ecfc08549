//! Error types for the headshift library
//!
//! Every failure is scoped to a single document: decoding, backup and write
//! errors are recorded against the file that caused them and never stop the
//! rest of a vault from being processed.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum HeadshiftError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// None of the fallback encodings could decode the file
    #[error("Could not decode {path} with supported encodings")]
    Decode { path: PathBuf },

    /// The rewritten text cannot be represented in the file's encoding
    #[error("Cannot encode {path} as {encoding}")]
    Encode { path: PathBuf, encoding: String },

    /// Backup copy failed, the original was left untouched
    #[error("Backup error for {path}: {reason}")]
    Backup { path: PathBuf, reason: String },

    /// Temp file write or rename failed, the original was left untouched
    #[error("Write error for {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Permission errors
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Vault root missing or not a directory
    #[error("Invalid vault {path}: {reason}")]
    InvalidVault { path: PathBuf, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HeadshiftError>;

impl HeadshiftError {
    /// Create a new decode error
    pub fn decode(path: impl Into<PathBuf>) -> Self {
        Self::Decode { path: path.into() }
    }

    /// Create a new encode error
    pub fn encode(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            encoding: encoding.into(),
        }
    }

    /// Create a new backup error
    pub fn backup(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Backup {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new write error
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    /// Create a new invalid vault error
    pub fn invalid_vault(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidVault {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map an I/O error on `path` to the closest variant
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::Io(err),
        }
    }

    /// Whether a later run could succeed without user intervention
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::Walk(_) | Self::Backup { .. } | Self::Write { .. } => true,
            Self::Decode { .. }
            | Self::Encode { .. }
            | Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidVault { .. } => false,
        }
    }

    /// Get the reporting category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Backup { .. } => ErrorCategory::Backup,
            Self::Encode { .. } | Self::Write { .. } => ErrorCategory::Write,
            Self::PermissionDenied { .. } => ErrorCategory::Permission,
            Self::Io(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorCategory::Permission
            }
            _ => ErrorCategory::Other,
        }
    }
}

/// Coarse error classes used in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorCategory {
    Decode,
    Backup,
    Write,
    Permission,
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "DECODE"),
            Self::Backup => write!(f, "BACKUP"),
            Self::Write => write!(f, "WRITE"),
            Self::Permission => write!(f, "PERMISSION"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl Clone for HeadshiftError {
    fn clone(&self) -> Self {
        match self {
            // std::io::Error is not Clone, keep kind and message
            Self::Io(io_err) => Self::Io(std::io::Error::new(io_err.kind(), io_err.to_string())),
            Self::Walk(walk_err) => {
                let kind = walk_err
                    .io_error()
                    .map(|e| e.kind())
                    .unwrap_or(std::io::ErrorKind::Other);
                Self::Io(std::io::Error::new(kind, walk_err.to_string()))
            }
            Self::Decode { path } => Self::Decode { path: path.clone() },
            Self::Encode { path, encoding } => Self::Encode {
                path: path.clone(),
                encoding: encoding.clone(),
            },
            Self::Backup { path, reason } => Self::Backup {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::Write { path, reason } => Self::Write {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::PermissionDenied { path } => Self::PermissionDenied { path: path.clone() },
            Self::InvalidVault { path, reason } => Self::InvalidVault {
                path: path.clone(),
                reason: reason.clone(),
            },
        }
    }
}
