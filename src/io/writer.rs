//! Crash-safe file replacement with timestamped backups
//!
//! A write goes through two gated phases. When backups are enabled the
//! original bytes are first copied to a fresh file under the backup root and
//! synced; only then is the new content written to a temp file in the
//! target's directory, synced, and renamed over the original. A failure at
//! any step leaves the original file as it was.

use crate::core::Document;
use crate::error::{HeadshiftError, Result};
use chrono::Local;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;

/// Backup folder created at the vault root
pub const DEFAULT_BACKUP_DIR: &str = "_backups";

/// Sortable, second-resolution timestamp inserted into backup names
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Backups made within the same second get a numeric suffix, up to this many
const MAX_BACKUP_ATTEMPTS: usize = 100;

/// Configuration for the safe writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Copy the original file before replacing it
    pub backup_enabled: bool,
    /// Root that relative backup paths are computed from
    pub vault_root: PathBuf,
    /// Where the mirrored backup tree lives
    pub backup_root: PathBuf,
    /// Give the rewritten file the original's permissions
    pub preserve_permissions: bool,
}

impl WriterConfig {
    /// Backups enabled, stored in `<vault_root>/_backups`
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        let vault_root = vault_root.into();
        Self {
            backup_enabled: true,
            backup_root: vault_root.join(DEFAULT_BACKUP_DIR),
            vault_root,
            preserve_permissions: true,
        }
    }

    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backup_enabled = enabled;
        self
    }

    pub fn with_backup_root(mut self, backup_root: impl Into<PathBuf>) -> Self {
        self.backup_root = backup_root.into();
        self
    }
}

/// Result of a write operation
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// File that was replaced
    pub path: PathBuf,
    /// Backup of the previous content, if one was made
    pub backup_path: Option<PathBuf>,
    /// Size of the new content on disk
    pub bytes_written: usize,
}

/// Backup-then-rename writer
pub struct SafeWriter {
    config: WriterConfig,
}

impl SafeWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Replace `document`'s file with `new_text`, in the document's encoding
    pub fn write(&self, document: &Document, new_text: &str) -> Result<WriteResult> {
        let path = document.path();
        let encoding = document.encoding();
        let bytes = encoding
            .encode(new_text)
            .ok_or_else(|| HeadshiftError::encode(path, encoding.name()))?;

        let backup_path = if self.config.backup_enabled {
            let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
            let backup_path = self.create_backup(path, &timestamp)?;
            info!("Backed up {} to {}", path.display(), backup_path.display());
            Some(backup_path)
        } else {
            None
        };

        self.write_atomic(path, &bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());

        Ok(WriteResult {
            path: path.to_path_buf(),
            backup_path,
            bytes_written: bytes.len(),
        })
    }

    /// Directory under the backup root mirroring `path`'s parent
    ///
    /// Paths outside the vault land directly in the backup root.
    pub fn backup_dir_for(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.config.vault_root) {
            Ok(relative) => match relative.parent() {
                Some(parent) => self.config.backup_root.join(parent),
                None => self.config.backup_root.clone(),
            },
            Err(_) => self.config.backup_root.clone(),
        }
    }

    /// Backup location for `path` taken at `timestamp`
    pub fn backup_path_for(&self, path: &Path, timestamp: &str) -> Result<PathBuf> {
        let name = backup_file_name(path, timestamp, 0)?;
        Ok(self.backup_dir_for(path).join(name))
    }

    /// Copy the on-disk bytes of `path` to a new backup file and sync it
    ///
    /// The backup keeps the original's permissions and modification time.
    /// The backup directory and every ancestor this call had to create are
    /// synced before returning.
    pub fn create_backup(&self, path: &Path, timestamp: &str) -> Result<PathBuf> {
        let backup_dir = self.backup_dir_for(path);
        let created = create_backup_dirs(&backup_dir).map_err(|e| {
            HeadshiftError::backup(
                path,
                format!("could not create {}: {}", backup_dir.display(), e),
            )
        })?;

        let mut source = File::open(path)
            .map_err(|e| HeadshiftError::backup(path, format!("could not open original: {}", e)))?;
        let (backup_path, mut dest) = open_new_backup(path, &backup_dir, timestamp)?;

        if let Err(e) = copy_contents(&mut source, &mut dest) {
            drop(dest);
            if let Err(cleanup) = fs::remove_file(&backup_path) {
                warn!(
                    "Could not remove partial backup {}: {}",
                    backup_path.display(),
                    cleanup
                );
            }
            return Err(HeadshiftError::backup(
                path,
                format!("could not copy to {}: {}", backup_path.display(), e),
            ));
        }

        sync_dir(&backup_dir);
        for dir in &created {
            if let Some(parent) = dir.parent() {
                sync_dir(parent);
            }
        }
        Ok(backup_path)
    }

    /// Write `bytes` to a synced temp file next to `path`, then rename it over
    pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut prefix = OsString::from(".");
        prefix.push(path.file_name().unwrap_or_default());
        prefix.push("_");

        // Dropping the temp file on any early return deletes it
        let mut temp = Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| HeadshiftError::write(path, format!("could not create temp file: {}", e)))?;
        debug!("Writing {} via {}", path.display(), temp.path().display());

        temp.write_all(bytes)
            .and_then(|_| temp.flush())
            .map_err(|e| HeadshiftError::write(path, format!("could not write temp file: {}", e)))?;

        if self.config.preserve_permissions {
            if let Ok(metadata) = fs::metadata(path) {
                temp.as_file()
                    .set_permissions(metadata.permissions())
                    .map_err(|e| {
                        HeadshiftError::write(path, format!("could not copy permissions: {}", e))
                    })?;
            }
        }

        temp.as_file()
            .sync_all()
            .map_err(|e| HeadshiftError::write(path, format!("could not sync temp file: {}", e)))?;

        temp.persist(path).map_err(|e| {
            HeadshiftError::write(path, format!("could not replace file: {}", e.error))
        })?;

        sync_dir(parent);
        Ok(())
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

/// `<stem>_<timestamp>[_<attempt>].<ext>`
fn backup_file_name(path: &Path, timestamp: &str, attempt: usize) -> Result<OsString> {
    let stem = path
        .file_stem()
        .ok_or_else(|| HeadshiftError::backup(path, "path has no file name"))?;

    let mut name = OsString::from(stem);
    name.push("_");
    name.push(timestamp);
    if attempt > 0 {
        name.push(format!("_{}", attempt));
    }
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    Ok(name)
}

/// Create `dir` and its missing ancestors, returning the ones created, innermost first
fn create_backup_dirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
        .map(Path::to_path_buf)
        .collect();
    fs::create_dir_all(dir)?;
    if !missing.is_empty() {
        debug!("Created backup directories {:?}", missing);
    }
    Ok(missing)
}

/// Copy bytes, permissions and modification time of `source` into `dest`, then sync
fn copy_contents(source: &mut File, dest: &mut File) -> io::Result<()> {
    let metadata = source.metadata()?;
    io::copy(source, dest)?;
    if let Ok(modified) = metadata.modified() {
        dest.set_modified(modified)?;
    }
    dest.set_permissions(metadata.permissions())?;
    dest.sync_all()
}

/// Create a backup file that did not exist before; existing ones are never reused
fn open_new_backup(path: &Path, backup_dir: &Path, timestamp: &str) -> Result<(PathBuf, File)> {
    for attempt in 0..MAX_BACKUP_ATTEMPTS {
        let candidate = backup_dir.join(backup_file_name(path, timestamp, attempt)?);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(HeadshiftError::backup(
                    path,
                    format!("could not create {}: {}", candidate.display(), e),
                ))
            }
        }
    }

    Err(HeadshiftError::backup(
        path,
        format!("too many backups for timestamp {}", timestamp),
    ))
}

/// Persist directory entries (new backup, renamed file) on Unix
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        warn!("Could not sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
