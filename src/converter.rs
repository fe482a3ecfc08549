//! Vault-wide conversion pipeline
//!
//! [`Converter`] resolves the Markdown files of a vault, demotes the H1
//! headings of each one and, outside dry-run mode, hands the result to the
//! [`SafeWriter`]. Documents are processed one after another; a failure is
//! recorded in that document's [`FileReport`] and the run moves on.

use crate::core::{Conversion, TextEncoding, Transformation};
use crate::error::{HeadshiftError, Result};
use crate::io::{
    read_document, FileResolver, ResolverConfig, SafeWriter, WriterConfig, DEFAULT_BACKUP_DIR,
};
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Immutable settings for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Root of the vault to scan
    pub vault_root: PathBuf,
    /// Only count conversions, never touch files
    pub dry_run: bool,
    /// Back up each file before it is rewritten
    pub backup_enabled: bool,
    /// Backup folder name under the vault root
    pub backup_dir_name: String,
    /// Extra folder names to skip
    pub excludes: BTreeSet<String>,
}

impl ConvertConfig {
    /// Dry run with backups enabled, the safe defaults
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
            dry_run: true,
            backup_enabled: true,
            backup_dir_name: DEFAULT_BACKUP_DIR.to_string(),
            excludes: BTreeSet::new(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backup_enabled = enabled;
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(excludes.into_iter().map(Into::into));
        self
    }

    /// Backup tree root, `<vault>/<backup_dir_name>`
    pub fn backup_root(&self) -> PathBuf {
        self.vault_root.join(&self.backup_dir_name)
    }
}

/// Split a comma-separated folder list, dropping blanks
pub fn parse_excludes(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome for a single document
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Path relative to the vault root
    pub relative_path: PathBuf,
    /// Encoding the file was decoded with, if it could be read
    pub encoding: Option<TextEncoding>,
    /// Headings converted (or that would be, in dry-run mode)
    pub conversions: Vec<Conversion>,
    /// Whether the file on disk was rewritten
    pub modified: bool,
    pub backup_path: Option<PathBuf>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<HeadshiftError>,
}

impl FileReport {
    fn new(path: &Path, vault_root: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            relative_path: path.strip_prefix(vault_root).unwrap_or(path).to_path_buf(),
            encoding: None,
            conversions: Vec::new(),
            modified: false,
            backup_path: None,
            error: None,
        }
    }

    fn failed(mut self, error: HeadshiftError) -> Self {
        warn!("{}: {}", self.path.display(), error);
        self.error = Some(error);
        self
    }

    /// Headings counted towards the totals; zero for failed documents
    pub fn conversion_count(&self) -> usize {
        if self.error.is_some() {
            0
        } else {
            self.conversions.len()
        }
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<HeadshiftError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Aggregate totals for a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    /// Files with at least one conversion
    pub files_changed: usize,
    pub total_conversions: usize,
    /// `path: message` for every document that failed
    pub errors: Vec<String>,
    pub files: Vec<FileReport>,
}

impl Summary {
    pub fn from_reports(files: Vec<FileReport>) -> Self {
        let counts = files.iter().map(FileReport::conversion_count);
        let files_changed = counts.clone().filter(|&count| count > 0).count();
        let total_conversions = counts.sum();
        let errors = files
            .iter()
            .filter_map(|report| {
                report
                    .error
                    .as_ref()
                    .map(|error| format!("{}: {}", report.path.display(), error))
            })
            .collect();

        Self {
            files_scanned: files.len(),
            files_changed,
            total_conversions,
            errors,
            files,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs the read, transform and write pipeline over a vault
pub struct Converter {
    config: ConvertConfig,
    resolver: FileResolver,
    writer: SafeWriter,
}

impl Converter {
    /// Validate the vault root and build the pipeline
    pub fn new(config: ConvertConfig) -> Result<Self> {
        let vault_root = config.vault_root.canonicalize().map_err(|e| {
            HeadshiftError::invalid_vault(&config.vault_root, format!("does not exist: {}", e))
        })?;
        if !vault_root.is_dir() {
            return Err(HeadshiftError::invalid_vault(vault_root, "not a directory"));
        }
        let config = ConvertConfig {
            vault_root,
            ..config
        };

        let resolver = FileResolver::with_config(ResolverConfig {
            excludes: config.excludes.clone(),
            backup_dir_name: config.backup_dir_name.clone(),
            ..Default::default()
        });
        let writer = SafeWriter::new(
            WriterConfig::new(&config.vault_root)
                .with_backups(config.backup_enabled)
                .with_backup_root(config.backup_root()),
        );

        Ok(Self {
            config,
            resolver,
            writer,
        })
    }

    /// Configuration with the canonical vault root
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Markdown files that a run would scan
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.resolver.resolve(&self.config.vault_root)
    }

    /// Read, convert and, unless dry-running, rewrite one document
    pub fn process_file(&self, path: &Path) -> FileReport {
        let mut report = FileReport::new(path, &self.config.vault_root);

        let document = match read_document(path) {
            Ok(document) => document,
            Err(e) => return report.failed(e),
        };
        report.encoding = Some(document.encoding());

        let Transformation { text, conversions } = document.transform();
        report.conversions = conversions;
        if report.conversions.is_empty() {
            return report;
        }
        debug!(
            "{}: {} H1 heading(s) found",
            report.relative_path.display(),
            report.conversions.len()
        );

        if self.config.dry_run {
            return report;
        }

        match self.writer.write(&document, &text) {
            Ok(result) => {
                report.modified = true;
                report.backup_path = result.backup_path;
                report
            }
            Err(e) => report.failed(e),
        }
    }

    /// Process the whole vault
    pub fn run(&self) -> Result<Summary> {
        self.run_with(|_| {})
    }

    /// Process the whole vault, calling `on_file` after each document
    pub fn run_with<F>(&self, mut on_file: F) -> Result<Summary>
    where
        F: FnMut(&FileReport),
    {
        let files = self.discover()?;
        info!(
            "Scanning {} markdown file(s) in {} ({})",
            files.len(),
            self.config.vault_root.display(),
            if self.config.dry_run { "dry run" } else { "write" }
        );

        let reports = files
            .iter()
            .map(|path| {
                let report = self.process_file(path);
                on_file(&report);
                report
            })
            .collect();

        Ok(Summary::from_reports(reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_excludes() {
        let excludes = parse_excludes(" drafts, templates ,,archive ");
        assert_eq!(
            excludes.into_iter().collect::<Vec<_>>(),
            vec!["archive", "drafts", "templates"]
        );
        assert!(parse_excludes("").is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = ConvertConfig::new("/vault");
        assert!(config.dry_run);
        assert!(config.backup_enabled);
        assert_eq!(config.backup_root(), PathBuf::from("/vault/_backups"));

        let config = config
            .with_dry_run(false)
            .with_backups(false)
            .with_excludes(["drafts"]);
        assert!(!config.dry_run);
        assert!(!config.backup_enabled);
        assert!(config.excludes.contains("drafts"));
    }

    #[test]
    fn test_missing_vault() {
        let temp_dir = TempDir::new().unwrap();
        let result = Converter::new(ConvertConfig::new(temp_dir.path().join("nope")));
        assert!(matches!(
            result.err(),
            Some(HeadshiftError::InvalidVault { .. })
        ));
    }

    #[test]
    fn test_process_file_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.md");
        fs::write(&path, "# A\n## B\n").unwrap();

        let converter = Converter::new(ConvertConfig::new(temp_dir.path())).unwrap();
        let report = converter.process_file(&converter.config().vault_root.join("a.md"));

        assert_eq!(report.relative_path, PathBuf::from("a.md"));
        assert_eq!(report.encoding, Some(TextEncoding::Utf8));
        assert_eq!(report.conversion_count(), 1);
        assert!(!report.modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# A\n## B\n");
    }

    #[test]
    fn test_summary_counts_skip_failed_files() {
        let ok = FileReport {
            conversions: vec![Conversion {
                line_number: 1,
                original: "# A".to_string(),
            }],
            ..FileReport::new(Path::new("/v/a.md"), Path::new("/v"))
        };
        let failed = FileReport {
            conversions: ok.conversions.clone(),
            ..FileReport::new(Path::new("/v/b.md"), Path::new("/v"))
        }
        .failed(HeadshiftError::write("/v/b.md", "rename failed"));
        let untouched = FileReport::new(Path::new("/v/c.md"), Path::new("/v"));

        let summary = Summary::from_reports(vec![ok, failed, untouched]);
        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.total_conversions, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("rename failed"));
        assert!(summary.has_errors());
    }
}
