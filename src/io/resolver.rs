//! Vault traversal
//!
//! Walks a vault and collects the Markdown files to scan, pruning hidden
//! entries, tool folders, the backup folder and any user-excluded folder
//! names before descending into them.

use crate::error::{HeadshiftError, Result};
use crate::io::writer::DEFAULT_BACKUP_DIR;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Folder names that are never scanned
pub const DEFAULT_EXCLUDES: [&str; 5] = [".obsidian", ".git", ".trash", "node_modules", ".DS_Store"];

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Extra folder names to skip anywhere in the tree
    pub excludes: BTreeSet<String>,
    /// Name of the backup folder at the vault root, always skipped
    pub backup_dir_name: String,
    /// Include hidden files and folders (starting with .)
    pub include_hidden: bool,
    /// Follow symbolic links
    pub follow_links: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            excludes: BTreeSet::new(),
            backup_dir_name: DEFAULT_BACKUP_DIR.to_string(),
            include_hidden: false,
            follow_links: false,
        }
    }
}

/// Finds the Markdown files of a vault
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Sorted list of `.md` files under `vault_root`
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn resolve<P: AsRef<Path>>(&self, vault_root: P) -> Result<Vec<PathBuf>> {
        let vault_root = vault_root.as_ref();
        if !vault_root.is_dir() {
            return Err(HeadshiftError::invalid_vault(vault_root, "not a directory"));
        }

        let walker = WalkDir::new(vault_root)
            .follow_links(self.config.follow_links)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Resolved {} markdown file(s) in {}", files.len(), vault_root.display());
        Ok(files)
    }

    /// Whether an entry (file or folder) is pruned from the walk
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };

        if !self.config.include_hidden && name.starts_with('.') {
            return true;
        }

        if !entry.file_type().is_dir() {
            return false;
        }

        // `<vault>/<backup_dir_name>` only, not nested folders sharing its name
        let is_backup_root = entry.depth() == 1 && name == self.config.backup_dir_name;

        DEFAULT_EXCLUDES.contains(&name) || is_backup_root || self.config.excludes.contains(name)
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the `.md` extension is processed
pub fn is_markdown(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_vault(dir: &Path) -> std::io::Result<()> {
        fs::write(dir.join("index.md"), "# Index")?;
        fs::write(dir.join("notes.txt"), "# Not markdown")?;
        fs::write(dir.join(".hidden.md"), "# Hidden")?;

        for folder in ["daily", "drafts", ".obsidian", "node_modules", "_backups", ".secret"] {
            fs::create_dir(dir.join(folder))?;
            fs::write(dir.join(folder).join("note.md"), "# Note")?;
        }
        fs::create_dir(dir.join("daily").join("2024"))?;
        fs::write(dir.join("daily").join("2024").join("jan.md"), "# Jan")?;

        Ok(())
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_resolve_vault() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let files = FileResolver::new().resolve(temp_dir.path()).unwrap();

        assert_eq!(
            relative(temp_dir.path(), &files),
            vec!["daily/2024/jan.md", "daily/note.md", "drafts/note.md", "index.md"]
        );
    }

    #[test]
    fn test_extra_excludes() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let config = ResolverConfig {
            excludes: ["drafts".to_string(), "2024".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let files = FileResolver::with_config(config)
            .resolve(temp_dir.path())
            .unwrap();

        assert_eq!(
            relative(temp_dir.path(), &files),
            vec!["daily/note.md", "index.md"]
        );
    }

    #[test]
    fn test_custom_backup_dir_name() {
        let temp_dir = TempDir::new().unwrap();
        create_vault(temp_dir.path()).unwrap();

        let config = ResolverConfig {
            backup_dir_name: "daily".to_string(),
            ..Default::default()
        };
        let files = FileResolver::with_config(config)
            .resolve(temp_dir.path())
            .unwrap();

        let names = relative(temp_dir.path(), &files);
        assert!(names.contains(&"_backups/note.md".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("daily/")));
    }

    #[test]
    fn test_nested_backup_named_folder_is_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("projects").join("_backups")).unwrap();
        fs::write(root.join("projects").join("_backups").join("plan.md"), "# Plan").unwrap();
        fs::create_dir(root.join("_backups")).unwrap();
        fs::write(root.join("_backups").join("old.md"), "# Old").unwrap();

        let files = FileResolver::new().resolve(root).unwrap();

        assert_eq!(relative(root, &files), vec!["projects/_backups/plan.md"]);
    }

    #[test]
    fn test_hidden_vault_root_is_walked() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".vault");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.md"), "# A").unwrap();

        let files = FileResolver::new().resolve(&root).unwrap();
        assert_eq!(files, vec![root.join("a.md")]);
    }

    #[test]
    fn test_resolve_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.md");
        fs::write(&file, "# A").unwrap();

        let err = FileResolver::new().resolve(&file).unwrap_err();
        assert!(matches!(err, HeadshiftError::InvalidVault { .. }));
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("a.md")));
        assert!(!is_markdown(Path::new("a.markdown")));
        assert!(!is_markdown(Path::new("a.txt")));
        assert!(!is_markdown(Path::new("md")));
    }
}
