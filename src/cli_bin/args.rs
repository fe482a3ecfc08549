//! Command-line argument definitions

use clap::Parser;
use headshift::{parse_excludes, ConvertConfig};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "headshift",
    version,
    about = "Convert Markdown H1 headings to H2 headings in an Obsidian vault",
    long_about = "headshift scans a vault for Markdown files and demotes every level-1 \
                  heading to level 2. Front matter, fenced code blocks, hashtags and \
                  deeper headings are left alone.",
    after_help = "Safety:\n  \
                  - Dry run is the default. Use --write to modify files.\n  \
                  - Backups are created in <vault>/_backups/ with timestamps.\n  \
                  - Files are written atomically (temp file, then rename)."
)]
pub struct Cli {
    /// Path to the vault root
    pub vault_path: PathBuf,

    /// Preview changes without modifying files (default)
    #[arg(long)]
    pub dry_run: bool,

    /// Actually modify files; takes precedence over --dry-run
    #[arg(long)]
    pub write: bool,

    /// Create backups before modifying (default)
    #[arg(long)]
    pub backup: bool,

    /// Skip creating backups before modifying; takes precedence over --backup
    #[arg(long)]
    pub no_backup: bool,

    /// Comma-separated folder names to exclude
    #[arg(long, value_name = "FOLDERS", env = "HEADSHIFT_EXCLUDE")]
    pub exclude: Option<String>,

    /// Print per-file details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConvertConfig {
        ConvertConfig::new(&self.vault_path)
            .with_dry_run(!self.write)
            .with_backups(!self.no_backup)
            .with_excludes(self.exclude.as_deref().map(parse_excludes).unwrap_or_default())
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
