//! CLI command handler that bridges arguments to the conversion pipeline
//! and renders the report.

use crate::cli_bin::args::Cli;
use anyhow::Result;
use headshift::{ConvertConfig, Converter, FileReport, Summary};
use log::debug;

const RULE_WIDTH: usize = 60;

/// Run the conversion described by `cli` and print its report
pub fn convert_command(cli: &Cli) -> Result<Summary> {
    debug!("Executing convert command with args: {:?}", cli);

    let converter = Converter::new(cli.to_config())?;
    let config = converter.config();
    let human = !cli.json && !cli.quiet;

    if human {
        print_banner(config);
    }

    let summary = converter.run_with(|report| {
        if human && cli.verbose {
            print_file_report(report);
        }
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if human {
        print_summary(config, &summary);
    } else {
        for error in &summary.errors {
            eprintln!("{}", error);
        }
    }

    Ok(summary)
}

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

fn print_banner(config: &ConvertConfig) {
    println!("{}", rule('='));
    println!("Obsidian H1 -> H2 Converter");
    println!("{}", rule('='));
    println!("Vault path: {}", config.vault_root.display());
    if config.dry_run {
        println!("Mode: DRY RUN (no files will be modified)");
    } else {
        println!("Mode: WRITE MODE");
        println!(
            "Backups: {}",
            if config.backup_enabled { "Enabled" } else { "Disabled" }
        );
    }
    if !config.excludes.is_empty() {
        let excludes: Vec<&str> = config.excludes.iter().map(String::as_str).collect();
        println!("Extra excludes: {}", excludes.join(", "));
    }
    println!("{}\n", rule('='));
}

fn print_file_report(report: &FileReport) {
    if let Some(error) = &report.error {
        println!("  {}: ERROR {}", report.relative_path.display(), error);
        return;
    }
    if report.conversions.is_empty() {
        return;
    }

    println!(
        "  {}: {} H1 heading(s) found",
        report.relative_path.display(),
        report.conversions.len()
    );
    for conversion in &report.conversions {
        println!("    L{}: {}", conversion.line_number, conversion.original);
    }
    if let Some(name) = report.backup_path.as_ref().and_then(|p| p.file_name()) {
        println!("    Backup created: {}", name.to_string_lossy());
    }
}

fn print_summary(config: &ConvertConfig, summary: &Summary) {
    println!("\n{}", rule('='));
    println!("SUMMARY");
    println!("{}", rule('='));
    println!("Files scanned:      {}", summary.files_scanned);
    println!("Files with H1s:     {}", summary.files_changed);
    println!("Total H1 headings:  {}", summary.total_conversions);

    if summary.files_changed == 0 {
        println!("\nNo H1 headings found. No changes needed.");
    } else if config.dry_run {
        println!("\nDRY RUN: No files were modified.");
        println!("   Run with --write to apply changes.");
    } else {
        println!("\n{} file(s) modified.", summary.files_changed);
        if config.backup_enabled {
            println!("   Backups saved to: {}", config.backup_root().display());
        }
    }

    if summary.has_errors() {
        println!("\nErrors ({}):", summary.errors.len());
        for error in &summary.errors {
            println!("   - {}", error);
        }
    }
    println!("{}\n", rule('='));
}
