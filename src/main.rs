mod cli_bin;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use cli_bin::{args::Cli, commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let summary = commands::convert_command(&cli)?;

    Ok(if summary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
