//! Command-line interface for the generator.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::app::generate::{GenerateOptions, Generator};
use crate::app::render::ModuleFormat;
use crate::app::scan::ScanOptions;
use crate::infra::config::Config;

#[derive(Parser, Debug)]
#[command(name = "barrelgen", author, version)]
#[command(about = "Generate a barrel module re-exporting every file matched by a glob")]
#[command(
    long_about = "Generates a module that imports every file matched by the given glob \
    patterns and exports them as one ordered array, so a directory of files can be \
    imported collectively without a hand-maintained index."
)]
pub struct Cli {
    /// Glob patterns selecting the files to aggregate
    #[arg(required_unless_present = "completions")]
    pub patterns: Vec<String>,

    /// Output dialect of the generated module
    #[arg(short, long, value_enum)]
    pub format: Option<ModuleFormat>,

    /// Prefix prepended to each emitted import path
    #[arg(short, long)]
    pub path_prefix: Option<String>,

    /// Export { path, module } records instead of bare references
    #[arg(long)]
    pub export_with_path: bool,

    /// Write the generated module here instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory the patterns are resolved against
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Match hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Skip configuration files and environment overrides
    #[arg(long)]
    pub no_config: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Parse arguments, run a generation, and print or persist the result.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "barrelgen", &mut io::stdout());
        return Ok(());
    }

    let config = if cli.no_config {
        Config::default()
    } else {
        Config::load().context("failed to load configuration")?
    };

    // Options are fully resolved, and bad format values rejected, before
    // any filesystem matching happens.
    let mut options = GenerateOptions::from_config(cli.patterns, &config)?;
    if let Some(format) = cli.format {
        options = options.with_format(format);
    }
    if let Some(path_prefix) = cli.path_prefix {
        options = options.with_path_prefix(path_prefix);
    }
    if cli.export_with_path {
        options = options.with_export_with_path(true);
    }
    if let Some(output) = cli.output {
        options = options.with_output_path(output);
    }

    let scan_options = ScanOptions {
        cwd: cli.cwd,
        include_hidden: cli.hidden || config.scan.include_hidden,
        follow_links: config.scan.follow_links,
    };

    let generator = Generator::new()?;
    let result = generator.generate(&options, &scan_options)?;

    match &result.output_path {
        Some(path) => tracing::info!(
            path = %path.display(),
            files = result.entries.len(),
            "wrote barrel module"
        ),
        None => print!("{}", result.rendered),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_declaration_is_consistent() {
        Cli::command().debug_assert();
    }
}
