//! pgsplit CLI Library
//!
//! Command-line front end for the dump splitter.
//!
//! # Overview
//!
//! ```text
//! pg_dumpall | pgsplit --dst structure --mc
//! pgsplit -f cluster.sql --mode origin --whitelist-db '^shop$'
//! ```
//!
//! Settings come from built-in defaults, then an optional TOML file
//! (`--config` / `PGSPLIT_CONFIG`), then command-line flags.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod input;
pub mod progress;
pub mod report;

pub use error::{CliError, Result};

use clap::Parser;
use pgsplit_common::logging::{LogConfig, LogLevel};
use pgsplit_core::{split_dump, LayoutMode, RunSummary};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// pgsplit - split pg_dump / pg_dumpall output into one file per object
#[derive(Parser, Debug, Default)]
#[command(name = "pgsplit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dump produced by pg_dump or pg_dumpall. If omitted, the dump is read from stdin
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Layout mode: `origin` keeps the dump's type names, `custom` stores related objects in one file
    #[arg(long, value_name = "MODE")]
    pub mode: Option<LayoutMode>,

    /// Destination directory [default: structure]
    #[arg(long = "dst", value_name = "DIR")]
    pub dst: Option<PathBuf>,

    /// No database name in destination paths. Unsafe when several databases are dumped at once
    #[arg(long)]
    pub ndb: bool,

    /// Skip databases matching this pattern [default: ^(template|postgres)]
    #[arg(long = "blacklist-db", value_name = "REGEX")]
    pub blacklist_db: Option<String>,

    /// Only process databases matching this pattern
    #[arg(long = "whitelist-db", value_name = "REGEX")]
    pub whitelist_db: Option<String>,

    /// Skip objects whose type (or parent type) matches this pattern
    #[arg(long = "exclude-objects", value_name = "REGEX")]
    pub exclude_objects: Option<String>,

    /// Copy cluster roles into each database subdirectory
    #[arg(long)]
    pub mc: bool,

    /// Pattern whose first group holds function documentation [default: /\*DOCU(.*)DOCU\*/]
    #[arg(long, value_name = "REGEX")]
    pub doc: Option<String>,

    /// Key of the \restrict / \unrestrict lines to drop
    #[arg(long, value_name = "KEY")]
    pub restrict: Option<String>,

    /// Maximum line length in bytes [default: 1048576]
    #[arg(long, value_name = "BYTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub buffer: Option<u64>,

    /// Wipe the destination directory before writing
    #[arg(long)]
    pub clean: bool,

    /// Custom mode only: write grants to separate `.acl.sql` files
    #[arg(long)]
    pub aclfiles: bool,

    /// No progress or summary output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// TOML file with splitter settings
    #[arg(long, env = "PGSPLIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the CLI reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Logging setup for a run: `PGSPLIT_LOG*` variables, then `-q` / `-v`.
pub fn log_config(cli: &Cli) -> LogConfig {
    let base = LogConfig::builder().level(LogLevel::Warn).build();
    let from_env = base.clone().merge_env().unwrap_or(base);
    apply_verbosity(from_env, cli)
}

/// `-q` and `-v` win over the level taken from the environment.
pub fn apply_verbosity(mut config: LogConfig, cli: &Cli) -> LogConfig {
    if cli.quiet {
        config.level = LogLevel::Error;
    } else if cli.verbose {
        config.level = LogLevel::Debug;
    }
    config
}

/// Split the dump selected by `cli` and print the report.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    let config = config::resolve(cli)?;
    let started = Instant::now();

    let input = input::open(cli.file.as_deref(), cli.quiet)?;
    info!(source = %input.description, dest = %config.dest.display(), mode = %config.mode, "Splitting dump");

    let result = split_dump(&config, input.reader);
    input.progress.finish_and_clear();
    let summary = result?;

    if cli.json {
        report::print_json(&summary, &config)?;
    } else if !cli.quiet {
        report::print_summary(&summary, &config, started.elapsed());
    }

    Ok(summary)
}
