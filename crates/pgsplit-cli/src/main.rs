//! pgsplit CLI - Main entry point

use clap::{CommandFactory, Parser};
use pgsplit_cli::Cli;
use pgsplit_common::logging::init_logging;
use std::process;
use tracing::error;

fn main() {
    // Bare invocation from a terminal has no dump to read
    if std::env::args_os().len() == 1 && atty::is(atty::Stream::Stdin) {
        let _ = Cli::command().print_help();
        process::exit(2);
    }

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Flags are applied after the PGSPLIT_LOG* variables
    let log_config = pgsplit_cli::log_config(&cli);

    // The split works without logging, so a failed init is not fatal
    let guard = init_logging(&log_config).ok();

    if let Err(e) = pgsplit_cli::run(&cli) {
        error!(error = %e, "Split failed");
        eprintln!("Error: {}", e);
        drop(guard);
        process::exit(1);
    }
}
