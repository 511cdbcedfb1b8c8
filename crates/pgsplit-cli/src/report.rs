//! Run report printed to stdout

use crate::error::Result;
use crate::progress::format_bytes;
use colored::Colorize;
use pgsplit_core::{LayoutMode, RunSummary, SplitConfig};
use serde::Serialize;
use std::time::Duration;

/// JSON form of the report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub dest: String,
    pub mode: LayoutMode,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &'a RunSummary, config: &SplitConfig) -> Self {
        Self {
            dest: config.dest.display().to_string(),
            mode: config.mode,
            summary,
        }
    }
}

pub fn render_json(summary: &RunSummary, config: &SplitConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(summary, config))?)
}

pub fn print_json(summary: &RunSummary, config: &SplitConfig) -> Result<()> {
    println!("{}", render_json(summary, config)?);
    Ok(())
}

pub fn print_summary(summary: &RunSummary, config: &SplitConfig, elapsed: Duration) {
    println!("{}", "Finished".green().bold());
    println!();
    println!("{}", "Summary:".cyan().bold());
    println!("  Destination:     {} ({})", config.dest.display(), config.mode);
    println!("  Lines read:      {}", summary.lines);
    println!("  Input size:      {}", format_bytes(summary.bytes));
    println!("  Objects written: {}", summary.objects_written);
    println!("  Objects skipped: {}", summary.objects_skipped);
    println!("  Files created:   {}", summary.files_created);

    if summary.docs_extracted > 0 {
        println!("  Docs extracted:  {}", summary.docs_extracted);
    }
    if config.relocate_roles {
        println!("  Roles relocated: {}", summary.relocations);
    }

    if !summary.databases.is_empty() {
        println!("  Databases:       {}", summary.databases.join(", "));
    }
    println!("  Elapsed:         {:.2?}", elapsed);
}
