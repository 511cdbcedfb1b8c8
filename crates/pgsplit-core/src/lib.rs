//! pgsplit core
//!
//! Splits the plain-text output of `pg_dump` / `pg_dumpall` into one file
//! per database object.
//!
//! # Pipeline
//!
//! ```text
//! line ─> classify ─> Splitter ─> normalize ─> Layout::resolve ─> append
//!                                                              └─> docs (.md)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pgsplit_core::{split_dump, SplitConfig};
//! use std::io::BufReader;
//!
//! let config = SplitConfig::with_dest("structure");
//! let dump = BufReader::new(std::fs::File::open("cluster.sql")?);
//! let summary = split_dump(&config, dump)?;
//! println!("{} objects written", summary.objects_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod machine;
pub mod normalize;
pub mod object;
pub mod patterns;
pub mod reader;
pub mod relocate;
pub mod store;

pub use classify::{Boundary, LineKind, ObjectMarker, Phase};
pub use config::{LayoutMode, SplitConfig};
pub use error::{PatternKind, Result, SplitError};
pub use layout::{Layout, ObjectPaths};
pub use machine::{RunSummary, Splitter};
pub use normalize::normalize;
pub use object::DbObject;
pub use patterns::PatternSet;
pub use reader::DumpReader;
pub use store::{ObjectStore, SaveOutcome, SkipReason};

use std::io::BufRead;
use tracing::info;

/// Split a whole dump read from `input` according to `config`.
///
/// Patterns are compiled before the first line is read. Files written
/// before a failure stay on disk.
pub fn split_dump<R: BufRead>(config: &SplitConfig, input: R) -> Result<RunSummary> {
    let patterns = PatternSet::compile(config)?;

    if config.clean {
        info!(dest = %config.dest.display(), "Cleaning destination");
        pgsplit_common::fs::wipe_dir(&config.dest).map_err(|source| SplitError::Clean {
            path: config.dest.clone(),
            source,
        })?;
    }

    let mut reader = DumpReader::new(input, config.buffer_size);
    let summary = Splitter::new(config, &patterns).run(&mut reader)?;

    if config.relocate_roles {
        relocate::remove_cluster_dir(&config.dest)?;
    }

    info!(
        lines = summary.lines,
        objects = summary.objects_written,
        files = summary.files_created,
        databases = summary.databases.len(),
        "Dump split"
    );

    Ok(summary)
}
