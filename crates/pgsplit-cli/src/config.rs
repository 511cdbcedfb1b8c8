//! Configuration loading for the CLI
//!
//! Precedence, lowest first: built-in defaults, the TOML file named by
//! `--config` (or `PGSPLIT_CONFIG`), command-line flags.
//!
//! ```toml
//! mode = "custom"
//! dest = "structure"
//! whitelist_db = "^shop"
//! relocate_roles = true
//! ```

use crate::error::{CliError, Result};
use crate::Cli;
use pgsplit_core::SplitConfig;
use std::path::Path;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "PGSPLIT_CONFIG";

/// Read a [`SplitConfig`] from a TOML file. Missing keys keep their defaults.
pub fn load_file(path: &Path) -> Result<SplitConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&text).map_err(|source| CliError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the run configuration for `cli`.
pub fn resolve(cli: &Cli) -> Result<SplitConfig> {
    let base = match cli.config {
        Some(ref path) => load_file(path)?,
        None => SplitConfig::default(),
    };

    Ok(apply_flags(base, cli))
}

/// Overlay the flags given on the command line.
pub fn apply_flags(mut config: SplitConfig, cli: &Cli) -> SplitConfig {
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(ref dst) = cli.dst {
        config.dest = dst.clone();
    }
    if let Some(ref pattern) = cli.blacklist_db {
        config.exclude_db = Some(pattern.clone());
    }
    if let Some(ref pattern) = cli.whitelist_db {
        config.whitelist_db = Some(pattern.clone());
    }
    if let Some(ref pattern) = cli.exclude_objects {
        config.exclude_objects = Some(pattern.clone());
    }
    if let Some(ref pattern) = cli.doc {
        config.doc_pattern = Some(pattern.clone());
    }
    if let Some(ref key) = cli.restrict {
        config.restrict = Some(key.clone());
    }
    if let Some(buffer) = cli.buffer {
        config.buffer_size = usize::try_from(buffer).unwrap_or(usize::MAX);
    }

    // Switches can only turn a setting on
    config.db_in_path &= !cli.ndb;
    config.relocate_roles |= cli.mc;
    config.clean |= cli.clean;
    config.acl_files |= cli.aclfiles;

    config
}
