//! Error types for the pgsplit CLI
//!
//! Every variant is user-facing: the message says what went wrong and what
//! to try next.

use pgsplit_core::SplitError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// The splitter itself failed
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Configuration file cannot be read
    #[error("Cannot read config file '{}': {source}. Check the path given with --config or PGSPLIT_CONFIG.", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has unknown keys
    #[error("Failed to parse config file '{}': {source}. Check the file syntax and key names.", .path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No `-f` and stdin is a terminal
    #[error("No dump data piped to stdin. Pass a dump with -f FILE or pipe pg_dump/pg_dumpall output into pgsplit.")]
    NoInput,

    /// Dump file cannot be opened
    #[error("Cannot open dump '{}': {source}. Verify the file path exists and you have read permissions.", .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON report could not be rendered
    #[error("Failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn input_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputFile {
            path: path.into(),
            source,
        }
    }
}
