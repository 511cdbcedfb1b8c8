//! Error types for the dump splitter
//!
//! Every failure is fatal to a run. Messages carry enough context (pattern,
//! line number or path) to diagnose the problem without re-running verbosely.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for splitter operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Which compiled pattern an [`SplitError::InvalidPattern`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    ExcludeDatabases,
    WhitelistDatabases,
    ExcludeObjects,
    Restrict,
    Documentation,
    /// One of the fixed marker patterns shipped with the splitter
    Builtin,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::ExcludeDatabases => write!(f, "databases exclusion"),
            PatternKind::WhitelistDatabases => write!(f, "databases whitelisting"),
            PatternKind::ExcludeObjects => write!(f, "object type exclusion"),
            PatternKind::Restrict => write!(f, "restrict key"),
            PatternKind::Documentation => write!(f, "documentation extraction"),
            PatternKind::Builtin => write!(f, "dump markers"),
        }
    }
}

/// Main error type for the splitter
#[derive(Error, Debug)]
pub enum SplitError {
    /// A user supplied regular expression does not compile
    #[error("Invalid regular expression for {kind} ('{pattern}'): {source}")]
    InvalidPattern {
        kind: PatternKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid layout mode '{0}'. Expected 'origin' or 'custom'.")]
    InvalidMode(String),

    /// A single line is longer than the configured buffer
    #[error("Line longer than the {limit} byte buffer. Fails on line: {line}. Consider setting buffer size to higher value.")]
    LineTooLong { line: u64, limit: usize },

    /// Reading the dump failed
    #[error("Failed to read dump: {source}. Fails on line: {line}. Consider setting buffer size to higher value.")]
    Stream {
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("Could not write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not copy roles from '{}' to '{}': {source}", .from.display(), .to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not clean destination '{}': {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any input line is read
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. } | Self::InvalidMode(_))
    }

    /// 1-based line number for stream errors
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::LineTooLong { line, .. } | Self::Stream { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_mentions_line_and_buffer() {
        let err = SplitError::LineTooLong {
            line: 42,
            limit: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("Fails on line: 42"));
        assert!(msg.contains("buffer size"));
        assert_eq!(err.line(), Some(42));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_write_error_mentions_path() {
        let err = SplitError::write(
            "/out/db/public/table/t.sql",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/out/db/public/table/t.sql"));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_mode_error_is_configuration() {
        assert!(SplitError::InvalidMode("flat".into()).is_configuration());
    }
}
