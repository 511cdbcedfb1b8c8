//! Run configuration for the splitter
//!
//! [`SplitConfig`] is plain data. It is deserialisable so the CLI can load it
//! from a TOML file before applying command-line overrides; the compiled
//! form used while streaming is [`crate::patterns::PatternSet`].

use crate::error::SplitError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Defaults
// ============================================================================

/// Default destination directory.
pub const DEFAULT_DEST: &str = "structure";

/// Databases skipped unless a whitelist says otherwise.
pub const DEFAULT_EXCLUDE_DB: &str = "^(template|postgres)";

/// Paired comment block holding function documentation.
pub const DEFAULT_DOC_PATTERN: &str = r"/\*DOCU(.*)DOCU\*/";

/// Longest line accepted from the dump, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// How objects are laid out below the destination directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Keep the dump's own type names as directories
    Origin,
    /// Lower-case directories, related objects grouped into one file
    #[default]
    Custom,
}

impl LayoutMode {
    pub fn is_custom(self) -> bool {
        self == LayoutMode::Custom
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = SplitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "origin" => Ok(LayoutMode::Origin),
            "custom" | "" => Ok(LayoutMode::Custom),
            other => Err(SplitError::InvalidMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::Origin => write!(f, "origin"),
            LayoutMode::Custom => write!(f, "custom"),
        }
    }
}

/// Splitter run parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Layout policy
    pub mode: LayoutMode,

    /// Destination root directory
    pub dest: PathBuf,

    /// Prefix paths with the database name. Turning this off is only safe
    /// when the dump holds a single database.
    pub db_in_path: bool,

    /// Databases matching this pattern are skipped
    pub exclude_db: Option<String>,

    /// If set, only databases matching this pattern are processed
    pub whitelist_db: Option<String>,

    /// Objects whose type or subtype matches this pattern are skipped
    pub exclude_objects: Option<String>,

    /// Copy the cluster role files into every database directory
    pub relocate_roles: bool,

    /// Pattern capturing function documentation (first group)
    pub doc_pattern: Option<String>,

    /// Key used by `\restrict` / `\unrestrict` lines
    pub restrict: Option<String>,

    /// Maximum line length in bytes
    pub buffer_size: usize,

    /// Wipe the destination before writing
    pub clean: bool,

    /// Custom mode only: write grants to `<name>.acl.sql` siblings
    pub acl_files: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Custom,
            dest: PathBuf::from(DEFAULT_DEST),
            db_in_path: true,
            exclude_db: Some(DEFAULT_EXCLUDE_DB.to_string()),
            whitelist_db: None,
            exclude_objects: None,
            relocate_roles: false,
            doc_pattern: Some(DEFAULT_DOC_PATTERN.to_string()),
            restrict: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            clean: false,
            acl_files: false,
        }
    }
}

impl SplitConfig {
    /// Config writing below `dest`, defaults otherwise
    pub fn with_dest(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            ..Self::default()
        }
    }
}

/// Treat empty strings as "not set"
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
