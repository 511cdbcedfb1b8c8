//! pgsplit Common Library
//!
//! Shared plumbing used by every pgsplit workspace member:
//!
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **File system**: the small set of primitives the splitter needs
//!   (create a file with its parents, append, recursive copy, recursive wipe)
//!
//! # Example
//!
//! ```no_run
//! use pgsplit_common::fs::create_file;
//! use pgsplit_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     let created = create_file("structure/public/table/users.sql")?;
//!     tracing::info!(created, "Destination ready");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod fs;
pub mod logging;

pub use logging::{init_logging, LogConfig, LoggingGuard};
