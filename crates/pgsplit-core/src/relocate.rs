//! Role relocation
//!
//! Cluster-level objects (roles, memberships, per-role configuration) are
//! written below `<root>/-`. With relocation enabled, that directory is
//! copied into every processed database as `<root>/<database>/-`, so each
//! database subtree can be deployed on its own.

use crate::error::{Result, SplitError};
use crate::object::NO_SCHEMA;
use pgsplit_common::fs;
use std::path::Path;
use tracing::{debug, info};

/// Copy `<root>/-` into `<root>/<database>/-`.
///
/// Returns `false` when there is no cluster directory to copy.
pub fn relocate_roles(root: &Path, database: &str) -> Result<bool> {
    let from = root.join(NO_SCHEMA);
    let to = root.join(database).join(NO_SCHEMA);

    if !from.is_dir() {
        debug!(database, from = %from.display(), "No cluster objects to relocate");
        return Ok(false);
    }

    let files = fs::copy_dir(&from, &to).map_err(|source| SplitError::Relocate {
        from: from.clone(),
        to: to.clone(),
        source,
    })?;

    info!(database, files, "Relocated cluster roles");
    Ok(true)
}

/// Remove `<root>/-` once every database has its own copy.
pub fn remove_cluster_dir(root: &Path) -> Result<()> {
    let dir = root.join(NO_SCHEMA);
    if !dir.exists() {
        return Ok(());
    }

    std::fs::remove_dir_all(&dir).map_err(|source| SplitError::Clean { path: dir, source })
}
