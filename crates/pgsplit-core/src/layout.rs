//! Destination path resolver
//!
//! Maps a normalized [`DbObject`] to the file it is appended to:
//!
//! ```text
//! <root>/[<database>/]<schema>/<type>/<name>.sql      regular objects
//! <root>/[<database>/]<schema>/<schema>.sql           schemas
//! ```
//!
//! In `origin` mode `<type>` is the dump's own type name. In `custom` mode
//! it is the lower-cased subtype (or type), so a function's grants and
//! comments end up in the function's file.

use crate::codec;
use crate::config::{LayoutMode, SplitConfig};
use crate::object::{obj_type, DbObject};
use std::path::{Path, PathBuf};

const SQL_EXT: &str = "sql";
const ACL_EXT: &str = "acl.sql";
const DEFAULT_ACL_PREFIX: &str = "DEFAULT PRIVILEGES FOR ";

/// Resolved location of one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPaths {
    /// File stem shared by the `.sql` file and a documentation sibling
    pub name_for_file: String,
    pub full_path: PathBuf,
}

impl ObjectPaths {
    /// Companion Markdown file for extracted documentation
    pub fn doc_path(&self) -> PathBuf {
        self.full_path.with_file_name(format!("{}.md", self.name_for_file))
    }
}

/// Layout policy for one run
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    mode: LayoutMode,
    db_in_path: bool,
    acl_files: bool,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, mode: LayoutMode) -> Self {
        Self {
            root: root.into(),
            mode,
            db_in_path: true,
            acl_files: false,
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            root: config.dest.clone(),
            mode: config.mode,
            db_in_path: config.db_in_path,
            acl_files: config.acl_files,
        }
    }

    pub fn db_in_path(mut self, enabled: bool) -> Self {
        self.db_in_path = enabled;
        self
    }

    pub fn acl_files(mut self, enabled: bool) -> Self {
        self.acl_files = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Resolve the destination of a normalized object.
    ///
    /// Pure: the same object always maps to the same path. With the
    /// database prefix disabled, objects of different databases may collide;
    /// keeping them apart is up to the caller.
    pub fn resolve(&self, obj: &DbObject) -> ObjectPaths {
        let mut path = self.root.clone();

        if obj.obj_type == obj_type::DATABASE {
            path.push(sanitize(&obj.name));
        } else if self.db_in_path && !obj.database.is_empty() {
            path.push(sanitize(&obj.database));
        }

        if obj.obj_type == obj_type::SCHEMA || obj.obj_subtype == obj_type::SCHEMA {
            let name_for_file = sanitize(&obj.name);
            path.push(&name_for_file);
            path.push(format!("{}.{}", name_for_file, self.extension(obj)));
            return ObjectPaths {
                name_for_file,
                full_path: path,
            };
        }

        let name_for_file = self.file_stem(obj);
        path.push(sanitize(&obj.schema));
        path.push(self.type_dir(obj));
        path.push(format!("{}.{}", name_for_file, self.extension(obj)));

        ObjectPaths {
            name_for_file,
            full_path: path,
        }
    }

    fn file_stem(&self, obj: &DbObject) -> String {
        let base = if obj.has_subtype() {
            obj.obj_sub_name.as_str()
        } else {
            obj.name.as_str()
        };

        if obj.is_function() {
            return sanitize(&codec::function_file_name(base));
        }

        if self.mode.is_custom() && obj.obj_type == obj_type::DEFAULT_ACL {
            return sanitize(base.strip_prefix(DEFAULT_ACL_PREFIX).unwrap_or(base));
        }

        sanitize(base)
    }

    fn type_dir(&self, obj: &DbObject) -> String {
        match self.mode {
            LayoutMode::Origin => sanitize(&obj.obj_type),
            LayoutMode::Custom => {
                let ty = if obj.has_subtype() {
                    obj.obj_subtype.as_str()
                } else if obj.obj_type == obj_type::SEQUENCE_OWNED_BY {
                    obj_type::SEQUENCE
                } else {
                    obj.obj_type.as_str()
                };
                sanitize(&ty.to_lowercase())
            },
        }
    }

    fn extension(&self, obj: &DbObject) -> &'static str {
        if self.mode.is_custom() && self.acl_files && obj.obj_type == obj_type::ACL {
            ACL_EXT
        } else {
            SQL_EXT
        }
    }
}

/// Keep a name inside its directory
fn sanitize(segment: &str) -> String {
    segment.replace(['/', '\\'], "_")
}
