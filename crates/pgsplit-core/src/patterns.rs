//! Compiled patterns shared by the classifier, the filters and the store
//!
//! Everything is compiled once, before the first line is read, so a bad
//! user pattern is reported as a configuration error and never surfaces in
//! the middle of a stream.

use crate::config::{non_empty, SplitConfig};
use crate::error::{PatternKind, Result, SplitError};
use crate::object::{obj_type, DbObject, NO_SCHEMA};
use regex::Regex;

const CONNECT: &str = r#"^\\connect(?: -reuse-previous=on)? (?:"dbname='(?P<quoted>.*?)'"|(?P<plain>.*))$"#;
const SECTIONS: &str = r"^-- (User Configurations|Databases)\s*$";
const DUMP: &str = r"^-- PostgreSQL database dump\s*(complete)?\s*$";
const ROLES: &str = r#"^-- (?:(?P<section>Roles|Role memberships)\s*|(?P<config>User Config) ".*"\s*)$"#;
const OBJECT: &str =
    r"^-- (?P<data>Data for )?Name: (?P<name>.*); Type: (?P<type>[^;]*); Schema: (?P<schema>[^;]*)(?:;|$)";
const SUBTYPE: &str = r"^(?P<subtype>[A-Z ]+) (?P<name>.*)$";
const INDEX_OWNER: &str = r#" ON (?:ONLY )?(\w+|"[^"]+")\.(\w+|"[^"]+")"#;
const RESTRICT_ANY: &str = r"^\\(un)?restrict ";

/// Parser context for one run
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub(crate) connect: Regex,
    pub(crate) sections: Regex,
    pub(crate) dump: Regex,
    pub(crate) roles: Regex,
    pub(crate) object: Regex,
    pub(crate) subtype: Regex,
    pub(crate) index_owner: Regex,
    pub(crate) restrict: Regex,
    exclude_db: Option<Regex>,
    whitelist_db: Option<Regex>,
    exclude_objects: Option<Regex>,
    documentation: Option<Regex>,
}

fn builtin(pattern: &str) -> Result<Regex> {
    compile(PatternKind::Builtin, pattern)
}

fn compile(kind: PatternKind, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| SplitError::InvalidPattern {
        kind,
        pattern: pattern.to_string(),
        source,
    })
}

fn optional(kind: PatternKind, pattern: &Option<String>) -> Result<Option<Regex>> {
    non_empty(pattern).map(|p| compile(kind, p)).transpose()
}

impl PatternSet {
    /// Compile the fixed marker patterns together with the user patterns in
    /// `config`.
    pub fn compile(config: &SplitConfig) -> Result<Self> {
        let restrict = match non_empty(&config.restrict) {
            Some(key) => {
                let pattern = format!(r"^\\(un)?restrict {key}[\n\r]*$");
                Regex::new(&pattern).map_err(|source| SplitError::InvalidPattern {
                    kind: PatternKind::Restrict,
                    pattern: key.to_string(),
                    source,
                })?
            },
            None => builtin(RESTRICT_ANY)?,
        };

        let documentation = match non_empty(&config.doc_pattern) {
            Some(pattern) => Some(
                Regex::new(&format!("(?s){pattern}")).map_err(|source| {
                    SplitError::InvalidPattern {
                        kind: PatternKind::Documentation,
                        pattern: pattern.to_string(),
                        source,
                    }
                })?,
            ),
            None => None,
        };

        Ok(Self {
            connect: builtin(CONNECT)?,
            sections: builtin(SECTIONS)?,
            dump: builtin(DUMP)?,
            roles: builtin(ROLES)?,
            object: builtin(OBJECT)?,
            subtype: builtin(SUBTYPE)?,
            index_owner: builtin(INDEX_OWNER)?,
            restrict,
            exclude_db: optional(PatternKind::ExcludeDatabases, &config.exclude_db)?,
            whitelist_db: optional(PatternKind::WhitelistDatabases, &config.whitelist_db)?,
            exclude_objects: optional(PatternKind::ExcludeObjects, &config.exclude_objects)?,
            documentation,
        })
    }

    /// Whether objects of database `name` are processed.
    ///
    /// A whitelist, when present, is the only criterion; otherwise the
    /// exclusion pattern applies.
    pub fn database_enabled(&self, name: &str) -> bool {
        if let Some(ref whitelist) = self.whitelist_db {
            return whitelist.is_match(name);
        }

        match self.exclude_db {
            Some(ref exclude) => !exclude.is_match(name),
            None => true,
        }
    }

    /// Database filter applied to a single object.
    ///
    /// `DATABASE` objects are judged by the database they create, cluster
    /// objects always pass.
    pub fn database_allowed(&self, obj: &DbObject) -> bool {
        if obj.obj_type == obj_type::DATABASE {
            return self.database_enabled(&obj.name);
        }

        if obj.database.is_empty() || obj.database == NO_SCHEMA {
            return true;
        }

        self.database_enabled(&obj.database)
    }

    /// Object-type filter. Subtypes are checked too, so it is meant for
    /// normalized objects.
    pub fn type_allowed(&self, obj: &DbObject) -> bool {
        match self.exclude_objects {
            Some(ref exclude) => {
                !(exclude.is_match(&obj.obj_type)
                    || (obj.has_subtype() && exclude.is_match(&obj.obj_subtype)))
            },
            None => true,
        }
    }

    /// Combined filter decided when an object is flushed
    pub fn object_allowed(&self, obj: &DbObject) -> bool {
        self.type_allowed(obj) && self.database_allowed(obj)
    }

    pub fn documentation(&self) -> Option<&Regex> {
        self.documentation.as_ref()
    }
}
