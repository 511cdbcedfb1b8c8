//! Line classifier
//!
//! Recognises the comment markers `pg_dump` and `pg_dumpall` put between
//! objects. Each recogniser decodes its match into a small typed value; the
//! state machine only ever sees [`LineKind`].

use crate::object::{DbObject, NO_SCHEMA};
use crate::patterns::PatternSet;

/// Cluster dump or per-database dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Cluster,
    Database,
}

/// Section boundaries that close the current object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `-- PostgreSQL database dump complete`
    DumpComplete,
    /// `-- User Configurations`
    UserConfigurations,
    /// `-- Databases`
    Databases,
    /// `-- PostgreSQL database dump`
    DumpStart,
}

impl Boundary {
    /// Numeric form: `0`/`1` stay in the cluster phase, `2` leaves it.
    pub fn code(self) -> i8 {
        match self {
            Boundary::DumpComplete => 0,
            Boundary::UserConfigurations => 1,
            Boundary::Databases | Boundary::DumpStart => 2,
        }
    }

    pub fn ends_cluster_phase(self) -> bool {
        self.code() == 2
    }
}

/// Decoded `-- [Data for ]Name: ...; Type: ...; Schema: ...;` marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMarker {
    pub name: String,
    pub obj_type: String,
    pub schema: String,
    /// The marker announced row data (`Data for`)
    pub data: bool,
}

impl ObjectMarker {
    pub fn into_object(self, database: &str) -> DbObject {
        DbObject::new(self.obj_type, self.name, self.schema, database)
    }
}

/// What a single dump line means to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `\restrict` / `\unrestrict`, dropped
    Restrict,
    /// `\connect <db>`
    Connect(String),
    /// Role section label
    Role(String),
    Boundary(Boundary),
    Object(ObjectMarker),
    /// Anything else belongs to the current object
    Content,
}

/// Strip a pair of double quotes wrapping the whole identifier
pub(crate) fn unquote(value: &str) -> &str {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) if !inner.contains('"') => inner,
        _ => value,
    }
}

impl PatternSet {
    /// Classify one dump line. `line` may still carry its terminator.
    pub fn classify(&self, line: &str, phase: Phase) -> LineKind {
        let line = line.trim_end_matches(['\n', '\r']);

        if self.is_restrict(line) {
            return LineKind::Restrict;
        }

        if let Some(db) = self.connect_database(line) {
            return LineKind::Connect(db);
        }

        if phase == Phase::Cluster {
            if let Some(label) = self.role_marker(line) {
                return LineKind::Role(label);
            }
        }

        if let Some(boundary) = self.boundary(line) {
            return LineKind::Boundary(boundary);
        }

        if let Some(marker) = self.object_marker(line) {
            return LineKind::Object(marker);
        }

        LineKind::Content
    }

    pub fn is_restrict(&self, line: &str) -> bool {
        self.restrict.is_match(line)
    }

    /// Database named by a `\connect` line
    pub fn connect_database(&self, line: &str) -> Option<String> {
        let caps = self.connect.captures(line)?;

        let name = match caps.name("quoted") {
            Some(quoted) => quoted.as_str(),
            None => unquote(caps.name("plain")?.as_str().trim()),
        };

        if name.is_empty() {
            return None;
        }

        Some(name.to_string())
    }

    pub fn boundary(&self, line: &str) -> Option<Boundary> {
        if let Some(caps) = self.dump.captures(line) {
            return Some(match caps.get(1) {
                Some(_) => Boundary::DumpComplete,
                None => Boundary::DumpStart,
            });
        }

        let caps = self.sections.captures(line)?;
        match caps.get(1).map(|m| m.as_str()) {
            Some("Databases") => Some(Boundary::Databases),
            Some(_) => Some(Boundary::UserConfigurations),
            None => None,
        }
    }

    /// Label of a role section header
    pub fn role_marker(&self, line: &str) -> Option<String> {
        let caps = self.roles.captures(line)?;

        caps.name("section")
            .or_else(|| caps.name("config"))
            .map(|m| m.as_str().to_string())
    }

    pub fn object_marker(&self, line: &str) -> Option<ObjectMarker> {
        let caps = self.object.captures(line)?;

        let schema = unquote(caps.name("schema")?.as_str().trim());

        Some(ObjectMarker {
            name: unquote(caps.name("name")?.as_str()).to_string(),
            obj_type: caps.name("type")?.as_str().trim().to_string(),
            schema: if schema.is_empty() {
                NO_SCHEMA.to_string()
            } else {
                schema.to_string()
            },
            data: caps.name("data").is_some(),
        })
    }
}
