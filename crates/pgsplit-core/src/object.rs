//! The unit of work: one database object cut out of the dump

use serde::Serialize;

/// Schema sentinel for cluster-wide objects
pub const NO_SCHEMA: &str = "-";

/// Object type names as they appear in dump markers
pub mod obj_type {
    pub const ACL: &str = "ACL";
    pub const COMMENT: &str = "COMMENT";
    pub const CONSTRAINT: &str = "CONSTRAINT";
    pub const DATABASE: &str = "DATABASE";
    pub const DATABASE_PROPERTIES: &str = "DATABASE PROPERTIES";
    pub const DEFAULT: &str = "DEFAULT";
    pub const DEFAULT_ACL: &str = "DEFAULT ACL";
    pub const FK_CONSTRAINT: &str = "FK CONSTRAINT";
    pub const FUNCTION: &str = "FUNCTION";
    pub const INDEX: &str = "INDEX";
    pub const PUBLICATION: &str = "PUBLICATION";
    pub const PUBLICATION_TABLE: &str = "PUBLICATION TABLE";
    pub const ROLE: &str = "ROLE";
    pub const SCHEMA: &str = "SCHEMA";
    pub const SEQUENCE: &str = "SEQUENCE";
    pub const SEQUENCE_OWNED_BY: &str = "SEQUENCE OWNED BY";
    pub const SEQUENCE_SET: &str = "SEQUENCE SET";
    pub const TABLE: &str = "TABLE";
    pub const TABLE_DATA: &str = "TABLE DATA";
    pub const TRIGGER: &str = "TRIGGER";
    pub const COLUMN: &str = "COLUMN";
}

/// A database object collected from the dump
///
/// `obj_subtype` and `obj_sub_name` stay empty until the object has gone
/// through [`crate::normalize::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbObject {
    pub schema: String,
    pub name: String,
    pub obj_type: String,
    pub obj_subtype: String,
    pub obj_sub_name: String,
    #[serde(skip)]
    pub content: String,
    /// Connected database, empty for cluster-level objects
    pub database: String,
}

impl DbObject {
    pub fn new(
        obj_type: impl Into<String>,
        name: impl Into<String>,
        schema: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            obj_type: obj_type.into(),
            name: name.into(),
            schema: schema.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Role section of a cluster dump (`Roles`, `Role memberships`, ...)
    pub fn role(label: impl Into<String>, database: impl Into<String>) -> Self {
        Self::new(obj_type::ROLE, label, NO_SCHEMA, database)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Row data is never buffered
    pub fn is_table_data(&self) -> bool {
        self.obj_type == obj_type::TABLE_DATA
    }

    pub fn is_function(&self) -> bool {
        self.obj_type == obj_type::FUNCTION || self.obj_subtype == obj_type::FUNCTION
    }

    pub fn has_subtype(&self) -> bool {
        !self.obj_subtype.is_empty()
    }

    pub fn append_line(&mut self, line: &str) {
        self.content.push_str(line);
    }
}
