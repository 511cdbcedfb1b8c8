//! Object store
//!
//! Persists finished objects. Each save opens its destination file in
//! append mode and closes it again, so several objects routed to the same
//! file (a table, its constraints and its grants) accumulate there,
//! separated by a blank line.

use crate::config::LayoutMode;
use crate::error::{Result, SplitError};
use crate::layout::{Layout, ObjectPaths};
use crate::normalize::normalize;
use crate::object::{obj_type, DbObject};
use crate::patterns::PatternSet;
use pgsplit_common::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Characters stripped from both ends of an object body
const PADDING: &[char] = &[' ', '-', '\n'];

/// Why an object produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing but padding was collected
    Empty,
    /// Rejected by the database or object-type filters
    Filtered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Skipped(SkipReason),
    Written {
        path: PathBuf,
        /// The file did not exist before this object
        created: bool,
        /// Documentation file written alongside a function
        doc: Option<PathBuf>,
    },
}

/// Writer for finished objects
#[derive(Debug)]
pub struct ObjectStore<'a> {
    layout: Layout,
    patterns: &'a PatternSet,
}

impl<'a> ObjectStore<'a> {
    pub fn new(layout: Layout, patterns: &'a PatternSet) -> Self {
        Self { layout, patterns }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Normalize, filter, resolve and append one object.
    pub fn save(&self, obj: DbObject) -> Result<SaveOutcome> {
        if obj.content.trim_matches(PADDING).is_empty() {
            return Ok(SaveOutcome::Skipped(SkipReason::Empty));
        }

        let obj = normalize(obj, self.mode(), self.patterns);
        if !self.patterns.object_allowed(&obj) {
            debug!(
                obj_type = %obj.obj_type,
                name = %obj.name,
                database = %obj.database,
                "Object filtered out"
            );
            return Ok(SaveOutcome::Skipped(SkipReason::Filtered));
        }

        let paths = self.layout.resolve(&obj);
        let created = self.write(&obj, &paths)?;

        debug!(
            obj_type = %obj.obj_type,
            schema = %obj.schema,
            path = %paths.full_path.display(),
            created,
            "Object written"
        );

        let doc = if obj.obj_type == obj_type::FUNCTION {
            self.extract_docs(&obj, &paths)?
        } else {
            None
        };

        Ok(SaveOutcome::Written {
            path: paths.full_path,
            created,
            doc,
        })
    }

    fn mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    fn write(&self, obj: &DbObject, paths: &ObjectPaths) -> Result<bool> {
        let path = &paths.full_path;
        let created = fs::create_file(path).map_err(|e| SplitError::write(path, e))?;

        let mut body = String::with_capacity(obj.content.len() + 2);
        if !created {
            body.push('\n');
        }
        body.push_str(obj.content.trim_matches(PADDING));
        body.push('\n');

        fs::append(path, body.as_bytes()).map_err(|e| SplitError::write(path, e))?;
        Ok(created)
    }

    /// Write the documentation block of a function file to a `.md` sibling.
    ///
    /// A missing block, or a pattern without a capture group, is not an error.
    fn extract_docs(&self, obj: &DbObject, paths: &ObjectPaths) -> Result<Option<PathBuf>> {
        let Some(pattern) = self.patterns.documentation() else {
            return Ok(None);
        };

        if pattern.captures_len() < 2 {
            warn!(pattern = %pattern, "Documentation pattern has no capture group, skipping extraction");
            return Ok(None);
        }

        let source = std::fs::read_to_string(&paths.full_path)
            .map_err(|e| SplitError::write(&paths.full_path, e))?;

        let Some(text) = pattern
            .captures(&source)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_matches(PADDING))
        else {
            return Ok(None);
        };

        let source_name = paths
            .full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let markdown = format!(
            "# {}.{}\n\n{}\n\n[Source]({})\n",
            obj.schema, obj.name, text, source_name
        );

        let doc_path = paths.doc_path();
        std::fs::write(&doc_path, markdown).map_err(|e| SplitError::write(&doc_path, e))?;
        debug!(path = %doc_path.display(), "Documentation extracted");

        Ok(Some(doc_path))
    }
}
