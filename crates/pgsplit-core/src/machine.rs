//! Stream state machine
//!
//! Walks the dump one line at a time and holds at most one live object.
//! Every marker line flushes that object to the [`ObjectStore`] before
//! anything else happens, so the store always sees complete objects in
//! dump order.
//!
//! ```text
//!   Cluster ──(-- Databases | -- PostgreSQL database dump)──> Database
//! ```
//!
//! There is no way back from the database phase.

use crate::classify::{Boundary, LineKind, Phase};
use crate::config::SplitConfig;
use crate::error::Result;
use crate::layout::Layout;
use crate::object::{obj_type, DbObject};
use crate::patterns::PatternSet;
use crate::reader::DumpReader;
use crate::relocate;
use crate::store::{ObjectStore, SaveOutcome};
use serde::Serialize;
use std::io::BufRead;
use tracing::{debug, info, trace};

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines: u64,
    pub bytes: u64,
    pub objects_written: u64,
    pub objects_skipped: u64,
    pub files_created: u64,
    pub docs_extracted: u64,
    /// Databases connected to, in dump order
    pub databases: Vec<String>,
    pub relocations: u64,
}

/// Line-driven splitter state
#[derive(Debug)]
pub struct Splitter<'a> {
    patterns: &'a PatternSet,
    store: ObjectStore<'a>,
    relocate_roles: bool,
    phase: Phase,
    dbname: String,
    db_enabled: bool,
    /// Roles of the current database were already relocated
    relocated: bool,
    current: Option<DbObject>,
    summary: RunSummary,
}

impl<'a> Splitter<'a> {
    pub fn new(config: &SplitConfig, patterns: &'a PatternSet) -> Self {
        Self {
            patterns,
            store: ObjectStore::new(Layout::from_config(config), patterns),
            relocate_roles: config.relocate_roles,
            phase: Phase::Cluster,
            dbname: String::new(),
            db_enabled: true,
            relocated: false,
            current: None,
            summary: RunSummary::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Currently connected database, empty before the first `\connect`
    pub fn database(&self) -> &str {
        &self.dbname
    }

    pub fn current(&self) -> Option<&DbObject> {
        self.current.as_ref()
    }

    /// Feed every line of `reader`, then flush.
    pub fn run<R: BufRead>(mut self, reader: &mut DumpReader<R>) -> Result<RunSummary> {
        while let Some(line) = reader.next_line()? {
            self.feed(&line)?;
        }
        self.finish()
    }

    /// Process one line, terminator included.
    pub fn feed(&mut self, line: &str) -> Result<()> {
        self.summary.lines += 1;
        self.summary.bytes += line.len() as u64;

        match self.patterns.classify(line, self.phase) {
            LineKind::Restrict => {
                trace!(line = self.summary.lines, "Restrict line dropped");
            },
            LineKind::Connect(database) => {
                self.flush()?;
                self.switch_database(database);
            },
            LineKind::Role(label) => {
                self.flush()?;
                trace!(label = %label, "Role section");
                self.current = Some(DbObject::role(label, self.dbname.as_str()));
            },
            LineKind::Boundary(boundary) => {
                self.flush()?;
                trace!(?boundary, "Section boundary");

                if boundary.ends_cluster_phase() && self.phase == Phase::Cluster {
                    debug!(line = self.summary.lines, "Cluster section finished");
                    self.phase = Phase::Database;
                }

                if boundary == Boundary::DumpComplete {
                    self.relocate()?;
                }
            },
            LineKind::Object(marker) => {
                self.flush()?;

                // `CREATE DATABASE` precedes its `\connect`, it is judged by its own name
                if self.phase == Phase::Database
                    && !self.db_enabled
                    && marker.obj_type != obj_type::DATABASE
                {
                    self.summary.objects_skipped += 1;
                    return Ok(());
                }

                trace!(name = %marker.name, obj_type = %marker.obj_type, "Object marker");
                self.current = Some(marker.into_object(&self.dbname));
            },
            LineKind::Content => {
                if let Some(obj) = self.current.as_mut() {
                    if !obj.is_table_data() {
                        obj.append_line(line);
                    }
                }
            },
        }

        Ok(())
    }

    /// Flush the last object and relocate roles of a database that never
    /// reached its completion marker.
    pub fn finish(mut self) -> Result<RunSummary> {
        self.flush()?;
        self.relocate()?;
        Ok(self.summary)
    }

    fn switch_database(&mut self, database: String) {
        self.db_enabled = self.patterns.database_enabled(&database);
        self.relocated = false;

        info!(database = %database, enabled = self.db_enabled, "Connected to database");

        if !self.summary.databases.contains(&database) {
            self.summary.databases.push(database.clone());
        }
        self.dbname = database;
    }

    fn flush(&mut self) -> Result<()> {
        let Some(obj) = self.current.take() else {
            return Ok(());
        };

        match self.store.save(obj)? {
            SaveOutcome::Written { created, doc, .. } => {
                self.summary.objects_written += 1;
                if created {
                    self.summary.files_created += 1;
                }
                if doc.is_some() {
                    self.summary.docs_extracted += 1;
                }
            },
            SaveOutcome::Skipped(_) => self.summary.objects_skipped += 1,
        }

        Ok(())
    }

    fn relocate(&mut self) -> Result<()> {
        if !self.relocate_roles || self.dbname.is_empty() || self.relocated || !self.db_enabled {
            return Ok(());
        }

        relocate::relocate_roles(self.store.layout().root(), &self.dbname)?;
        self.relocated = true;
        self.summary.relocations += 1;
        Ok(())
    }
}
