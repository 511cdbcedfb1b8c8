//! Integration tests driving whole dumps through `split_dump`
//!
//! The fixture is a small `pg_dumpall` output with cluster roles, an
//! excluded `template1` database and a `shop` database holding a schema,
//! a documented function, a table with data, a constraint, an index and
//! grants.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pgsplit_core::{split_dump, LayoutMode, SplitConfig, SplitError};
use std::fs::{read_to_string, write};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

const CLUSTER: &str = include_str!("fixtures/cluster.sql");

/// md5("text") prefix, the stripped argument list of `greet(who text)`
const GREET: &str = "greet-1cb251";

fn split(config: &SplitConfig) -> pgsplit_core::RunSummary {
    split_dump(config, Cursor::new(CLUSTER)).unwrap()
}

fn read(root: &Path, relative: &str) -> String {
    read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("{relative}: {e}"))
}

// ============================================================================
// Custom Layout
// ============================================================================

#[test]
fn test_custom_layout_groups_related_objects() {
    let dir = TempDir::new().unwrap();
    let summary = split(&SplitConfig::with_dest(dir.path()));
    let root = dir.path();

    assert_eq!(
        read(root, "shop/sales/table/orders.sql"),
        "CREATE TABLE sales.orders (\n    id integer NOT NULL,\n    total numeric\n);\n\n\n\
         ALTER TABLE sales.orders OWNER TO app;\n\
         \n\
         ALTER TABLE ONLY sales.orders\n    ADD CONSTRAINT orders_pkey PRIMARY KEY (id);\n\
         \n\
         CREATE INDEX orders_total_idx ON sales.orders USING btree (total);\n\
         \n\
         GRANT SELECT ON TABLE sales.orders TO PUBLIC;\n"
    );

    let function = read(root, &format!("shop/sales/function/{GREET}.sql"));
    assert!(function.starts_with("CREATE FUNCTION sales.greet(who text) RETURNS text\n"));
    assert!(function.ends_with("\nGRANT ALL ON FUNCTION sales.greet(who text) TO PUBLIC;\n"));

    assert_eq!(
        read(root, "shop/sales/sales.sql"),
        "CREATE SCHEMA sales;\n\n\nALTER SCHEMA sales OWNER TO app;\n"
    );
    assert_eq!(
        read(root, "shop/-/database/shop.sql"),
        "CREATE DATABASE shop WITH TEMPLATE = template0 ENCODING = 'UTF8';\n\n\nALTER DATABASE shop OWNER TO app;\n"
    );

    assert_eq!(summary.objects_written, 10);
    assert_eq!(summary.files_created, 6);
    assert_eq!(summary.objects_skipped, 2);
    assert_eq!(summary.docs_extracted, 1);
    assert_eq!(summary.databases, vec!["template1".to_string(), "shop".to_string()]);
    assert_eq!(summary.bytes, CLUSTER.len() as u64);
    assert_eq!(summary.lines, CLUSTER.lines().count() as u64);
}

#[test]
fn test_cluster_roles_written_below_dash() {
    let dir = TempDir::new().unwrap();
    split(&SplitConfig::with_dest(dir.path()));

    assert_eq!(
        read(dir.path(), "-/role/Roles.sql"),
        "CREATE ROLE app;\n\
         ALTER ROLE app WITH NOSUPERUSER INHERIT NOCREATEROLE NOCREATEDB LOGIN NOREPLICATION NOBYPASSRLS;\n"
    );
    assert_eq!(
        read(dir.path(), "-/role/User Config.sql"),
        "ALTER ROLE app SET search_path TO 'sales', 'public';\n"
    );
}

#[test]
fn test_documentation_extracted_next_to_function() {
    let dir = TempDir::new().unwrap();
    split(&SplitConfig::with_dest(dir.path()));

    assert_eq!(
        read(dir.path(), &format!("shop/sales/function/{GREET}.md")),
        format!("# sales.greet(text)\n\nGreets `who`.\n\n[Source]({GREET}.sql)\n")
    );
}

#[test]
fn test_restrict_lines_and_table_data_are_dropped() {
    let dir = TempDir::new().unwrap();
    split(&SplitConfig::with_dest(dir.path()));

    for entry in walk(dir.path()) {
        let content = read_to_string(&entry).unwrap();
        assert!(!content.contains("\\restrict"), "{}", entry.display());
        assert!(!content.contains("COPY sales.orders"), "{}", entry.display());
    }
}

// ============================================================================
// Origin Layout
// ============================================================================

#[test]
fn test_origin_layout_keeps_dump_types() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        mode: LayoutMode::Origin,
        ..SplitConfig::with_dest(dir.path())
    };
    split(&config);
    let root = dir.path();

    assert!(root.join("-/ROLE/Roles.sql").is_file());
    assert!(root.join("shop/sales/TABLE/orders.sql").is_file());
    assert!(root.join("shop/sales/CONSTRAINT/orders.sql").is_file());
    assert!(root.join("shop/sales/INDEX/orders.sql").is_file());
    assert!(root.join(format!("shop/sales/FUNCTION/{GREET}.sql")).is_file());
    assert_eq!(
        read(root, &format!("shop/sales/ACL/{GREET}.sql")),
        "GRANT ALL ON FUNCTION sales.greet(who text) TO PUBLIC;\n"
    );
    assert_eq!(
        read(root, "shop/sales/ACL/orders.sql"),
        "GRANT SELECT ON TABLE sales.orders TO PUBLIC;\n"
    );
}

// ============================================================================
// Database Filters
// ============================================================================

#[test]
fn test_default_filter_skips_template_databases() {
    let dir = TempDir::new().unwrap();
    split(&SplitConfig::with_dest(dir.path()));
    assert!(!dir.path().join("template1").exists());
}

#[test]
fn test_exclude_pattern_removes_database() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        exclude_db: Some("^shop$".into()),
        ..SplitConfig::with_dest(dir.path())
    };
    split(&config);

    assert!(!dir.path().join("shop").exists());
    assert!(dir.path().join("template1/public/table/t1_private.sql").is_file());
}

#[test]
fn test_whitelist_wins_over_exclusion() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        exclude_db: Some("^template".into()),
        whitelist_db: Some("^template1$".into()),
        ..SplitConfig::with_dest(dir.path())
    };
    split(&config);

    assert!(dir.path().join("template1/public/table/t1_private.sql").is_file());
    assert!(!dir.path().join("shop").exists());
    assert!(dir.path().join("-/role/Roles.sql").is_file());
}

#[test]
fn test_object_type_exclusion_covers_subtypes() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        exclude_objects: Some("^(FUNCTION|INDEX)$".into()),
        ..SplitConfig::with_dest(dir.path())
    };
    split(&config);

    assert!(!dir.path().join("shop/sales/function").exists());
    assert!(!read(dir.path(), "shop/sales/table/orders.sql").contains("CREATE INDEX"));
}

// ============================================================================
// Role Relocation
// ============================================================================

#[test]
fn test_roles_relocated_into_enabled_databases() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        relocate_roles: true,
        ..SplitConfig::with_dest(dir.path())
    };
    let summary = split(&config);

    assert_eq!(summary.relocations, 1);
    assert!(dir.path().join("shop/-/role/Roles.sql").is_file());
    assert!(dir.path().join("shop/-/database/shop.sql").is_file());
    assert!(!dir.path().join("-").exists());
}

#[test]
fn test_relocation_disabled_by_default() {
    let dir = TempDir::new().unwrap();
    let summary = split(&SplitConfig::with_dest(dir.path()));

    assert_eq!(summary.relocations, 0);
    assert!(!dir.path().join("shop/-/role").exists());
    assert!(dir.path().join("-/role").is_dir());
}

#[test]
fn test_relocation_at_end_without_completion_marker() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        relocate_roles: true,
        ..SplitConfig::with_dest(dir.path())
    };
    let dump = "-- Roles\nCREATE ROLE app;\n-- Databases\n\\connect shop\n\
                -- Name: t; Type: TABLE; Schema: public; Owner: app\nCREATE TABLE t ();\n";
    let summary = split_dump(&config, Cursor::new(dump)).unwrap();

    assert_eq!(summary.relocations, 1);
    assert_eq!(read(dir.path(), "shop/-/role/Roles.sql"), "CREATE ROLE app;\n");
}

// ============================================================================
// Run Lifecycle
// ============================================================================

#[test]
fn test_clean_wipes_previous_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path().join("stale.sql"), "old").unwrap();

    let config = SplitConfig {
        clean: true,
        ..SplitConfig::with_dest(dir.path())
    };
    split(&config);

    assert!(!dir.path().join("stale.sql").exists());
    assert!(dir.path().join("shop/sales/table/orders.sql").is_file());
}

#[test]
fn test_second_run_appends_without_clean() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig::with_dest(dir.path());
    split(&config);
    let summary = split(&config);

    assert_eq!(summary.files_created, 0);
    assert_eq!(
        read(dir.path(), "shop/sales/sales.sql").matches("CREATE SCHEMA sales;").count(),
        2
    );
}

#[test]
fn test_invalid_pattern_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        whitelist_db: Some("(unclosed".into()),
        clean: true,
        ..SplitConfig::with_dest(dir.path())
    };
    write(dir.path().join("keep.sql"), "x").unwrap();

    let err = split_dump(&config, Cursor::new(CLUSTER)).unwrap_err();
    assert!(err.is_configuration());
    assert!(dir.path().join("keep.sql").exists());
}

#[test]
fn test_long_line_reports_line_number() {
    let dir = TempDir::new().unwrap();
    let config = SplitConfig {
        buffer_size: 64,
        ..SplitConfig::with_dest(dir.path())
    };

    let err = split_dump(&config, Cursor::new(CLUSTER)).unwrap_err();
    let SplitError::LineTooLong { line, limit } = err else {
        panic!("expected LineTooLong, got {err:?}");
    };
    assert_eq!(limit, 64);

    let expected = CLUSTER.lines().position(|l| l.len() + 1 > 64).unwrap() as u64 + 1;
    assert_eq!(line, expected);
}

#[test]
fn test_summary_serializes() {
    let dir = TempDir::new().unwrap();
    let summary = split(&SplitConfig::with_dest(dir.path()));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["objects_written"], 10);
    assert_eq!(json["databases"][1], "shop");
}

fn walk(root: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}
