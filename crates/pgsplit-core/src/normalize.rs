//! Metadata normalizer
//!
//! `pg_dump` is not consistent about where it stores the parent of an
//! object: an ACL carries it in its name (`FUNCTION f(x integer)`), a
//! constraint prefixes the owning table (`users users_pkey`) and an index
//! only mentions its table in the `CREATE INDEX` statement. [`normalize`]
//! moves that information into `obj_subtype` / `obj_sub_name` so the path
//! resolver can route related objects together.

use crate::classify::unquote;
use crate::codec;
use crate::config::LayoutMode;
use crate::object::{obj_type, DbObject, NO_SCHEMA};
use crate::patterns::PatternSet;

/// Return the normalized form of `obj`.
///
/// The input is consumed and a new value returned, so a caller never sees
/// a half-rewritten object. Types not listed below pass through unchanged.
pub fn normalize(obj: DbObject, mode: LayoutMode, patterns: &PatternSet) -> DbObject {
    let mut obj = match obj.obj_type.as_str() {
        obj_type::COMMENT | obj_type::ACL => split_subtype(obj, patterns),
        obj_type::FK_CONSTRAINT | obj_type::CONSTRAINT | obj_type::TRIGGER | obj_type::DEFAULT => {
            split_owner(obj, obj_type::TABLE)
        },
        obj_type::SEQUENCE_OWNED_BY => split_owner(obj, obj_type::SEQUENCE),
        obj_type::SEQUENCE_SET => with_parent(obj, obj_type::SEQUENCE),
        obj_type::DATABASE_PROPERTIES => with_parent(obj, obj_type::DATABASE),
        obj_type::INDEX => index_owner(obj, patterns),
        obj_type::PUBLICATION_TABLE => {
            let mut obj = split_owner(obj, obj_type::PUBLICATION);
            if mode.is_custom() {
                obj.schema = NO_SCHEMA.to_string();
            }
            obj
        },
        obj_type::FUNCTION => {
            let name = codec::strip_arg_names(&obj.name);
            DbObject { name, ..obj }
        },
        _ => return obj,
    };

    match obj.obj_subtype.as_str() {
        obj_type::FUNCTION => obj.name = codec::strip_arg_names(&obj.obj_sub_name),
        obj_type::SCHEMA => {
            obj.schema = obj.obj_sub_name.clone();
            obj.name = obj.obj_sub_name.clone();
        },
        _ => {},
    }

    obj
}

/// `COMMENT`/`ACL`: leading upper-case words are the parent type
fn split_subtype(mut obj: DbObject, patterns: &PatternSet) -> DbObject {
    let Some(caps) = patterns.subtype.captures(&obj.name) else {
        return obj;
    };

    let subtype = caps.name("subtype").map_or("", |m| m.as_str()).to_string();
    let sub_name = caps.name("name").map_or("", |m| m.as_str()).to_string();

    // Column grants and comments belong to the owning table
    if subtype == obj_type::COLUMN {
        if let Some((table, _column)) = sub_name.rsplit_once('.') {
            obj.obj_subtype = obj_type::TABLE.to_string();
            obj.obj_sub_name = unquote(table).to_string();
            return obj;
        }
    }

    obj.obj_subtype = subtype;
    obj.obj_sub_name = unquote(&sub_name).to_string();
    obj
}

/// `<owner> <local>`: the last space-separated token is the object's own name
fn split_owner(mut obj: DbObject, parent: &str) -> DbObject {
    if let Some((owner, local)) = obj.name.rsplit_once(' ') {
        let owner = unquote(owner).to_string();
        obj.name = local.to_string();
        obj.obj_sub_name = owner;
        obj.obj_subtype = parent.to_string();
    }
    obj
}

fn with_parent(mut obj: DbObject, parent: &str) -> DbObject {
    obj.obj_subtype = parent.to_string();
    obj.obj_sub_name = obj.name.clone();
    obj
}

/// `INDEX`: the table is only known from `ON schema.table` in the body
fn index_owner(mut obj: DbObject, patterns: &PatternSet) -> DbObject {
    let table = patterns
        .index_owner
        .captures(&obj.content)
        .and_then(|caps| caps.get(2))
        .map(|m| unquote(m.as_str()).to_string());

    if let Some(table) = table {
        obj.obj_subtype = obj_type::TABLE.to_string();
        obj.obj_sub_name = table;
    }
    obj
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SplitConfig;

    fn patterns() -> PatternSet {
        PatternSet::compile(&SplitConfig::default()).unwrap()
    }

    fn custom(obj: DbObject) -> DbObject {
        normalize(obj, LayoutMode::Custom, &patterns())
    }

    #[test]
    fn test_comment_on_table() {
        let obj = custom(DbObject::new("COMMENT", "TABLE users", "public", "shop"));
        assert_eq!(obj.obj_subtype, "TABLE");
        assert_eq!(obj.obj_sub_name, "users");
        assert_eq!(obj.name, "TABLE users");
    }

    #[test]
    fn test_function_acl() {
        let obj = custom(DbObject::new("ACL", "FUNCTION avals(public.hstore)", "public", ""));
        assert_eq!(obj.name, "avals(public.hstore)");
        assert_eq!(obj.obj_subtype, "FUNCTION");
        assert_eq!(obj.obj_sub_name, "avals(public.hstore)");
    }

    #[test]
    fn test_function_acl_with_argument_names() {
        let obj = custom(DbObject::new(
            "ACL",
            "FUNCTION column_names(_schema_name text, _table_name text, _not_in_column_names text[], _not_in_data_types text[])",
            "public",
            "",
        ));
        assert_eq!(obj.name, "column_names(text, text, text[], text[])");
        assert_eq!(
            obj.obj_sub_name,
            "column_names(_schema_name text, _table_name text, _not_in_column_names text[], _not_in_data_types text[])"
        );
    }

    #[test]
    fn test_multi_word_subtype() {
        let obj = custom(DbObject::new("ACL", "FOREIGN DATA WRAPPER dblink_fdw", "-", ""));
        assert_eq!(obj.name, "FOREIGN DATA WRAPPER dblink_fdw");
        assert_eq!(obj.obj_subtype, "FOREIGN DATA WRAPPER");
        assert_eq!(obj.obj_sub_name, "dblink_fdw");
    }

    #[test]
    fn test_column_collapses_onto_table() {
        let obj = custom(DbObject::new("COMMENT", "COLUMN users.email", "public", "shop"));
        assert_eq!(obj.obj_subtype, "TABLE");
        assert_eq!(obj.obj_sub_name, "users");
    }

    #[test]
    fn test_schema_subtype_promotes_name() {
        let obj = custom(DbObject::new("ACL", "SCHEMA billing", "-", "shop"));
        assert_eq!(obj.obj_subtype, "SCHEMA");
        assert_eq!(obj.schema, "billing");
        assert_eq!(obj.name, "billing");
    }

    #[test]
    fn test_constraint_like_types() {
        for ty in ["CONSTRAINT", "FK CONSTRAINT", "TRIGGER", "DEFAULT"] {
            let obj = custom(DbObject::new(ty, "users users_pkey", "public", "shop"));
            assert_eq!(obj.name, "users_pkey", "{ty}");
            assert_eq!(obj.obj_sub_name, "users", "{ty}");
            assert_eq!(obj.obj_subtype, "TABLE", "{ty}");
        }

        let obj = custom(DbObject::new("CONSTRAINT", r#""Order Lines" pk"#, "public", "shop"));
        assert_eq!(obj.obj_sub_name, "Order Lines");
        assert_eq!(obj.name, "pk");
    }

    #[test]
    fn test_sequences() {
        let owned = custom(DbObject::new("SEQUENCE OWNED BY", "users_id_seq", "public", ""));
        assert_eq!(owned.obj_subtype, "");
        assert_eq!(owned.name, "users_id_seq");

        let owned = custom(DbObject::new("SEQUENCE OWNED BY", "users users_id_seq", "public", ""));
        assert_eq!(owned.obj_subtype, "SEQUENCE");
        assert_eq!(owned.obj_sub_name, "users");

        let set = custom(DbObject::new("SEQUENCE SET", "users_id_seq", "public", ""));
        assert_eq!(set.obj_subtype, "SEQUENCE");
        assert_eq!(set.obj_sub_name, "users_id_seq");
    }

    #[test]
    fn test_index_owner_from_content() {
        let obj = DbObject::new("INDEX", "accounts_email_idx", "public", "shop")
            .with_content("CREATE INDEX accounts_email_idx ON public.accounts USING btree (email);\n");
        let obj = custom(obj);
        assert_eq!(obj.obj_subtype, "TABLE");
        assert_eq!(obj.obj_sub_name, "accounts");

        let partitioned = DbObject::new("INDEX", "m_idx", "public", "shop")
            .with_content("CREATE INDEX m_idx ON ONLY public.\"Measurements\" USING btree (ts);\n");
        assert_eq!(custom(partitioned).obj_sub_name, "Measurements");

        let bodiless = custom(DbObject::new("INDEX", "orphan_idx", "public", "shop"));
        assert_eq!(bodiless.obj_subtype, "");
    }

    #[test]
    fn test_database_properties() {
        let obj = custom(DbObject::new("DATABASE PROPERTIES", "shop", "-", "shop"));
        assert_eq!(obj.obj_subtype, "DATABASE");
        assert_eq!(obj.obj_sub_name, "shop");
    }

    #[test]
    fn test_publication_table_schema_depends_on_mode() {
        let obj = DbObject::new("PUBLICATION TABLE", "pub_orders orders", "public", "shop");

        let custom_obj = normalize(obj.clone(), LayoutMode::Custom, &patterns());
        assert_eq!(custom_obj.schema, "-");
        assert_eq!(custom_obj.obj_subtype, "PUBLICATION");
        assert_eq!(custom_obj.obj_sub_name, "pub_orders");
        assert_eq!(custom_obj.name, "orders");

        let origin_obj = normalize(obj, LayoutMode::Origin, &patterns());
        assert_eq!(origin_obj.schema, "public");
    }

    #[test]
    fn test_other_types_are_identity() {
        for ty in ["TABLE", "VIEW", "SEQUENCE", "TYPE", "ROLE", "TABLE DATA", "SCHEMA", "DEFAULT ACL"] {
            let obj = DbObject::new(ty, "some name", "public", "shop").with_content("x\n");
            assert_eq!(custom(obj.clone()), obj);
        }
    }
}
