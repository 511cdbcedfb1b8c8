//! Function signature codec
//!
//! `pg_dump` identifies functions by their full signature, and ACL/COMMENT
//! markers even include argument names and `OUT` parameters. Two helpers
//! turn such an identifier into something usable as a file name:
//!
//! - [`strip_arg_names`] reduces `f(a integer, OUT b text)` to `f(integer, text)`
//! - [`filename`] replaces the argument list by a short digest so overloads
//!   get distinct, bounded-length file names
//!
//! The parsing is deliberately naive: it splits on top-level commas and
//! drops the first word of each argument unless the argument is a bare type.

/// Type names made of several words; an argument starting with one of them
/// has no name in front.
const MULTI_WORD_TYPES: &[&str] = &[
    "bit varying",
    "character varying",
    "double precision",
    "national character varying",
    "national character",
    "time with time zone",
    "time without time zone",
    "timestamp with time zone",
    "timestamp without time zone",
    "interval",
];

/// Argument modes kept in the identity signature
const KEPT_MODES: &[&str] = &["IN", "INOUT", "VARIADIC"];

/// Split `name(args)` into its name and raw argument list.
pub fn split_signature(ident: &str) -> Option<(&str, &str)> {
    let open = ident.find('(')?;
    let args = ident[open + 1..].strip_suffix(')')?;
    Some((&ident[..open], args))
}

/// Drop argument names (and `OUT` markers) from a full function signature.
///
/// Identifiers that are not of the form `name(args)` are returned unchanged.
pub fn strip_arg_names(ident: &str) -> String {
    match split_signature(ident) {
        Some((name, args)) => format!("{}({})", name, strip_args(args)),
        None => ident.to_string(),
    }
}

/// Argument-list counterpart of [`strip_arg_names`].
pub fn strip_args(args: &str) -> String {
    split_top_level(args)
        .into_iter()
        .map(strip_one)
        .filter(|arg| !arg.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// File name for a function: `name` for an empty argument list, otherwise
/// `name-<first 6 hex digits of md5(args)>`.
pub fn filename(name: &str, args: &str) -> String {
    if args.is_empty() {
        return name.to_string();
    }

    let digest = format!("{:x}", md5::compute(args.as_bytes()));
    format!("{}-{}", name, &digest[..6])
}

/// File name for a full signature, after stripping argument names.
///
/// A definition (`f(integer)`) and a grant on it (`f(x integer)`) share the
/// same file this way.
pub fn function_file_name(ident: &str) -> String {
    match split_signature(ident) {
        Some((name, args)) => filename(name, &strip_args(args)),
        None => ident.to_string(),
    }
}

/// Split on commas outside of parentheses, identifiers and literals
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut ident = false;
    let mut literal = false;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        let quoted = ident || literal;
        match c {
            '"' if !literal => ident = !ident,
            '\'' if !ident => literal = !literal,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }
    parts.push(&args[start..]);

    parts
}

fn strip_one(arg: &str) -> String {
    let mut arg = arg.trim();

    if let Some(pos) = arg.find(" DEFAULT ") {
        arg = arg[..pos].trim_end();
    }
    if let Some(rest) = arg.strip_prefix("OUT ") {
        arg = rest.trim_start();
    }

    let (mode, rest) = match arg.split_once(char::is_whitespace) {
        Some((first, rest)) if KEPT_MODES.contains(&first) => (Some(first), rest.trim_start()),
        _ => (None, arg),
    };

    let ty = drop_name(rest);
    match mode {
        Some(mode) => format!("{mode} {ty}"),
        None => ty.to_string(),
    }
}

/// Remove a leading argument name, if there is one
fn drop_name(arg: &str) -> &str {
    if starts_with_type(arg) {
        return arg;
    }

    if arg.starts_with('"') {
        let Some(end) = arg[1..].find('"') else {
            return arg;
        };

        // A lone quoted token (`"char"`, `"any"[]`) is the type itself
        let after = &arg[end + 2..];
        if !after.starts_with(char::is_whitespace) {
            return arg;
        }
        return after.trim_start();
    }

    match arg.split_once(char::is_whitespace) {
        Some((_, ty)) => ty.trim_start(),
        None => arg,
    }
}

fn starts_with_type(arg: &str) -> bool {
    let lower = arg.to_lowercase();
    MULTI_WORD_TYPES.iter().any(|ty| {
        lower.starts_with(ty)
            && lower[ty.len()..]
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}
