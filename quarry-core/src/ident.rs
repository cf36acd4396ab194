//! SQL identifier validation.
//!
//! Table names, column names and column lists are concatenated into the
//! statement text, so they are checked here before any SQL is rendered:
//!
//! - plain parts must match `[A-Za-z_][A-Za-z0-9_]*`
//! - tables may be schema-qualified (`public.users`)
//! - a SELECT column list is `*` or comma-separated, optionally qualified
//!   columns (`users.id, name`, `users.*`)

use crate::{Error, Result};

pub(crate) fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_qualified_ident(s: &str) -> bool {
    s.split('.').all(is_valid_sql_ident)
}

/// Validate a (possibly schema-qualified) table name, returning it trimmed.
pub fn table_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if is_qualified_ident(name) {
        Ok(name)
    } else {
        Err(Error::invalid_identifier("table", name))
    }
}

/// Validate a bare column name. Column names double as placeholder names,
/// so qualification is not allowed here.
pub fn column_name(name: &str) -> Result<&str> {
    if is_valid_sql_ident(name) {
        Ok(name)
    } else {
        Err(Error::invalid_identifier("column", name))
    }
}

/// Validate the column expression of a SELECT, returning it trimmed.
pub fn column_list(expr: &str) -> Result<&str> {
    let expr = expr.trim();
    if expr == "*" {
        return Ok(expr);
    }

    let valid = expr.split(',').map(str::trim).all(|col| {
        match col.strip_suffix(".*") {
            Some(table) => is_qualified_ident(table),
            None => is_qualified_ident(col),
        }
    });

    if valid {
        Ok(expr)
    } else {
        Err(Error::invalid_identifier("column list", expr))
    }
}
