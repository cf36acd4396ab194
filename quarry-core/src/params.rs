//! Named placeholder translation.
//!
//! Builders render `:name` placeholders; drivers want positional ones. This
//! module rewrites the SQL for a [`Dialect`] and lays the bound values out in
//! placeholder order.

use indexmap::IndexMap;

use crate::{ColumnValueSet, Error, Result, Value};

/// Positional placeholder syntax of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `$1, $2, ...`; a repeated name reuses its number
    Postgres,
    /// `?` per occurrence
    MySql,
    /// `?` per occurrence
    Sqlite,
}

/// SQL ready for the driver plus its arguments in bind order
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

struct BindState<'a> {
    dialect: Dialect,
    named: &'a ColumnValueSet,
    /// Name -> assigned `$n` (Postgres only)
    numbered: IndexMap<String, usize>,
    params: Vec<Value>,
}

impl<'a> BindState<'a> {
    fn placeholder(&mut self, name: &str) -> Result<String> {
        let value = self
            .named
            .get(name)
            .ok_or_else(|| Error::MissingParameter {
                name: name.to_string(),
            })?;

        match self.dialect {
            Dialect::Postgres => {
                if let Some(index) = self.numbered.get(name) {
                    return Ok(format!("${index}"));
                }
                self.params.push(value.clone());
                let index = self.params.len();
                self.numbered.insert(name.to_string(), index);
                Ok(format!("${index}"))
            }
            Dialect::MySql | Dialect::Sqlite => {
                self.params.push(value.clone());
                Ok("?".to_string())
            }
        }
    }
}

/// Text the scanner copies through without looking for placeholders
#[derive(Clone, Copy)]
enum Skip {
    /// `'...'`, `"..."` or `` `...` ``, closed by the same character
    Quoted(char),
    /// `-- ...` up to the end of the line
    LineComment,
    /// `/* ... */`
    BlockComment,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite every `:name` outside quoted text and comments into the dialect's
/// positional form.
///
/// `::` casts are left alone. Values in `named` that no placeholder refers to
/// are not bound.
pub fn bind_named(sql: &str, named: &ColumnValueSet, dialect: Dialect) -> Result<PositionalQuery> {
    let mut state = BindState {
        dialect,
        named,
        numbered: IndexMap::new(),
        params: Vec::with_capacity(named.len()),
    };
    let mut out = String::with_capacity(sql.len());
    let mut skip: Option<Skip> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(region) = skip {
            out.push(c);
            match region {
                Skip::Quoted(close) if c == close => skip = None,
                Skip::LineComment if c == '\n' => skip = None,
                Skip::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                    out.push('/');
                    chars.next();
                    skip = None;
                }
                _ => {}
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                skip = Some(Skip::Quoted(c));
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                skip = Some(Skip::LineComment);
                out.push_str("--");
                chars.next();
            }
            '/' if chars.peek() == Some(&'*') => {
                skip = Some(Skip::BlockComment);
                out.push_str("/*");
                chars.next();
            }
            ':' if chars.peek() == Some(&':') => {
                out.push_str("::");
                chars.next();
            }
            ':' if chars.peek().copied().is_some_and(is_ident_start) => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_ident_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                out.push_str(&state.placeholder(&name)?);
            }
            _ => out.push(c),
        }
    }

    Ok(PositionalQuery {
        sql: out,
        params: state.params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntoColumnValues;

    fn named() -> ColumnValueSet {
        [("name", Value::from("Alice")), ("age", Value::from(30))].into_column_values()
    }

    #[test]
    fn test_question_mark_dialects() {
        for dialect in [Dialect::MySql, Dialect::Sqlite] {
            let query = bind_named(
                "INSERT INTO users(name, age)VALUES(:name, :age)",
                &named(),
                dialect,
            )
            .unwrap();
            assert_eq!(query.sql, "INSERT INTO users(name, age)VALUES(?, ?)");
            assert_eq!(query.params, vec![Value::from("Alice"), Value::I32(30)]);
        }
    }

    #[test]
    fn test_postgres_numbers_in_order_of_appearance() {
        let query = bind_named(
            "SELECT * FROM users WHERE age > :age AND name = :name",
            &named(),
            Dialect::Postgres,
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT * FROM users WHERE age > $1 AND name = $2");
        assert_eq!(query.params, vec![Value::I32(30), Value::from("Alice")]);
    }

    #[test]
    fn test_repeated_name() {
        let sql = "SELECT * FROM users WHERE age > :age AND age < :age";

        let pg = bind_named(sql, &named(), Dialect::Postgres).unwrap();
        assert_eq!(pg.sql, "SELECT * FROM users WHERE age > $1 AND age < $1");
        assert_eq!(pg.params, vec![Value::I32(30)]);

        let lite = bind_named(sql, &named(), Dialect::Sqlite).unwrap();
        assert_eq!(lite.sql, "SELECT * FROM users WHERE age > ? AND age < ?");
        assert_eq!(lite.params, vec![Value::I32(30), Value::I32(30)]);
    }

    #[test]
    fn test_quotes_and_casts_are_skipped() {
        let query = bind_named(
            "SELECT ':name', \"a:b\", age::text FROM users WHERE name = :name",
            &named(),
            Dialect::Postgres,
        )
        .unwrap();
        assert_eq!(
            query.sql,
            "SELECT ':name', \"a:b\", age::text FROM users WHERE name = $1"
        );
        assert_eq!(query.params.len(), 1);
    }

    #[test]
    fn test_comments_are_skipped() {
        let query = bind_named(
            "SELECT * FROM users -- look up :id later\nWHERE name = :name /* not :age */",
            &named(),
            Dialect::Sqlite,
        )
        .unwrap();
        assert_eq!(
            query.sql,
            "SELECT * FROM users -- look up :id later\nWHERE name = ? /* not :age */"
        );
        assert_eq!(query.params, vec![Value::from("Alice")]);
    }

    #[test]
    fn test_placeholder_after_block_comment() {
        let query = bind_named(
            "SELECT /* :id */ * FROM users WHERE age = :age",
            &named(),
            Dialect::Postgres,
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT /* :id */ * FROM users WHERE age = $1");
    }

    #[test]
    fn test_backtick_identifiers_are_skipped() {
        let query = bind_named(
            "SELECT `x:y` FROM users WHERE age = :age",
            &named(),
            Dialect::MySql,
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT `x:y` FROM users WHERE age = ?");
        assert_eq!(query.params, vec![Value::I32(30)]);
    }

    #[test]
    fn test_single_dash_and_slash_are_plain_text() {
        let query = bind_named(
            "SELECT age - 1, age / 2 FROM users WHERE age > :age",
            &named(),
            Dialect::Sqlite,
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT age - 1, age / 2 FROM users WHERE age > ?");
    }

    #[test]
    fn test_missing_parameter() {
        let err = bind_named("SELECT * FROM users WHERE id = :id", &named(), Dialect::MySql)
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter { name } if name == "id"));
    }

    #[test]
    fn test_no_placeholders() {
        let query = bind_named("SELECT * FROM users", &ColumnValueSet::new(), Dialect::Sqlite)
            .unwrap();
        assert_eq!(query.sql, "SELECT * FROM users");
        assert!(query.params.is_empty());
    }
}
