//! Allow-listed SQL comparison operators

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{Error, Result};

/// Comparison operator usable in a WHERE condition.
///
/// Operators are emitted into the SQL text verbatim, so only the tokens
/// listed here can ever reach a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    /// `<>`, the ANSI spelling of `!=`
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
}

impl Operator {
    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim() {
            "=" => Operator::Eq,
            "!=" => Operator::Neq,
            "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            other => {
                let words: Vec<&str> = other.split_whitespace().collect();
                match words.as_slice() {
                    [like] if like.eq_ignore_ascii_case("like") => Operator::Like,
                    [not, like]
                        if not.eq_ignore_ascii_case("not") && like.eq_ignore_ascii_case("like") =>
                    {
                        Operator::NotLike
                    }
                    _ => return Err(Error::invalid_operator(s)),
                }
            }
        };
        Ok(op)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Result<Operator>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Result<Operator> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> Result<Operator> {
        self.parse()
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> Result<Operator> {
        self.parse()
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::Eq;
    pub const NEQ: Operator = Operator::Neq;
    pub const LT: Operator = Operator::Lt;
    pub const LTE: Operator = Operator::Lte;
    pub const GT: Operator = Operator::Gt;
    pub const GTE: Operator = Operator::Gte;
    pub const LIKE: Operator = Operator::Like;
    pub const NOT_LIKE: Operator = Operator::NotLike;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_strings() {
        assert_eq!(Operator::Gt.as_str(), ">");
        assert_eq!(Operator::NotEq.as_str(), "<>");
        assert_eq!(Operator::NotLike.as_str(), "NOT LIKE");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", op::GTE), ">=");
        assert_eq!(format!("{}", op::LIKE), "LIKE");
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(">".into_operator().unwrap(), Operator::Gt);
        assert_eq!(" <= ".into_operator().unwrap(), Operator::Lte);
        assert_eq!("like".into_operator().unwrap(), Operator::Like);
        assert_eq!("Not  Like".into_operator().unwrap(), Operator::NotLike);
        assert_eq!(String::from("!=").into_operator().unwrap(), Operator::Neq);
    }

    #[test]
    fn test_operators_outside_allow_list_are_rejected() {
        for raw in ["= 1 OR 1 =", "IN", "; DROP TABLE users; --", "", "NOT"] {
            let err = raw.into_operator().unwrap_err();
            assert!(matches!(err, Error::InvalidOperator { .. }), "accepted {raw:?}");
        }
    }
}
