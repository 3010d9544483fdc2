//! SQL type system.
//!
//! This crate supports exactly three column types. Type names in `CREATE
//! TABLE`/`ALTER TABLE` column definitions are normalised to one of these at
//! parse time; see [`SqlType::from_type_name`].

use std::fmt;

/// A SQL data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SqlType {
    /// Numeric type (`Number(f64)` at the value level).
    Number,
    /// Variable-length text.
    String,
    /// Boolean.
    Boolean,
}

impl SqlType {
    /// Normalise a DDL type-name token to a [`SqlType`], per the accepted
    /// synonym table. Returns `None` for any other identifier.
    pub fn from_type_name(name: &str) -> Option<SqlType> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "INT" | "INTEGER" | "DECIMAL" | "FLOAT" | "NUMERIC" | "REAL" | "DOUBLE" | "NUMBER" => {
                Some(SqlType::Number)
            }
            "VARCHAR" | "CHAR" | "TEXT" | "STRING" => Some(SqlType::String),
            "BOOLEAN" | "BOOL" => Some(SqlType::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Number => write!(f, "Number"),
            SqlType::String => write!(f, "String"),
            SqlType::Boolean => write!(f, "Boolean"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_synonyms() {
        for name in [
            "INT", "INTEGER", "DECIMAL", "FLOAT", "NUMERIC", "REAL", "DOUBLE", "NUMBER", "int",
        ] {
            assert_eq!(SqlType::from_type_name(name), Some(SqlType::Number));
        }
    }

    #[test]
    fn test_string_synonyms() {
        for name in ["VARCHAR", "CHAR", "TEXT", "STRING", "varchar"] {
            assert_eq!(SqlType::from_type_name(name), Some(SqlType::String));
        }
    }

    #[test]
    fn test_boolean_synonyms() {
        for name in ["BOOLEAN", "BOOL"] {
            assert_eq!(SqlType::from_type_name(name), Some(SqlType::Boolean));
        }
    }

    #[test]
    fn test_unknown_type_name() {
        assert_eq!(SqlType::from_type_name("DATE"), None);
        assert_eq!(SqlType::from_type_name("JSON"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlType::Number.to_string(), "Number");
        assert_eq!(SqlType::String.to_string(), "String");
        assert_eq!(SqlType::Boolean.to_string(), "Boolean");
    }
}
