//! Statement execution: runs a validated [`Statement`](crate::ast::Statement)
//! against a [`Catalog`], producing an [`Output`].

mod comparisons;
mod ddl;
mod dml;
mod scoped_row;
mod select;

use crate::ast::StatementKind;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::Value;

/// The result of executing one statement: a `SELECT`'s result set, or a
/// single-row-single-column acknowledgement for DDL/DML (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Output {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub meta: OutputMeta,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputMeta {
    /// For `SELECT`, the number of result rows; for DDL/DML, the number of
    /// rows affected.
    pub row_count: usize,
    /// `true` for every statement except `SELECT`.
    pub modified: bool,
    pub warnings: Vec<String>,
}

impl Output {
    fn select(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            meta: OutputMeta {
                row_count,
                modified: false,
                warnings: Vec::new(),
            },
        }
    }

    fn acknowledgement(message: impl Into<String>, row_count: usize) -> Self {
        Self {
            columns: vec!["result".to_string()],
            rows: vec![vec![Value::String(message.into())]],
            meta: OutputMeta {
                row_count,
                modified: true,
                warnings: Vec::new(),
            },
        }
    }
}

/// Run an already-validated statement against the catalog.
///
/// `SELECT` must already have passed [`crate::validator::validate`]; DDL/DML
/// statements carry their own constraint checks here since those checks
/// depend on the catalog's current row data, not just its schema.
pub(crate) fn execute_statement(kind: &StatementKind, catalog: &mut Catalog) -> Result<Output> {
    match kind {
        StatementKind::Query(query) => {
            let (columns, rows) = select::execute_select(query.as_ref(), catalog)?;
            Ok(Output::select(columns, rows))
        }
        StatementKind::CreateTable(stmt) => {
            ddl::execute_create_table(stmt, catalog)?;
            Ok(Output::acknowledgement(
                format!("table '{}' created", stmt.name.name),
                0,
            ))
        }
        StatementKind::AlterTable(stmt) => {
            ddl::execute_alter_table(stmt, catalog)?;
            Ok(Output::acknowledgement(
                format!("table '{}' altered", stmt.name.name),
                0,
            ))
        }
        StatementKind::DropTable(stmt) => {
            let name = stmt.name.name.clone();
            ddl::execute_drop_table(stmt, catalog)?;
            Ok(Output::acknowledgement(format!("table '{}' dropped", name), 0))
        }
        StatementKind::Insert(stmt) => {
            let inserted = dml::execute_insert(stmt, catalog)?;
            Ok(Output::acknowledgement(
                format!("{} row(s) inserted", inserted),
                inserted,
            ))
        }
        StatementKind::Update(stmt) => {
            let modified = dml::execute_update(stmt, catalog)?;
            Ok(Output::acknowledgement(
                format!("{} row(s) updated", modified),
                modified,
            ))
        }
        StatementKind::Delete(stmt) => {
            let removed = dml::execute_delete(stmt, catalog)?;
            Ok(Output::acknowledgement(
                format!("{} row(s) deleted", removed),
                removed,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn run(sql: &str, catalog: &mut Catalog) -> Result<Output> {
        let mut stmt = Parser::new(sql).parse().unwrap();
        if let StatementKind::Query(query) = &mut stmt.kind {
            crate::validator::validate(query, catalog)?;
        }
        execute_statement(&stmt.kind, catalog)
    }

    #[test]
    fn test_select_against_seeded_catalog() {
        let mut catalog = Catalog::seeded();
        let output = run("SELECT forename FROM students WHERE student_id = 1", &mut catalog).unwrap();
        assert_eq!(output.rows, vec![vec![Value::String("Alice".into())]]);
        assert_eq!(output.meta.row_count, 1);
        assert!(!output.meta.modified);
    }

    #[test]
    fn test_insert_then_select_round_trip() {
        let mut catalog = Catalog::new();
        run("CREATE TABLE t (id NUMBER PRIMARY KEY, name VARCHAR(20))", &mut catalog).unwrap();
        let insert = run("INSERT INTO t (id, name) VALUES (1, 'Ada')", &mut catalog).unwrap();
        assert!(insert.meta.modified);
        assert_eq!(insert.meta.row_count, 1);

        let select = run("SELECT id, name FROM t", &mut catalog).unwrap();
        assert_eq!(
            select.rows,
            vec![vec![Value::Number(1.0), Value::String("Ada".into())]]
        );
    }

    #[test]
    fn test_create_then_drop_leaves_catalog_unchanged() {
        let mut catalog = Catalog::new();
        run("CREATE TABLE t (id NUMBER)", &mut catalog).unwrap();
        run("DROP TABLE t", &mut catalog).unwrap();
        assert!(!catalog.has_table("t"));
    }
}
