//! Scoped rows: a combined view over one or two source tables, used while
//! executing a `SELECT`.

use crate::catalog::Row;

/// A single row drawn from the FROM table, optionally joined with a row from
/// the JOIN table.
#[derive(Debug, Clone)]
pub(super) struct ScopedRow<'a> {
    pub(super) tables: Vec<(&'a str, &'a Row)>,
}

impl<'a> ScopedRow<'a> {
    pub(super) fn single(table: &'a str, row: &'a Row) -> Self {
        Self {
            tables: vec![(table, row)],
        }
    }

    pub(super) fn joined(from: (&'a str, &'a Row), join: (&'a str, &'a Row)) -> Self {
        Self {
            tables: vec![from, join],
        }
    }

    /// Look up a column, optionally qualified by table name.
    pub(super) fn get(&self, table: Option<&str>, column: &str) -> Option<&'a crate::types::Value> {
        match table {
            Some(table) => self
                .tables
                .iter()
                .find(|(name, _)| *name == table)
                .and_then(|(_, row)| row.get(column)),
            None => self
                .tables
                .iter()
                .find_map(|(_, row)| row.get(column)),
        }
    }
}
