//! `INSERT`, `UPDATE`, `DELETE` (spec.md §4.6).

use crate::ast::{Delete, Insert, Update};
use crate::catalog::{Catalog, ColumnDef, Row};
use crate::error::{ConstraintKind, Error, Result};
use crate::types::Value;

use super::comparisons::{evaluate_predicate, literal_value};
use super::ddl::stage_mutable_table;
use super::scoped_row::ScopedRow;

/// Runs an `INSERT`, returning the number of rows inserted (always 1).
pub(super) fn execute_insert(stmt: &Insert, catalog: &mut Catalog) -> Result<usize> {
    let (mut schema, mut rows) = stage_mutable_table(catalog, &stmt.table.name)?;

    for column in &stmt.columns {
        if !schema.has_column(&column.name) {
            return Err(Error::unknown_column(column.name.clone(), column.span.start));
        }
    }
    if stmt.columns.len() != stmt.values.len() {
        return Err(Error::constraint(
            ConstraintKind::ColumnCountMismatch,
            stmt.table.name.clone(),
        ));
    }

    let mut row: Row = Row::new();
    for (column, literal) in stmt.columns.iter().zip(&stmt.values) {
        let def = schema.get_column(&column.name).expect("checked above").clone();
        let value = literal_value(literal);
        check_value_against_column(&def, &value)?;
        if def.auto_increment {
            if let Value::Number(n) = &value {
                schema.bump_auto_increment_if_greater(&def.name, *n as i64);
            }
        }
        row.insert(column.name.clone(), value);
    }

    for column in schema.columns.clone() {
        if row.contains_key(&column.name) {
            continue;
        }
        let value = if column.auto_increment {
            Value::Number(schema.next_auto_increment(&column.name) as f64)
        } else {
            Value::Null
        };
        check_value_against_column(&column, &value)?;
        row.insert(column.name.clone(), value);
    }

    if let Some(pk) = &schema.primary_key {
        let new_value = row.get(pk).cloned().unwrap_or(Value::Null);
        if !new_value.is_null() && rows.iter().any(|r| r.get(pk) == Some(&new_value)) {
            return Err(Error::constraint(ConstraintKind::PrimaryKeyDuplicate, pk.clone()));
        }
    }

    rows.push(row);
    catalog.commit(&stmt.table.name, schema, rows);
    Ok(1)
}

/// Runs an `UPDATE`, returning the number of rows modified.
pub(super) fn execute_update(stmt: &Update, catalog: &mut Catalog) -> Result<usize> {
    let (mut schema, mut rows) = stage_mutable_table(catalog, &stmt.table.name)?;

    for assignment in &stmt.assignments {
        if !schema.has_column(&assignment.column.name) {
            return Err(Error::unknown_column(
                assignment.column.name.clone(),
                assignment.column.span.start,
            ));
        }
    }

    let matches: Vec<bool> = match &stmt.where_clause {
        Some(predicate) => rows
            .iter()
            .map(|row| evaluate_predicate(predicate, &ScopedRow::single(&stmt.table.name, row)))
            .collect(),
        None => vec![true; rows.len()],
    };

    let mut modified = 0;
    for (index, row) in rows.iter_mut().enumerate() {
        if !matches[index] {
            continue;
        }
        for assignment in &stmt.assignments {
            let def = schema
                .get_column(&assignment.column.name)
                .expect("checked above")
                .clone();
            let value = literal_value(&assignment.value);
            check_value_against_column(&def, &value)?;

            if schema.primary_key.as_deref() == Some(def.name.as_str()) && !value.is_null() {
                let duplicate = rows
                    .iter()
                    .enumerate()
                    .any(|(other_index, other)| other_index != index && other.get(&def.name) == Some(&value));
                if duplicate {
                    return Err(Error::constraint(ConstraintKind::PrimaryKeyDuplicate, def.name.clone()));
                }
            }
            if def.auto_increment {
                if let Value::Number(n) = &value {
                    schema.bump_auto_increment_if_greater(&def.name, *n as i64);
                }
            }

            row.insert(def.name.clone(), value);
        }
        modified += 1;
    }

    catalog.commit(&stmt.table.name, schema, rows);
    Ok(modified)
}

/// Runs a `DELETE`, returning the number of rows removed.
pub(super) fn execute_delete(stmt: &Delete, catalog: &mut Catalog) -> Result<usize> {
    let (schema, mut rows) = stage_mutable_table(catalog, &stmt.table.name)?;

    let before = rows.len();
    match &stmt.where_clause {
        None => rows.clear(),
        Some(predicate) => {
            rows.retain(|row| !evaluate_predicate(predicate, &ScopedRow::single(&stmt.table.name, row)))
        }
    }
    let removed = before - rows.len();

    catalog.commit(&stmt.table.name, schema, rows);
    Ok(removed)
}

fn check_value_against_column(def: &ColumnDef, value: &Value) -> Result<()> {
    if value.is_null() {
        if def.not_null {
            return Err(Error::constraint(ConstraintKind::NotNullViolation, def.name.clone()));
        }
        return Ok(());
    }
    if value.sql_type() != Some(def.ty) {
        return Err(Error::constraint(ConstraintKind::TypeMismatch, def.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StatementKind;
    use crate::parser::Parser;

    fn run_create(sql: &str, catalog: &mut Catalog) {
        let stmt = Parser::new(sql).parse().unwrap();
        match stmt.kind {
            StatementKind::CreateTable(ct) => super::super::ddl::execute_create_table(&ct, catalog).unwrap(),
            _ => unreachable!(),
        }
    }

    fn run_insert(sql: &str, catalog: &mut Catalog) -> Result<usize> {
        let stmt = Parser::new(sql).parse().unwrap();
        match stmt.kind {
            StatementKind::Insert(i) => execute_insert(&i, catalog),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_insert_fills_auto_increment_and_nulls() {
        let mut catalog = Catalog::new();
        run_create(
            "CREATE TABLE t (id NUMBER AUTO_INCREMENT PRIMARY KEY, name VARCHAR(20))",
            &mut catalog,
        );
        run_insert("INSERT INTO t (name) VALUES ('Ada')", &mut catalog).unwrap();
        let rows = catalog.rows_of("t").unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::Number(1.0)));
        assert_eq!(rows[0].get("name"), Some(&Value::String("Ada".into())));
    }

    #[test]
    fn test_insert_rejects_not_null_violation() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER PRIMARY KEY, name VARCHAR(20) NOT NULL)", &mut catalog);
        let err = run_insert("INSERT INTO t (id, name) VALUES (1, NULL)", &mut catalog).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::NotNullViolation,
                ..
            }
        ));
        assert_eq!(catalog.rows_of("t").unwrap().len(), 0);
    }

    #[test]
    fn test_insert_rejects_duplicate_primary_key() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER PRIMARY KEY)", &mut catalog);
        run_insert("INSERT INTO t (id) VALUES (1)", &mut catalog).unwrap();
        let err = run_insert("INSERT INTO t (id) VALUES (1)", &mut catalog).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::PrimaryKeyDuplicate,
                ..
            }
        ));
    }

    #[test]
    fn test_insert_rejects_type_mismatch() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER PRIMARY KEY)", &mut catalog);
        let err = run_insert("INSERT INTO t (id) VALUES ('nope')", &mut catalog).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::TypeMismatch,
                ..
            }
        ));
    }

    #[test]
    fn test_insert_explicit_value_bumps_counter_for_later_omitted_insert() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER AUTO_INCREMENT PRIMARY KEY, name VARCHAR(20))", &mut catalog);
        run_insert("INSERT INTO t (id, name) VALUES (100, 'Ada')", &mut catalog).unwrap();
        run_insert("INSERT INTO t (name) VALUES ('Grace')", &mut catalog).unwrap();

        let rows = catalog.rows_of("t").unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::Number(100.0)));
        assert_eq!(rows[1].get("id"), Some(&Value::Number(101.0)));
    }

    #[test]
    fn test_update_applies_where_and_bumps_counter() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER AUTO_INCREMENT PRIMARY KEY, name VARCHAR(20))", &mut catalog);
        run_insert("INSERT INTO t (name) VALUES ('Ada')", &mut catalog).unwrap();

        let stmt = Parser::new("UPDATE t SET id = 5 WHERE name = 'Ada'").parse().unwrap();
        let modified = match stmt.kind {
            StatementKind::Update(u) => execute_update(&u, &mut catalog).unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(modified, 1);
        assert_eq!(catalog.schema_of("t").unwrap().auto_increment_counters.get("id"), Some(&5));
    }

    #[test]
    fn test_delete_without_where_truncates() {
        let mut catalog = Catalog::new();
        run_create("CREATE TABLE t (id NUMBER PRIMARY KEY)", &mut catalog);
        run_insert("INSERT INTO t (id) VALUES (1)", &mut catalog).unwrap();
        run_insert("INSERT INTO t (id) VALUES (2)", &mut catalog).unwrap();

        let stmt = Parser::new("DELETE FROM t").parse().unwrap();
        let removed = match stmt.kind {
            StatementKind::Delete(d) => execute_delete(&d, &mut catalog).unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(removed, 2);
        assert_eq!(catalog.rows_of("t").unwrap().len(), 0);
    }

    #[test]
    fn test_delete_rejects_protected_table() {
        let mut catalog = Catalog::seeded();
        let stmt = Parser::new("DELETE FROM students").parse().unwrap();
        let err = match stmt.kind {
            StatementKind::Delete(d) => execute_delete(&d, &mut catalog).unwrap_err(),
            _ => unreachable!(),
        };
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::ProtectedTable,
                ..
            }
        ));
    }
}
