//! `CREATE TABLE`, `ALTER TABLE ADD COLUMN`, `DROP TABLE` (spec.md §4.6).

use crate::ast::{AlterTable, ColumnDefAst, CreateTable, DropTable};
use crate::catalog::{Catalog, ColumnDef, TableSchema};
use crate::error::{ConstraintKind, Error, Result};
use crate::types::Value;

pub(super) fn execute_create_table(stmt: &CreateTable, catalog: &mut Catalog) -> Result<()> {
    if catalog.has_table(&stmt.name.name) {
        return Err(Error::constraint(
            ConstraintKind::DuplicateTable,
            stmt.name.name.clone(),
        ));
    }
    reject_duplicate_column_names(&stmt.columns)?;

    let columns = stmt.columns.iter().map(column_def).collect();
    catalog.create_table(TableSchema::new(stmt.name.name.clone(), columns))
}

pub(super) fn execute_alter_table(stmt: &AlterTable, catalog: &mut Catalog) -> Result<()> {
    let (mut schema, mut rows) = stage_mutable_table(catalog, &stmt.name.name)?;

    if schema.has_column(&stmt.add_column.name.name) {
        return Err(Error::constraint(
            ConstraintKind::DuplicateColumn,
            stmt.add_column.name.name.clone(),
        ));
    }

    let adding_not_null = stmt.add_column.not_null
        || stmt.add_column.primary_key
        || stmt.add_column.auto_increment;
    if !rows.is_empty() && adding_not_null {
        return Err(Error::constraint(
            ConstraintKind::NotNullViolation,
            stmt.add_column.name.name.clone(),
        ));
    }

    let new_column = column_def(&stmt.add_column);
    if new_column.auto_increment {
        schema
            .auto_increment_counters
            .insert(new_column.name.clone(), 0);
    }
    if new_column.is_primary_key {
        schema.primary_key = Some(new_column.name.clone());
    }

    for row in &mut rows {
        let value = if new_column.auto_increment {
            Value::Number(schema.next_auto_increment(&new_column.name) as f64)
        } else {
            Value::Null
        };
        row.insert(new_column.name.clone(), value);
    }
    schema.columns.push(new_column);

    catalog.commit(&stmt.name.name, schema, rows);
    Ok(())
}

pub(super) fn execute_drop_table(stmt: &DropTable, catalog: &mut Catalog) -> Result<()> {
    catalog.drop_table(&stmt.name.name)
}

fn column_def(ast: &ColumnDefAst) -> ColumnDef {
    let mut col = ColumnDef::new(ast.name.name.clone(), ast.ty);
    if let Some(size) = ast.size {
        col = col.with_size(size);
    }
    if ast.primary_key {
        col = col.primary_key();
    }
    if ast.auto_increment {
        col = col.auto_increment();
    }
    if ast.not_null {
        col = col.not_null();
    }
    col
}

fn reject_duplicate_column_names(columns: &[ColumnDefAst]) -> Result<()> {
    for (i, col) in columns.iter().enumerate() {
        if columns[..i].iter().any(|c| c.name.name == col.name.name) {
            return Err(Error::constraint(
                ConstraintKind::DuplicateColumn,
                col.name.name.clone(),
            ));
        }
    }
    Ok(())
}

/// Stage a table for mutation, rejecting a protected or unknown table.
pub(super) fn stage_mutable_table(
    catalog: &Catalog,
    name: &str,
) -> Result<(TableSchema, Vec<crate::catalog::Row>)> {
    let schema = catalog
        .schema_of(name)
        .ok_or_else(|| Error::unknown_table(name, 0))?;
    if schema.is_protected {
        return Err(Error::constraint(ConstraintKind::ProtectedTable, name));
    }
    catalog
        .stage(name)
        .ok_or_else(|| Error::internal(format!("table '{}' vanished mid-stage", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::ast::StatementKind;

    fn create(sql: &str, catalog: &mut Catalog) -> Result<()> {
        let stmt = Parser::new(sql).parse().unwrap();
        match stmt.kind {
            StatementKind::CreateTable(ct) => execute_create_table(&ct, catalog),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_create_table_initialises_empty_rows() {
        let mut catalog = Catalog::new();
        create("CREATE TABLE widgets (id NUMBER PRIMARY KEY)", &mut catalog).unwrap();
        assert_eq!(catalog.rows_of("widgets").unwrap().len(), 0);
        assert_eq!(catalog.schema_of("widgets").unwrap().primary_key.as_deref(), Some("id"));
    }

    #[test]
    fn test_create_table_rejects_duplicate_column_names() {
        let mut catalog = Catalog::new();
        let err = create("CREATE TABLE t (a NUMBER, a NUMBER)", &mut catalog).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::DuplicateColumn,
                ..
            }
        ));
    }

    #[test]
    fn test_alter_table_back_fills_existing_rows() {
        let mut catalog = Catalog::new();
        create("CREATE TABLE t (id NUMBER)", &mut catalog).unwrap();
        catalog
            .rows_mut("t")
            .unwrap()
            .push(crate::catalog::Row::from_iter([(
                "id".to_string(),
                Value::Number(1.0),
            )]));

        let stmt = Parser::new("ALTER TABLE t ADD COLUMN name VARCHAR(20)")
            .parse()
            .unwrap();
        match stmt.kind {
            StatementKind::AlterTable(at) => execute_alter_table(&at, &mut catalog).unwrap(),
            _ => unreachable!(),
        }
        let rows = catalog.rows_of("t").unwrap();
        assert_eq!(rows[0].get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_alter_table_rejects_not_null_on_nonempty_table() {
        let mut catalog = Catalog::new();
        create("CREATE TABLE t (id NUMBER)", &mut catalog).unwrap();
        catalog
            .rows_mut("t")
            .unwrap()
            .push(crate::catalog::Row::from_iter([(
                "id".to_string(),
                Value::Number(1.0),
            )]));

        let stmt = Parser::new("ALTER TABLE t ADD COLUMN name VARCHAR(20) NOT NULL")
            .parse()
            .unwrap();
        let err = match stmt.kind {
            StatementKind::AlterTable(at) => execute_alter_table(&at, &mut catalog).unwrap_err(),
            _ => unreachable!(),
        };
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ConstraintViolation {
                reason: ConstraintKind::NotNullViolation,
                ..
            }
        ));
    }

    #[test]
    fn test_drop_table_rejects_protected() {
        let mut catalog = Catalog::seeded();
        let stmt = Parser::new("DROP TABLE students").parse().unwrap();
        let err = match stmt.kind {
            StatementKind::DropTable(dt) => execute_drop_table(&dt, &mut catalog).unwrap_err(),
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
