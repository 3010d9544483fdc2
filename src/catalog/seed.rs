//! The three bit-exact starter tables embedded in every fresh catalog.

use indexmap::IndexMap;

use super::builder::CatalogBuilder;
use super::schema::{ColumnDef, TableSchema};
use super::{Catalog, Row};
use crate::types::{SqlType, Value};

fn row(pairs: &[(&str, Value)]) -> Row {
    let mut row = IndexMap::new();
    for (name, value) in pairs {
        row.insert((*name).to_string(), value.clone());
    }
    row
}

fn students_schema() -> TableSchema {
    TableSchema::new(
        "students",
        vec![
            ColumnDef::new("student_id", SqlType::Number).primary_key(),
            ColumnDef::new("forename", SqlType::String),
            ColumnDef::new("surname", SqlType::String),
            ColumnDef::new("tutor_group_id", SqlType::Number),
        ],
    )
    .protected()
}

fn students_rows() -> Vec<Row> {
    let data: &[(f64, &str, &str, f64)] = &[
        (1.0, "Alice", "Smith", 1.0),
        (2.0, "Bob", "Johnson", 1.0),
        (3.0, "Charlie", "Smith", 2.0),
        (4.0, "Diana", "Brown", 2.0),
        (5.0, "Eve", "Williams", 3.0),
        (6.0, "Frank", "Davis", 3.0),
        (7.0, "Grace", "Miller", 1.0),
        (8.0, "Henry", "Wilson", 2.0),
        (9.0, "Iris", "Moore", 3.0),
        (10.0, "Jack", "Taylor", 1.0),
    ];
    data.iter()
        .map(|(id, forename, surname, group)| {
            row(&[
                ("student_id", Value::Number(*id)),
                ("forename", Value::String((*forename).to_string())),
                ("surname", Value::String((*surname).to_string())),
                ("tutor_group_id", Value::Number(*group)),
            ])
        })
        .collect()
}

fn tutor_groups_schema() -> TableSchema {
    TableSchema::new(
        "tutor_groups",
        vec![
            ColumnDef::new("tutor_group_id", SqlType::Number).primary_key(),
            ColumnDef::new("tutor_name", SqlType::String),
            ColumnDef::new("room", SqlType::String),
        ],
    )
    .protected()
}

fn tutor_groups_rows() -> Vec<Row> {
    let data: &[(f64, &str, &str)] = &[
        (1.0, "Clive Anderson", "B12"),
        (2.0, "Amelia Bennett", "A5"),
        (3.0, "Sidney Carter", "C3"),
    ];
    data.iter()
        .map(|(id, tutor_name, room)| {
            row(&[
                ("tutor_group_id", Value::Number(*id)),
                ("tutor_name", Value::String((*tutor_name).to_string())),
                ("room", Value::String((*room).to_string())),
            ])
        })
        .collect()
}

fn grades_schema() -> TableSchema {
    TableSchema::new(
        "grades",
        vec![
            ColumnDef::new("student_id", SqlType::Number),
            ColumnDef::new("module", SqlType::String),
            ColumnDef::new("paper", SqlType::Number),
            ColumnDef::new("score", SqlType::Number),
        ],
    )
    .protected()
}

/// Build a fresh catalog containing `students`, `tutor_groups` and the
/// (empty, host-populated) `grades` table.
pub(super) fn seeded_catalog() -> Catalog {
    CatalogBuilder::new()
        .add_table(students_schema(), students_rows())
        .add_table(tutor_groups_schema(), tutor_groups_rows())
        .add_table(grades_schema(), Vec::new())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_bit_exact() {
        let rows = students_rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["forename"], Value::String("Alice".into()));
        assert_eq!(rows[0]["surname"], Value::String("Smith".into()));
        assert_eq!(rows[9]["forename"], Value::String("Jack".into()));
        assert_eq!(rows[9]["tutor_group_id"], Value::Number(1.0));
    }

    #[test]
    fn test_tutor_groups_bit_exact() {
        let rows = tutor_groups_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["tutor_name"], Value::String("Amelia Bennett".into()));
        assert_eq!(rows[2]["room"], Value::String("C3".into()));
    }

    #[test]
    fn test_grades_starts_empty_but_typed() {
        let catalog = seeded_catalog();
        assert_eq!(catalog.rows_of("grades").unwrap().len(), 0);
        let schema = catalog.schema_of("grades").unwrap();
        assert_eq!(schema.columns.len(), 4);
        assert!(schema.is_protected);
    }
}
