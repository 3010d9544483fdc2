//! Schema definitions for tables and columns.

use indexmap::IndexMap;

use crate::types::SqlType;

/// Schema information for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns, in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Name of the primary key column, if any. At most one per table.
    pub primary_key: Option<String>,
    /// Seed tables (`students`, `tutor_groups`, `grades`) are protected:
    /// INSERT/UPDATE/DELETE/DROP/ALTER all reject against them.
    pub is_protected: bool,
    /// Per-column AUTO_INCREMENT counters, keyed by column name.
    pub auto_increment_counters: IndexMap<String, i64>,
}

impl TableSchema {
    /// Create a new, unprotected table schema with fresh counters.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let primary_key = columns
            .iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name.clone());
        let auto_increment_counters = columns
            .iter()
            .filter(|c| c.auto_increment)
            .map(|c| (c.name.clone(), 0i64))
            .collect();
        Self {
            name: name.into(),
            columns,
            primary_key,
            is_protected: false,
            auto_increment_counters,
        }
    }

    /// Mark this schema as protected (used for the seeded tables).
    pub fn protected(mut self) -> Self {
        self.is_protected = true;
        self
    }

    /// Get a column by name. Table/column lookups are case-sensitive.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column's declaration index by name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// All column names, in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Advance and return `column`'s AUTO_INCREMENT counter. Panics if
    /// `column` has no counter registered — callers must only invoke this
    /// for columns already known to be `auto_increment`.
    pub fn next_auto_increment(&mut self, column: &str) -> i64 {
        let counter = self
            .auto_increment_counters
            .get_mut(column)
            .expect("auto_increment column has a counter");
        *counter += 1;
        *counter
    }

    /// Raise `column`'s AUTO_INCREMENT counter to `explicit` if it's
    /// currently behind. Used whenever a caller writes a numeric value
    /// directly into an AUTO_INCREMENT column, so a later omitted-value
    /// INSERT still produces a fresh id. No-op for non-auto_increment
    /// columns.
    pub fn bump_auto_increment_if_greater(&mut self, column: &str, explicit: i64) {
        if let Some(counter) = self.auto_increment_counters.get_mut(column) {
            if explicit > *counter {
                *counter = explicit;
            }
        }
    }
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Normalised SQL type.
    pub ty: SqlType,
    /// Optional declared size, e.g. `VARCHAR(255)`. Parsed and retained but
    /// never enforced.
    pub size: Option<u32>,
    /// Whether NULL is rejected for this column. Implied `true` when
    /// `is_primary_key` or `auto_increment` is set.
    pub not_null: bool,
    /// Whether this column is the table's primary key.
    pub is_primary_key: bool,
    /// Whether this column auto-increments on INSERT when no value is
    /// supplied. Valid only on `Number` columns.
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Create a new, nullable column definition.
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            size: None,
            not_null: false,
            is_primary_key: false,
            auto_increment: false,
        }
    }

    /// Mark this column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark this column the table's primary key (implies NOT NULL).
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.not_null = true;
        self
    }

    /// Mark this column AUTO_INCREMENT (implies NOT NULL).
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.not_null = true;
        self
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Builder for table schemas, used mainly to assemble the seeded tables.
#[derive(Debug, Default)]
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchemaBuilder {
    /// Create a new table schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column.
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Build the table schema.
    pub fn build(self) -> TableSchema {
        TableSchema::new(self.name, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_schema_case_sensitive_lookup() {
        let table = TableSchemaBuilder::new("students")
            .column(ColumnDef::new("student_id", SqlType::Number).primary_key())
            .column(ColumnDef::new("forename", SqlType::String).not_null())
            .build();

        assert_eq!(table.name, "students");
        assert_eq!(table.columns.len(), 2);
        assert!(table.get_column("forename").is_some());
        // Case-sensitive: a differently-cased name must not resolve.
        assert!(table.get_column("FORENAME").is_none());
        assert!(table.get_column("Forename").is_none());
    }

    #[test]
    fn test_primary_key_detection() {
        let table = TableSchemaBuilder::new("t")
            .column(ColumnDef::new("id", SqlType::Number).primary_key())
            .column(ColumnDef::new("name", SqlType::String))
            .build();
        assert_eq!(table.primary_key.as_deref(), Some("id"));
        let id = table.get_column("id").unwrap();
        assert!(id.is_primary_key);
        assert!(id.not_null);
    }

    #[test]
    fn test_auto_increment_implies_not_null_and_counter() {
        let table = TableSchemaBuilder::new("t")
            .column(ColumnDef::new("id", SqlType::Number).auto_increment())
            .build();
        let id = table.get_column("id").unwrap();
        assert!(id.not_null);
        assert_eq!(table.auto_increment_counters.get("id"), Some(&0));
    }
}
