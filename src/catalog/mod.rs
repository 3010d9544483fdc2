//! In-memory catalog: table schemas plus their row storage.
//!
//! The catalog is a single concrete value, not a pluggable storage trait —
//! this engine has exactly one backend, an in-process table store, so there
//! is nothing to abstract over. `Catalog` itself carries no staging or
//! rollback logic; mutation atomicity is the executor's job (it clones a
//! table's schema and rows, mutates the clone, and commits only on success —
//! see [`Catalog::stage`]/[`Catalog::commit`]).

mod builder;
mod schema;
mod seed;

pub use builder::CatalogBuilder;
pub use schema::{ColumnDef, TableSchema, TableSchemaBuilder};

use indexmap::IndexMap;

use crate::error::{ConstraintKind, Error, Result};
use crate::types::Value;

/// A single row: column name to value, covering every declared column.
pub type Row = IndexMap<String, Value>;

/// The in-memory catalog of tables and their rows.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: IndexMap<String, TableSchema>,
    rows: IndexMap<String, Vec<Row>>,
}

impl Catalog {
    /// An empty catalog with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog seeded with the three bit-exact starter tables
    /// (`students`, `tutor_groups`, `grades`).
    pub fn seeded() -> Self {
        seed::seeded_catalog()
    }

    // Read-only view -------------------------------------------------------

    /// Whether a table with this name exists. Case-sensitive.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Whether `table` exists and has a column named `column`.
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .map(|t| t.has_column(column))
            .unwrap_or(false)
    }

    /// The schema of a table, if it exists.
    pub fn schema_of(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// The rows of a table, if it exists.
    pub fn rows_of(&self, name: &str) -> Option<&[Row]> {
        self.rows.get(name).map(|v| v.as_slice())
    }

    /// Names of every table in the catalog, in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    // Staged-clone mutation discipline --------------------------------------

    /// Clone a table's schema and rows for an executor to mutate off to the
    /// side. Returns `None` if the table does not exist.
    pub(crate) fn stage(&self, name: &str) -> Option<(TableSchema, Vec<Row>)> {
        let schema = self.tables.get(name)?.clone();
        let rows = self.rows.get(name)?.clone();
        Some((schema, rows))
    }

    /// Swap a staged, mutated schema+rows pair back into the catalog. Only
    /// called once every check in the staged mutation has already
    /// succeeded.
    pub(crate) fn commit(&mut self, name: &str, schema: TableSchema, rows: Vec<Row>) {
        self.tables.insert(name.to_string(), schema);
        self.rows.insert(name.to_string(), rows);
    }

    /// Direct mutable access to a table's rows, used by [`CatalogBuilder`]
    /// while assembling seed data (no staging needed: nothing can fail).
    pub(crate) fn rows_mut(&mut self, name: &str) -> Option<&mut Vec<Row>> {
        self.rows.get_mut(name)
    }

    // DDL --------------------------------------------------------------

    /// `CREATE TABLE`. Rejects an existing table name.
    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(Error::constraint(
                ConstraintKind::DuplicateTable,
                schema.name.clone(),
            ));
        }
        let name = schema.name.clone();
        self.tables.insert(name.clone(), schema);
        self.rows.insert(name, Vec::new());
        Ok(())
    }

    /// `DROP TABLE`. Rejects a protected or unknown table.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let schema = self
            .tables
            .get(name)
            .ok_or_else(|| Error::unknown_table(name, 0))?;
        if schema.is_protected {
            return Err(Error::constraint(ConstraintKind::ProtectedTable, name));
        }
        self.tables.shift_remove(name);
        self.rows.shift_remove(name);
        Ok(())
    }
}
