//! Builder pattern for assembling a [`Catalog`](super::Catalog).

use super::schema::TableSchema;
use super::Catalog;

/// Fluent builder for constructing a catalog from a handful of table
/// schemas, used internally to assemble the seeded catalog and useful to
/// a host embedding the engine with its own starter tables.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Create an empty catalog builder.
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
        }
    }

    /// Add a pre-built table schema with its initial rows.
    ///
    /// Panics if a table with the same name was already added; this is a
    /// builder-time programmer error, not a runtime `execute()` failure.
    pub fn add_table(mut self, schema: TableSchema, rows: Vec<super::Row>) -> Self {
        let name = schema.name.clone();
        self.catalog
            .create_table(schema)
            .expect("duplicate table name in CatalogBuilder");
        for row in rows {
            self.catalog
                .rows_mut(&name)
                .expect("table just inserted")
                .push(row);
        }
        self
    }

    /// Finish building and return the catalog.
    pub fn build(self) -> Catalog {
        self.catalog
    }
}
