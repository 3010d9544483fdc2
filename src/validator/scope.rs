//! Name resolution scope for `SELECT` validation.

/// One table available for column resolution, keyed by its own name — the
/// grammar has no table aliases, so the name in scope is always the table's
/// own (case-sensitive) name.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    pub name: String,
    pub columns: Vec<String>,
}

/// The set of tables visible while resolving a query's columns: the `FROM`
/// table, plus the joined table if present.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    tables: Vec<ScopeTable>,
}

/// The result of resolving an unqualified column name against a [`Scope`].
pub enum ColumnLookup {
    Found(String),
    NotFound,
    Ambiguous(Vec<String>),
}

impl Scope {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn add_table(&mut self, table: ScopeTable) {
        self.tables.push(table);
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    /// Resolve `table.column`: the table must be in scope and own the column.
    pub fn resolve_qualified(&self, table: &str, column: &str) -> Option<String> {
        self.tables
            .iter()
            .find(|t| t.name == table && t.columns.iter().any(|c| c == column))
            .map(|t| t.name.clone())
    }

    /// Resolve a bare `column` across every table in scope. Ambiguous if
    /// more than one table owns a column with this name.
    pub fn resolve_unqualified(&self, column: &str) -> ColumnLookup {
        let owners: Vec<&str> = self
            .tables
            .iter()
            .filter(|t| t.columns.iter().any(|c| c == column))
            .map(|t| t.name.as_str())
            .collect();
        match owners.len() {
            0 => ColumnLookup::NotFound,
            1 => ColumnLookup::Found(owners[0].to_string()),
            _ => ColumnLookup::Ambiguous(owners.into_iter().map(String::from).collect()),
        }
    }
}
