//! DDL/DML statement AST: `CREATE TABLE`, `ALTER TABLE`, `DROP TABLE`,
//! `INSERT`, `UPDATE`, `DELETE`.

use super::{Ident, Predicate};
use crate::error::Span;
use crate::types::SqlType;

/// A column definition inside `CREATE TABLE`/`ALTER TABLE ADD COLUMN`. The
/// type name is normalised to a [`SqlType`] at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefAst {
    pub name: Ident,
    pub ty: SqlType,
    pub size: Option<u32>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub not_null: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: Ident,
    pub columns: Vec<ColumnDefAst>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    pub name: Ident,
    pub add_column: ColumnDefAst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Ident,
    pub columns: Vec<Ident>,
    pub values: Vec<super::Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Ident,
    pub value: super::Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Ident,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Ident,
    pub where_clause: Option<Predicate>,
}
