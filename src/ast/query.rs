//! `SELECT` query AST.

use super::{ColumnRef, Ident, Predicate};
use crate::error::Span;

/// A single projected item: an aggregate or a column reference, plus its
/// optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: SelectItemExpr,
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItemExpr {
    Column(ColumnRef),
    Aggregate(super::Aggregate),
}

/// The select-list: `*` or an explicit, comma-separated item list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    Star,
    Items(Vec<SelectItem>),
}

/// `[INNER] JOIN table ON left = right`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: Ident,
    pub left: ColumnRef,
    pub right: ColumnRef,
    pub span: Span,
}

/// `ORDER BY col_ref [ASC|DESC]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub desc: bool,
}

/// A full `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub distinct: bool,
    pub select_list: SelectList,
    pub from: Ident,
    pub join: Option<JoinClause>,
    pub where_clause: Option<Predicate>,
    pub group_by: Vec<ColumnRef>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
}
