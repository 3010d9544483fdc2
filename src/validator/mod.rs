//! Semantic validation for `SELECT` queries.
//!
//! Resolves every column reference against the catalog, annotating
//! [`ColumnRef::resolved_table`] in place, and enforces the
//! aggregate/`GROUP BY` discipline. Nothing here executes the query; a
//! failing check aborts with the first error encountered.

mod scope;

use scope::{ColumnLookup, Scope, ScopeTable};

use crate::ast::{AggArg, ColumnRef, Comparison, Operand, Query, SelectItemExpr, SelectList};
use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Validate a query against the catalog, resolving every column reference.
pub fn validate(query: &mut Query, catalog: &Catalog) -> Result<()> {
    let scope = build_scope(query, catalog)?;

    if let Some(join) = &mut query.join {
        resolve_column_ref(&mut join.left, &scope)?;
        resolve_column_ref(&mut join.right, &scope)?;
    }

    if let Some(predicate) = &mut query.where_clause {
        for comparison in &mut predicate.0 {
            resolve_comparison(comparison, &scope)?;
        }
    }

    for col in &mut query.group_by {
        resolve_column_ref(col, &scope)?;
    }

    resolve_select_list(query, &scope)?;

    if let Some(order_by) = &mut query.order_by {
        // Unresolvable ORDER BY columns are not an error here; the executor
        // falls back to an unsorted result (spec.md §4.6, step 6).
        let _ = resolve_column_ref(&mut order_by.column, &scope);
    }

    check_aggregate_discipline(query)
}

fn build_scope(query: &Query, catalog: &Catalog) -> Result<Scope> {
    let mut scope = Scope::new();

    let from_schema = catalog
        .schema_of(&query.from.name)
        .ok_or_else(|| Error::unknown_table(query.from.name.clone(), query.from.span.start))?;
    scope.add_table(ScopeTable {
        name: query.from.name.clone(),
        columns: from_schema
            .column_names()
            .into_iter()
            .map(String::from)
            .collect(),
    });

    if let Some(join) = &query.join {
        let join_schema = catalog
            .schema_of(&join.table.name)
            .ok_or_else(|| Error::unknown_table(join.table.name.clone(), join.table.span.start))?;
        scope.add_table(ScopeTable {
            name: join.table.name.clone(),
            columns: join_schema
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
        });
    }

    Ok(scope)
}

fn resolve_column_ref(column_ref: &mut ColumnRef, scope: &Scope) -> Result<()> {
    let pos = column_ref.span.start;
    match &column_ref.qualifier {
        Some(qualifier) => {
            if !scope.has_table(qualifier) {
                return Err(Error::unknown_table(qualifier.clone(), pos));
            }
            match scope.resolve_qualified(qualifier, &column_ref.column) {
                Some(table) => {
                    column_ref.resolved_table = Some(table);
                    Ok(())
                }
                None => Err(Error::unknown_column(column_ref.written_form(), pos)),
            }
        }
        None => match scope.resolve_unqualified(&column_ref.column) {
            ColumnLookup::Found(table) => {
                column_ref.resolved_table = Some(table);
                Ok(())
            }
            ColumnLookup::NotFound => {
                Err(Error::unknown_column(column_ref.column.clone(), pos))
            }
            ColumnLookup::Ambiguous(tables) => {
                Err(Error::ambiguous_column(column_ref.column.clone(), tables, pos))
            }
        },
    }
}

fn resolve_operand(operand: &mut Operand, scope: &Scope) -> Result<()> {
    match operand {
        Operand::Column(column_ref) => resolve_column_ref(column_ref, scope),
        Operand::Literal(_) => Ok(()),
    }
}

fn resolve_comparison(comparison: &mut Comparison, scope: &Scope) -> Result<()> {
    match comparison {
        Comparison::Binary { left, right, .. } => {
            resolve_operand(left, scope)?;
            resolve_operand(right, scope)
        }
        Comparison::Bare { operand, .. } => resolve_operand(operand, scope),
    }
}

fn resolve_select_list(query: &mut Query, scope: &Scope) -> Result<()> {
    match &mut query.select_list {
        SelectList::Star => {
            if !query.group_by.is_empty() {
                return Err(Error::syntax(
                    "SELECT * cannot be combined with GROUP BY",
                    query.from.span.start,
                ));
            }
            Ok(())
        }
        SelectList::Items(items) => {
            for item in items {
                match &mut item.expr {
                    SelectItemExpr::Column(column_ref) => resolve_column_ref(column_ref, scope)?,
                    SelectItemExpr::Aggregate(aggregate) => {
                        if let AggArg::Column(column_ref) = &mut aggregate.arg {
                            resolve_column_ref(column_ref, scope)?;
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

/// `A ⊆ G`: every non-aggregate select column must be a `GROUP BY` column,
/// once either aggregates or `GROUP BY` are present at all.
fn check_aggregate_discipline(query: &Query) -> Result<()> {
    let items = match &query.select_list {
        SelectList::Star => return Ok(()),
        SelectList::Items(items) => items,
    };

    let has_aggregate = items
        .iter()
        .any(|item| matches!(item.expr, SelectItemExpr::Aggregate(_)));
    let has_group_by = !query.group_by.is_empty();

    if !has_aggregate && !has_group_by {
        return Ok(());
    }

    let grouped: Vec<(Option<&str>, &str)> = query
        .group_by
        .iter()
        .map(|c| (c.resolved_table.as_deref(), c.column.as_str()))
        .collect();

    for item in items {
        if let SelectItemExpr::Column(column_ref) = &item.expr {
            let key = (column_ref.resolved_table.as_deref(), column_ref.column.as_str());
            if !grouped.contains(&key) {
                return Err(Error::syntax(
                    format!(
                        "column '{}' must appear in GROUP BY or be used in an aggregate",
                        column_ref.written_form()
                    ),
                    column_ref.span.start,
                ));
            }
        }
    }

    Ok(())
}
