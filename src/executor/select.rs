//! `SELECT` execution: join, filter, group/aggregate, project, distinct,
//! order, limit — run strictly in that order (spec.md §4.6).

use crate::ast::{
    AggFunc, Aggregate, ColumnRef, CompareOp, Operand, OrderBy, Query, SelectItem, SelectItemExpr,
    SelectList,
};
use crate::catalog::{Catalog, TableSchema};
use crate::error::{Error, Result};
use crate::types::Value;

use super::comparisons::{compare, evaluate_predicate, operand_value, values_equal};
use super::scoped_row::ScopedRow;

/// Run a `SELECT` against the catalog and return `(columns, rows)`.
pub(super) fn execute_select(query: &Query, catalog: &Catalog) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let from_name = query.from.name.as_str();
    let from_schema = catalog
        .schema_of(from_name)
        .ok_or_else(|| Error::internal(format!("validated table '{}' vanished", from_name)))?;
    let from_rows = catalog
        .rows_of(from_name)
        .ok_or_else(|| Error::internal(format!("validated table '{}' vanished", from_name)))?;

    let join_info = match &query.join {
        Some(join) => {
            let schema = catalog.schema_of(&join.table.name).ok_or_else(|| {
                Error::internal(format!("validated table '{}' vanished", join.table.name))
            })?;
            let rows = catalog.rows_of(&join.table.name).ok_or_else(|| {
                Error::internal(format!("validated table '{}' vanished", join.table.name))
            })?;
            Some((join.table.name.as_str(), schema, rows))
        }
        None => None,
    };
    let has_join = join_info.is_some();

    let mut scoped: Vec<ScopedRow<'_>> = Vec::new();
    match &join_info {
        None => {
            for row in from_rows {
                scoped.push(ScopedRow::single(from_name, row));
            }
        }
        Some((join_name, _, join_rows)) => {
            let join = query.join.as_ref().expect("join_info implies query.join");
            for from_row in from_rows {
                for join_row in join_rows.iter() {
                    let candidate =
                        ScopedRow::joined((from_name, from_row), (join_name, join_row));
                    if evaluate_join_on(&join.left, &join.right, &candidate) {
                        scoped.push(candidate);
                    }
                }
            }
        }
    }

    if let Some(predicate) = &query.where_clause {
        scoped.retain(|row| evaluate_predicate(predicate, row));
    }

    let join_pair = join_info.as_ref().map(|(name, schema, _)| (*name, schema));

    let has_aggregate = matches!(
        &query.select_list,
        SelectList::Items(items) if items.iter().any(|i| matches!(i.expr, SelectItemExpr::Aggregate(_)))
    );
    let grouping = has_aggregate || !query.group_by.is_empty();

    let (columns, mut rows, representative): (Vec<String>, Vec<Vec<Value>>, Vec<Option<ScopedRow<'_>>>) =
        if grouping {
            let items = match &query.select_list {
                SelectList::Items(items) => items,
                SelectList::Star => {
                    return Err(Error::internal(
                        "SELECT * cannot reach the grouped execution path",
                    ))
                }
            };
            let columns = item_columns(items, has_join);
            let groups = partition_into_groups(scoped, &query.group_by);
            let mut rows = Vec::with_capacity(groups.len());
            let mut representative = Vec::with_capacity(groups.len());
            for (key_values, group_rows) in &groups {
                rows.push(
                    items
                        .iter()
                        .map(|item| project_grouped_item(item, &query.group_by, key_values, group_rows))
                        .collect(),
                );
                representative.push(group_rows.first().cloned());
            }
            (columns, rows, representative)
        } else {
            match &query.select_list {
                SelectList::Star => {
                    let columns = star_columns(from_name, from_schema, join_pair);
                    let rows = scoped
                        .iter()
                        .map(|row| project_star(from_name, from_schema, join_pair, row))
                        .collect();
                    let representative = scoped.iter().cloned().map(Some).collect();
                    (columns, rows, representative)
                }
                SelectList::Items(items) => {
                    let columns = item_columns(items, has_join);
                    let rows = scoped
                        .iter()
                        .map(|row| {
                            items
                                .iter()
                                .map(|item| match &item.expr {
                                    SelectItemExpr::Column(c) => {
                                        operand_value(&Operand::Column(c.clone()), row)
                                    }
                                    SelectItemExpr::Aggregate(_) => unreachable!(
                                        "aggregates force the grouped execution path"
                                    ),
                                })
                                .collect()
                        })
                        .collect();
                    let representative = scoped.iter().cloned().map(Some).collect();
                    (columns, rows, representative)
                }
            }
        };

    let (mut rows, mut representative) = if query.distinct {
        apply_distinct(rows, representative)
    } else {
        (rows, representative)
    };

    if let Some(order_by) = &query.order_by {
        let (sorted_rows, sorted_rep) = apply_order(rows, representative, order_by, &columns);
        rows = sorted_rows;
        representative = sorted_rep;
    }
    let _ = representative;

    if let Some(limit) = query.limit {
        rows.truncate(limit as usize);
    }

    Ok((columns, rows))
}

fn evaluate_join_on(left: &ColumnRef, right: &ColumnRef, row: &ScopedRow) -> bool {
    let left = operand_value(&Operand::Column(left.clone()), row);
    let right = operand_value(&Operand::Column(right.clone()), row);
    compare(CompareOp::Eq, &left, &right)
}

fn star_columns(
    from_name: &str,
    from_schema: &TableSchema,
    join: Option<(&str, &TableSchema)>,
) -> Vec<String> {
    let qualify = join.is_some();
    let mut columns: Vec<String> = from_schema
        .column_names()
        .into_iter()
        .map(|c| {
            if qualify {
                format!("{}.{}", from_name, c)
            } else {
                c.to_string()
            }
        })
        .collect();
    if let Some((name, schema)) = join {
        columns.extend(
            schema
                .column_names()
                .into_iter()
                .map(|c| format!("{}.{}", name, c)),
        );
    }
    columns
}

fn project_star(
    from_name: &str,
    from_schema: &TableSchema,
    join: Option<(&str, &TableSchema)>,
    row: &ScopedRow,
) -> Vec<Value> {
    let mut values: Vec<Value> = from_schema
        .column_names()
        .into_iter()
        .map(|c| row.get(Some(from_name), c).cloned().unwrap_or(Value::Null))
        .collect();
    if let Some((name, schema)) = join {
        values.extend(
            schema
                .column_names()
                .into_iter()
                .map(|c| row.get(Some(name), c).cloned().unwrap_or(Value::Null)),
        );
    }
    values
}

fn item_columns(items: &[SelectItem], has_join: bool) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            if let Some(alias) = &item.alias {
                return alias.name.clone();
            }
            match &item.expr {
                SelectItemExpr::Aggregate(agg) => agg.canonical_name(),
                SelectItemExpr::Column(c) => output_name_for_column(c, has_join),
            }
        })
        .collect()
}

/// `t.c` when written qualified or when the scope has more than one table;
/// plain `c` otherwise.
fn output_name_for_column(column: &ColumnRef, has_join: bool) -> String {
    if column.qualifier.is_some() {
        column.written_form()
    } else if has_join {
        format!(
            "{}.{}",
            column.resolved_table.as_deref().unwrap_or(""),
            column.column
        )
    } else {
        column.column.clone()
    }
}

/// Partition rows into groups keyed by the grouping columns' values,
/// string-compared, preserving first-seen group order.
fn partition_into_groups<'a>(
    rows: Vec<ScopedRow<'a>>,
    group_by: &[ColumnRef],
) -> Vec<(Vec<Value>, Vec<ScopedRow<'a>>)> {
    let mut groups: Vec<(Vec<String>, Vec<Value>, Vec<ScopedRow<'a>>)> = Vec::new();
    // Aggregates without GROUP BY run over the whole rowset, even when it's
    // empty (COUNT(*) = 0, SUM/AVG/MIN/MAX = NULL) — seed one empty group
    // so that case still produces a row.
    if group_by.is_empty() {
        groups.push((Vec::new(), Vec::new(), Vec::new()));
    }
    for row in rows {
        let key_values: Vec<Value> = group_by
            .iter()
            .map(|c| row.get(c.resolved_table.as_deref(), &c.column).cloned().unwrap_or(Value::Null))
            .collect();
        let key_display: Vec<String> = key_values.iter().map(ToString::to_string).collect();
        match groups.iter_mut().find(|(display, _, _)| *display == key_display) {
            Some(group) => group.2.push(row),
            None => groups.push((key_display, key_values, vec![row])),
        }
    }
    groups
        .into_iter()
        .map(|(_, key_values, rows)| (key_values, rows))
        .collect()
}

fn project_grouped_item(
    item: &SelectItem,
    group_by: &[ColumnRef],
    key_values: &[Value],
    rows: &[ScopedRow],
) -> Value {
    match &item.expr {
        SelectItemExpr::Aggregate(agg) => evaluate_aggregate(agg, rows),
        SelectItemExpr::Column(c) => group_by
            .iter()
            .position(|g| g.resolved_table == c.resolved_table && g.column == c.column)
            .map(|i| key_values[i].clone())
            .unwrap_or(Value::Null),
    }
}

fn evaluate_aggregate(aggregate: &Aggregate, rows: &[ScopedRow]) -> Value {
    use crate::ast::AggArg;

    match aggregate.func {
        AggFunc::Count => match &aggregate.arg {
            AggArg::Star => Value::Number(rows.len() as f64),
            AggArg::Column(c) => {
                let count = rows
                    .iter()
                    .filter(|r| !column_value(r, c).is_null())
                    .count();
                Value::Number(count as f64)
            }
        },
        _ => {
            let column = match &aggregate.arg {
                AggArg::Column(c) => c,
                AggArg::Star => unreachable!("'*' is only valid inside COUNT"),
            };
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|r| match column_value(r, column) {
                    Value::Number(n) => Some(n),
                    _ => None,
                })
                .collect();
            if values.is_empty() {
                return Value::Null;
            }
            match aggregate.func {
                AggFunc::Sum => Value::Number(values.iter().sum()),
                AggFunc::Avg => {
                    let avg = values.iter().sum::<f64>() / values.len() as f64;
                    Value::Number(round_half_away_from_zero(avg, 2))
                }
                AggFunc::Min => Value::Number(values.iter().cloned().fold(f64::INFINITY, f64::min)),
                AggFunc::Max => {
                    Value::Number(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
                }
                AggFunc::Count => unreachable!("COUNT handled above"),
            }
        }
    }
}

fn column_value(row: &ScopedRow, column: &ColumnRef) -> Value {
    row.get(column.resolved_table.as_deref(), &column.column)
        .cloned()
        .unwrap_or(Value::Null)
}

fn round_half_away_from_zero(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    rounded / factor
}

fn apply_distinct<'a>(
    rows: Vec<Vec<Value>>,
    representative: Vec<Option<ScopedRow<'a>>>,
) -> (Vec<Vec<Value>>, Vec<Option<ScopedRow<'a>>>) {
    let mut out_rows: Vec<Vec<Value>> = Vec::new();
    let mut out_rep: Vec<Option<ScopedRow<'a>>> = Vec::new();
    for (row, rep) in rows.into_iter().zip(representative.into_iter()) {
        let is_duplicate = out_rows.iter().any(|existing| {
            existing.len() == row.len()
                && existing.iter().zip(row.iter()).all(|(a, b)| values_equal(a, b))
        });
        if !is_duplicate {
            out_rows.push(row);
            out_rep.push(rep);
        }
    }
    (out_rows, out_rep)
}

enum OrderSource {
    Projection(usize),
    ScopeFallback(Option<String>, String),
    Unresolvable,
}

fn resolve_order_source(order_by: &OrderBy, columns: &[String]) -> OrderSource {
    let qualified = order_by.column.written_form();
    if let Some(idx) = columns
        .iter()
        .position(|name| *name == qualified || *name == order_by.column.column)
    {
        return OrderSource::Projection(idx);
    }
    if order_by.column.resolved_table.is_some() {
        return OrderSource::ScopeFallback(
            order_by.column.resolved_table.clone(),
            order_by.column.column.clone(),
        );
    }
    OrderSource::Unresolvable
}

fn cmp_order_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn apply_order<'a>(
    rows: Vec<Vec<Value>>,
    representative: Vec<Option<ScopedRow<'a>>>,
    order_by: &OrderBy,
    columns: &[String],
) -> (Vec<Vec<Value>>, Vec<Option<ScopedRow<'a>>>) {
    let source = resolve_order_source(order_by, columns);

    let sort_keys: Vec<Value> = match &source {
        OrderSource::Projection(idx) => rows.iter().map(|row| row[*idx].clone()).collect(),
        OrderSource::ScopeFallback(table, column) => representative
            .iter()
            .map(|rep| {
                rep.as_ref()
                    .and_then(|row| row.get(table.as_deref(), column))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect(),
        OrderSource::Unresolvable => return (rows, representative),
    };

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.sort_by(|&a, &b| {
        let ordering = cmp_order_values(&sort_keys[a], &sort_keys[b]);
        if order_by.desc {
            ordering.reverse()
        } else {
            ordering
        }
    });

    let mut rows: Vec<Option<Vec<Value>>> = rows.into_iter().map(Some).collect();
    let mut representative: Vec<Option<Option<ScopedRow<'a>>>> =
        representative.into_iter().map(Some).collect();
    let sorted_rows = indices
        .iter()
        .map(|&i| rows[i].take().expect("each index visited once"))
        .collect();
    let sorted_rep = indices
        .iter()
        .map(|&i| representative[i].take().expect("each index visited once"))
        .collect();
    (sorted_rows, sorted_rep)
}
