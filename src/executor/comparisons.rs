//! Runtime comparison and `LIKE` evaluation.

use crate::ast::{CompareOp, Comparison, Literal, Operand, Predicate};
use crate::types::Value;

use super::scoped_row::ScopedRow;

/// `predicate := comparison (AND comparison)*`; all must hold.
pub(super) fn evaluate_predicate(predicate: &Predicate, row: &ScopedRow) -> bool {
    predicate
        .0
        .iter()
        .all(|comparison| evaluate_comparison(comparison, row))
}

pub(super) fn evaluate_comparison(comparison: &Comparison, row: &ScopedRow) -> bool {
    match comparison {
        Comparison::Binary { left, op, right, .. } => {
            let left = operand_value(left, row);
            let right = operand_value(right, row);
            compare(*op, &left, &right)
        }
        Comparison::Bare { operand, .. } => {
            let value = operand_value(operand, row);
            compare(CompareOp::Eq, &value, &Value::Boolean(true))
        }
    }
}

pub(super) fn operand_value(operand: &Operand, row: &ScopedRow) -> Value {
    match operand {
        Operand::Literal(literal) => literal_value(literal),
        Operand::Column(column_ref) => row
            .get(column_ref.resolved_table.as_deref(), &column_ref.column)
            .cloned()
            .unwrap_or(Value::Null),
    }
}

pub(super) fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    }
}

/// Any `NULL` operand makes a comparison false. Otherwise: numbers compare
/// numerically, everything else compares as strings.
pub(super) fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return false;
    }
    if op == CompareOp::Like {
        return like_match(&stringify(left), &stringify(right));
    }

    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        _ => stringify(left).partial_cmp(&stringify(right)),
    };
    let Some(ordering) = ordering else { return false };

    match op {
        CompareOp::Eq => ordering.is_eq(),
        CompareOp::NotEq => !ordering.is_eq(),
        CompareOp::Lt => ordering.is_lt(),
        CompareOp::LtEq => ordering.is_le(),
        CompareOp::Gt => ordering.is_gt(),
        CompareOp::GtEq => ordering.is_ge(),
        CompareOp::Like => unreachable!("LIKE handled above"),
    }
}

fn stringify(value: &Value) -> String {
    value.to_string()
}

/// `%` matches any sequence of characters (including none); every other
/// character, including other regex metacharacters, is literal. Matching is
/// case-insensitive and anchored to the full string.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    like_match_from(&text, &pattern)
}

fn like_match_from(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => {
            (0..=text.len()).any(|i| like_match_from(&text[i..], rest))
        }
        Some((c, rest)) => text
            .split_first()
            .is_some_and(|(t, trest)| t == c && like_match_from(trest, rest)),
    }
}

/// Value equality used by `DISTINCT` and group keys: `Null == Null`, numbers
/// by numeric equality, strings by byte equality, booleans by truth.
pub(super) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        _ => false,
    }
}
