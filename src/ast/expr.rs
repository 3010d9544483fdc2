//! Expression-level AST: column references, literals, aggregates, and the
//! comparisons that make up a `WHERE`/`ON` predicate.

use crate::error::Span;

/// A (possibly qualified) reference to a column: `col` or `table.col`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// The qualifier as written (`t` in `t.c`), if any.
    pub qualifier: Option<String>,
    pub column: String,
    pub span: Span,
    /// Filled in by the validator once the owning table is resolved.
    pub resolved_table: Option<String>,
}

impl ColumnRef {
    pub fn new(qualifier: Option<String>, column: impl Into<String>, span: Span) -> Self {
        Self {
            qualifier,
            column: column.into(),
            span,
            resolved_table: None,
        }
    }

    /// The name as written in the source (`t.c` or `c`), used for default
    /// output column naming.
    pub fn written_form(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.column),
            None => self.column.clone(),
        }
    }
}

/// A literal value appearing in source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// One side of a comparison: either a column reference or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(ColumnRef),
    Literal(Literal),
}

/// A supported aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggFunc {
    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Count => "COUNT",
            AggFunc::Sum => "SUM",
            AggFunc::Avg => "AVG",
            AggFunc::Min => "MIN",
            AggFunc::Max => "MAX",
        }
    }
}

/// The argument of an aggregate call: `*` (valid only for `COUNT`) or a
/// column reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AggArg {
    Star,
    Column(ColumnRef),
}

/// An aggregate function call, e.g. `COUNT(*)` or `AVG(grades.score)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub func: AggFunc,
    pub arg: AggArg,
    pub span: Span,
}

impl Aggregate {
    /// The canonical `F(arg)` name used for output columns without an
    /// explicit alias.
    pub fn canonical_name(&self) -> String {
        let arg = match &self.arg {
            AggArg::Star => "*".to_string(),
            AggArg::Column(c) => c.written_form(),
        };
        format!("{}({})", self.func.name(), arg)
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
}

/// A single comparison in a predicate. A bare operand (no explicit operator)
/// is shorthand for `operand = TRUE`.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Binary {
        left: Operand,
        op: CompareOp,
        right: Operand,
        span: Span,
    },
    Bare {
        operand: Operand,
        span: Span,
    },
}

impl Comparison {
    pub fn span(&self) -> Span {
        match self {
            Comparison::Binary { span, .. } => *span,
            Comparison::Bare { span, .. } => *span,
        }
    }
}

/// A `WHERE`/`ON` predicate: an AND-conjunction of comparisons. There is no
/// OR and no parenthesisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate(pub Vec<Comparison>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref_written_form() {
        let unqualified = ColumnRef::new(None, "forename", Span::point(0));
        assert_eq!(unqualified.written_form(), "forename");

        let qualified = ColumnRef::new(Some("students".to_string()), "forename", Span::point(0));
        assert_eq!(qualified.written_form(), "students.forename");
    }

    #[test]
    fn test_aggregate_canonical_name() {
        let count_star = Aggregate {
            func: AggFunc::Count,
            arg: AggArg::Star,
            span: Span::point(0),
        };
        assert_eq!(count_star.canonical_name(), "COUNT(*)");

        let avg_score = Aggregate {
            func: AggFunc::Avg,
            arg: AggArg::Column(ColumnRef::new(None, "score", Span::point(0))),
            span: Span::point(0),
        };
        assert_eq!(avg_score.canonical_name(), "AVG(score)");
    }
}
