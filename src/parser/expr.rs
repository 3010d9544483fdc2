//! Predicate and literal parsing, shared by `WHERE`, `ON`, and DML.

use super::Parser;
use crate::ast::*;
use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    /// `predicate := comparison (AND comparison)*`
    pub(super) fn parse_predicate(&mut self) -> Result<Predicate> {
        let mut comparisons = vec![self.parse_comparison()?];
        while self.consume_keyword(Keyword::And)?.is_some() {
            comparisons.push(self.parse_comparison()?);
        }
        Ok(Predicate(comparisons))
    }

    /// `comparison := operand op operand | bool_literal`
    fn parse_comparison(&mut self) -> Result<Comparison> {
        let start = self.peek()?.span.start;
        let left = self.parse_operand()?;

        let op = match &self.peek()?.kind {
            TokenKind::Eq => Some(CompareOp::Eq),
            TokenKind::NotEq => Some(CompareOp::NotEq),
            TokenKind::Lt => Some(CompareOp::Lt),
            TokenKind::LtEq => Some(CompareOp::LtEq),
            TokenKind::Gt => Some(CompareOp::Gt),
            TokenKind::GtEq => Some(CompareOp::GtEq),
            TokenKind::Keyword(Keyword::Like) => Some(CompareOp::Like),
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance()?;
                let right = self.parse_operand()?;
                let end = self.current_position();
                Ok(Comparison::Binary {
                    left,
                    op,
                    right,
                    span: Span::new(start, end),
                })
            }
            None => {
                let end = self.current_position();
                Ok(Comparison::Bare {
                    operand: left,
                    span: Span::new(start, end),
                })
            }
        }
    }

    /// `operand := col_ref | number | string | TRUE | FALSE | NULL`
    pub(super) fn parse_operand(&mut self) -> Result<Operand> {
        let token = self.peek()?.clone();
        match &token.kind {
            TokenKind::Number(_) | TokenKind::String(_) => {
                Ok(Operand::Literal(self.parse_literal()?))
            }
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null) => {
                Ok(Operand::Literal(self.parse_literal()?))
            }
            TokenKind::Ident(_) => Ok(Operand::Column(self.parse_column_ref()?)),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                Ok(Operand::Column(self.parse_column_ref()?))
            }
            _ => Err(Error::syntax(
                format!("expected a column reference or literal, found {}", token.kind),
                token.span.start,
            )),
        }
    }

    /// `literal := number | string | TRUE | FALSE | NULL`
    pub(super) fn parse_literal(&mut self) -> Result<Literal> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Number(n) => Ok(Literal::Number(n)),
            TokenKind::String(s) => Ok(Literal::String(s)),
            TokenKind::Keyword(Keyword::True) => Ok(Literal::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Literal::Boolean(false)),
            TokenKind::Keyword(Keyword::Null) => Ok(Literal::Null),
            _ => Err(Error::invalid_literal(
                format!("expected a literal, found {}", token.kind),
                token.span.start,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_where(sql: &str) -> Predicate {
        let full = format!("SELECT * FROM t WHERE {}", sql);
        let mut parser = Parser::new(&full);
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::Query(q) => q.where_clause.unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_simple_comparison() {
        let pred = parse_where("age > 18");
        assert_eq!(pred.0.len(), 1);
        assert!(matches!(
            pred.0[0],
            Comparison::Binary {
                op: CompareOp::Gt,
                ..
            }
        ));
    }

    #[test]
    fn test_and_conjunction() {
        let pred = parse_where("age > 18 AND name = 'Alice'");
        assert_eq!(pred.0.len(), 2);
    }

    #[test]
    fn test_not_equal_synonyms() {
        let a = parse_where("age != 18");
        let b = parse_where("age <> 18");
        assert!(matches!(
            a.0[0],
            Comparison::Binary {
                op: CompareOp::NotEq,
                ..
            }
        ));
        assert!(matches!(
            b.0[0],
            Comparison::Binary {
                op: CompareOp::NotEq,
                ..
            }
        ));
    }

    #[test]
    fn test_bare_boolean_comparison() {
        let pred = parse_where("active");
        assert!(matches!(pred.0[0], Comparison::Bare { .. }));
    }

    #[test]
    fn test_like_operator() {
        let pred = parse_where("name LIKE 'A%'");
        assert!(matches!(
            pred.0[0],
            Comparison::Binary {
                op: CompareOp::Like,
                ..
            }
        ));
    }
}
