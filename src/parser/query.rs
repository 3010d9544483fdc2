//! `SELECT` query parsing.

use super::Parser;
use crate::ast::*;
use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, TokenKind};

impl<'a> Parser<'a> {
    /// ```text
    /// query := SELECT [DISTINCT] select_list FROM ident
    ///          [[INNER] JOIN ident ON col_ref = col_ref]
    ///          [WHERE predicate]
    ///          [GROUP BY col_ref (',' col_ref)*]
    ///          [ORDER BY col_ref [ASC|DESC]]
    ///          [LIMIT number]
    /// ```
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        self.expect_keyword(Keyword::Select)?;
        let distinct = self.consume_keyword(Keyword::Distinct)?.is_some();
        let select_list = self.parse_select_list()?;

        self.expect_keyword(Keyword::From)?;
        let from = self.parse_identifier()?;

        let join = if self.check_keyword(Keyword::Inner)? || self.check_keyword(Keyword::Join)? {
            Some(self.parse_join()?)
        } else {
            None
        };

        let where_clause = if self.consume_keyword(Keyword::Where)?.is_some() {
            Some(self.parse_predicate()?)
        } else {
            None
        };

        let group_by = if self.consume_keyword(Keyword::Group)?.is_some() {
            self.expect_keyword(Keyword::By)?;
            let mut cols = vec![self.parse_column_ref()?];
            while self.consume(&TokenKind::Comma)?.is_some() {
                cols.push(self.parse_column_ref()?);
            }
            cols
        } else {
            Vec::new()
        };

        let order_by = if self.consume_keyword(Keyword::Order)?.is_some() {
            self.expect_keyword(Keyword::By)?;
            let column = self.parse_column_ref()?;
            let desc = if self.consume_keyword(Keyword::Desc)?.is_some() {
                true
            } else {
                self.consume_keyword(Keyword::Asc)?;
                false
            };
            Some(OrderBy { column, desc })
        } else {
            None
        };

        let limit = if self.consume_keyword(Keyword::Limit)?.is_some() {
            Some(self.parse_limit_number()?)
        } else {
            None
        };

        Ok(Query {
            distinct,
            select_list,
            from,
            join,
            where_clause,
            group_by,
            order_by,
            limit,
        })
    }

    fn parse_limit_number(&mut self) -> Result<u64> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Number(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as u64),
            _ => Err(Error::syntax(
                "LIMIT requires a non-negative integer",
                token.span.start,
            )),
        }
    }

    /// `[INNER] JOIN ident ON col_ref = col_ref`
    fn parse_join(&mut self) -> Result<JoinClause> {
        let start = self.peek()?.span.start;
        self.consume_keyword(Keyword::Inner)?;
        self.expect_keyword(Keyword::Join)?;
        let table = self.parse_identifier()?;
        self.expect_keyword(Keyword::On)?;
        let left = self.parse_column_ref()?;
        self.expect(&TokenKind::Eq)?;
        let right = self.parse_column_ref()?;
        let end = self.current_position();
        Ok(JoinClause {
            table,
            left,
            right,
            span: Span::new(start, end),
        })
    }

    /// `select_list := '*' | item (',' item)*`
    fn parse_select_list(&mut self) -> Result<SelectList> {
        if self.consume(&TokenKind::Star)?.is_some() {
            return Ok(SelectList::Star);
        }
        let mut items = vec![self.parse_select_item()?];
        while self.consume(&TokenKind::Comma)?.is_some() {
            items.push(self.parse_select_item()?);
        }
        Ok(SelectList::Items(items))
    }

    /// `item := (agg | col_ref) [alias]`
    fn parse_select_item(&mut self) -> Result<SelectItem> {
        let token = self.peek()?.clone();
        let expr = match &token.kind {
            TokenKind::Keyword(
                kw @ (Keyword::Count | Keyword::Sum | Keyword::Avg | Keyword::Min | Keyword::Max),
            ) => SelectItemExpr::Aggregate(self.parse_aggregate(*kw)?),
            _ => SelectItemExpr::Column(self.parse_column_ref()?),
        };
        let alias = self.parse_optional_alias()?;
        Ok(SelectItem { expr, alias })
    }

    /// `agg := (COUNT|SUM|AVG|MIN|MAX) '(' ('*' | col_ref) ')'`
    fn parse_aggregate(&mut self, kw: Keyword) -> Result<Aggregate> {
        let start = self.peek()?.span.start;
        self.advance()?;
        let func = match kw {
            Keyword::Count => AggFunc::Count,
            Keyword::Sum => AggFunc::Sum,
            Keyword::Avg => AggFunc::Avg,
            Keyword::Min => AggFunc::Min,
            Keyword::Max => AggFunc::Max,
            _ => unreachable!("parse_aggregate called with a non-aggregate keyword"),
        };
        self.expect(&TokenKind::LParen)?;
        let arg = if self.consume(&TokenKind::Star)?.is_some() {
            if func != AggFunc::Count {
                return Err(Error::syntax(
                    "'*' is only valid inside COUNT",
                    self.current_position(),
                ));
            }
            AggArg::Star
        } else {
            AggArg::Column(self.parse_column_ref()?)
        };
        self.expect(&TokenKind::RParen)?;
        let end = self.current_position();
        Ok(Aggregate {
            func,
            arg,
            span: Span::new(start, end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_query(sql: &str) -> Query {
        let mut parser = Parser::new(sql);
        match parser.parse().unwrap().kind {
            StatementKind::Query(q) => *q,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_star_select() {
        let q = parse_query("SELECT * FROM students");
        assert!(matches!(q.select_list, SelectList::Star));
        assert_eq!(q.from.name, "students");
    }

    #[test]
    fn test_distinct() {
        let q = parse_query("SELECT DISTINCT surname FROM students");
        assert!(q.distinct);
    }

    #[test]
    fn test_alias_without_as() {
        let q = parse_query("SELECT forename name FROM students");
        match q.select_list {
            SelectList::Items(items) => {
                assert_eq!(items[0].alias.as_ref().unwrap().name, "name");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_alias_lookahead_stops_at_from() {
        // `forename` here must NOT be swallowed as an alias of itself by a
        // clause keyword; FROM always ends the select list.
        let q = parse_query("SELECT forename FROM students");
        match q.select_list {
            SelectList::Items(items) => assert!(items[0].alias.is_none()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_count_star() {
        let q = parse_query("SELECT COUNT(*) FROM students");
        match q.select_list {
            SelectList::Items(items) => {
                assert!(matches!(
                    items[0].expr,
                    SelectItemExpr::Aggregate(Aggregate {
                        func: AggFunc::Count,
                        arg: AggArg::Star,
                        ..
                    })
                ));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_star_only_valid_in_count() {
        let mut parser = Parser::new("SELECT SUM(*) FROM students");
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_join() {
        let q = parse_query(
            "SELECT * FROM students INNER JOIN tutor_groups ON students.tutor_group_id = tutor_groups.tutor_group_id",
        );
        let join = q.join.unwrap();
        assert_eq!(join.table.name, "tutor_groups");
    }

    #[test]
    fn test_group_by_order_by_limit() {
        let q = parse_query(
            "SELECT tutor_group_id, COUNT(*) FROM students GROUP BY tutor_group_id ORDER BY tutor_group_id DESC LIMIT 2",
        );
        assert_eq!(q.group_by.len(), 1);
        assert!(q.order_by.unwrap().desc);
        assert_eq!(q.limit, Some(2));
    }

    #[test]
    fn test_negative_limit_is_syntax_error() {
        let mut parser = Parser::new("SELECT * FROM students LIMIT -1");
        assert!(parser.parse().is_err());
    }
}
