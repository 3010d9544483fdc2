//! Recursive-descent parser.
//!
//! Converts a token stream into exactly one [`Statement`]. Trailing tokens
//! after the statement — other than a single optional semicolon — are a
//! `SyntaxError`; the engine never accepts a multi-statement script.

mod ddl;
mod expr;
mod query;

use crate::ast::*;
use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// Parses SQL text into an AST.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    /// Parse exactly one statement, silently consuming a single trailing
    /// semicolon. Anything left over is a syntax error.
    pub fn parse(&mut self) -> Result<Statement> {
        while self.consume(&TokenKind::Semicolon)?.is_some() {}
        let stmt = self.parse_statement()?;
        self.consume(&TokenKind::Semicolon)?;
        let token = self.peek()?;
        if !token.is_eof() {
            return Err(Error::syntax(
                format!("unexpected trailing input: {}", token.kind),
                token.span.start,
            ));
        }
        Ok(stmt)
    }

    /// Parse a single statement.
    fn parse_statement(&mut self) -> Result<Statement> {
        let token = self.peek()?;
        let start = token.span.start;

        let kind = match &token.kind {
            TokenKind::Keyword(kw) => match kw {
                Keyword::Select => {
                    let query = self.parse_query()?;
                    StatementKind::Query(Box::new(query))
                }
                Keyword::Create => self.parse_create_table()?,
                Keyword::Alter => self.parse_alter_table()?,
                Keyword::Drop => self.parse_drop_table()?,
                Keyword::Insert => self.parse_insert()?,
                Keyword::Update => self.parse_update()?,
                Keyword::Delete => self.parse_delete()?,
                reserved if reserved.is_reserved() => {
                    return Err(Error::unsupported(
                        format!("{} is not supported", reserved),
                        start,
                    ));
                }
                other => {
                    return Err(Error::syntax(
                        format!("expected a statement, found keyword {}", other),
                        start,
                    ));
                }
            },
            _ => {
                return Err(Error::syntax(
                    format!("expected a statement, found {}", token.kind),
                    start,
                ));
            }
        };

        let end = self.current_position();
        Ok(Statement::new(kind, Span::new(start, end)))
    }

    // ---------------------------------------------------------------
    // Shared parser utilities
    // ---------------------------------------------------------------

    fn current_position(&self) -> usize {
        self.lexer.position()
    }

    fn peek(&mut self) -> Result<&Token> {
        self.lexer.peek()
    }

    fn peek_nth(&mut self, n: usize) -> Result<&Token> {
        self.lexer.peek_nth(n)
    }

    fn advance(&mut self) -> Result<Token> {
        self.lexer.next_token_result()
    }

    fn check(&mut self, expected: &TokenKind) -> Result<bool> {
        Ok(&self.peek()?.kind == expected)
    }

    fn check_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        Ok(self.peek()?.is_keyword(keyword))
    }

    fn consume(&mut self, expected: &TokenKind) -> Result<Option<Token>> {
        self.lexer.consume(expected)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Option<Token>> {
        self.lexer.consume_keyword(keyword)
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Token> {
        self.lexer.expect(expected)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        self.lexer.expect_keyword(keyword)
    }

    /// Parse a bare identifier. A reserved-for-error keyword is rejected as
    /// `UnsupportedFeature`; any other keyword encountered where an
    /// identifier is required is a plain `SyntaxError`.
    fn parse_identifier(&mut self) -> Result<Ident> {
        let token = self.advance()?;
        match &token.kind {
            TokenKind::Ident(name) => Ok(Ident::new(name.clone(), token.span)),
            TokenKind::Keyword(kw) if kw.is_reserved() => Err(Error::unsupported(
                format!("{} is reserved and cannot be used as an identifier", kw),
                token.span.start,
            )),
            _ => Err(Error::syntax(
                format!("expected identifier, found {}", token.kind),
                token.span.start,
            )),
        }
    }

    /// Parse a column reference: `ident ['.' ident]`.
    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let first = self.parse_identifier()?;
        if self.consume(&TokenKind::Dot)?.is_some() {
            let second = self.parse_identifier()?;
            Ok(ColumnRef::new(
                Some(first.name),
                second.name,
                Span::new(first.span.start, second.span.end),
            ))
        } else {
            Ok(ColumnRef::new(None, first.name, first.span))
        }
    }

    /// Parse an optional alias: `AS ident`, or a bare identifier/non-reserved
    /// keyword that is not itself a clause keyword.
    fn parse_optional_alias(&mut self) -> Result<Option<Ident>> {
        if self.consume_keyword(Keyword::As)?.is_some() {
            return Ok(Some(self.parse_identifier_allow_reserved()?));
        }
        let token = self.peek()?;
        let looks_like_alias = match &token.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(kw) => !kw.is_reserved() && !Self::is_clause_keyword(*kw),
            _ => false,
        };
        if looks_like_alias {
            Ok(Some(self.parse_identifier_allow_reserved()?))
        } else {
            Ok(None)
        }
    }

    /// Aliases may shadow a non-reserved keyword (e.g. `SELECT x AS count`).
    fn parse_identifier_allow_reserved(&mut self) -> Result<Ident> {
        let token = self.advance()?;
        match &token.kind {
            TokenKind::Ident(name) => Ok(Ident::new(name.clone(), token.span)),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                Ok(Ident::new(token.text.clone(), token.span))
            }
            _ => Err(Error::syntax(
                format!("expected identifier, found {}", token.kind),
                token.span.start,
            )),
        }
    }

    /// Keywords that introduce a clause and therefore can never themselves
    /// be mistaken for a trailing alias.
    fn is_clause_keyword(kw: Keyword) -> bool {
        matches!(
            kw,
            Keyword::From
                | Keyword::Where
                | Keyword::Inner
                | Keyword::Join
                | Keyword::On
                | Keyword::Group
                | Keyword::Order
                | Keyword::Limit
                | Keyword::And
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_select() {
        let mut parser = Parser::new("SELECT * FROM students");
        let stmt = parser.parse().unwrap();
        assert!(matches!(stmt.kind, StatementKind::Query(_)));
    }

    #[test]
    fn test_trailing_semicolon_is_optional_and_consumed() {
        let mut parser = Parser::new("SELECT * FROM students;");
        parser.parse().unwrap();
    }

    #[test]
    fn test_trailing_tokens_after_statement_is_error() {
        let mut parser = Parser::new("SELECT * FROM students SELECT * FROM students");
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind(), crate::error::ErrorKind::SyntaxError(_)));
    }

    #[test]
    fn test_reserved_keyword_as_statement_is_unsupported() {
        let mut parser = Parser::new("HAVING");
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::UnsupportedFeature(_)
        ));
    }
}
