//! Tokenizer.
//!
//! Produces an ordered sequence of tokens with byte offsets. Whitespace is
//! a separator and never produces a token; there is no comment syntax.

mod token;

pub use token::{Keyword, Token, TokenKind};

use crate::error::{Error, Result, Span};

/// Tokenizer over a SQL statement's source text.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            peeked: Vec::new(),
        }
    }

    /// Get the current position in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_empty() {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[0])
    }

    /// Peek at the nth token ahead (0 = next token).
    pub fn peek_nth(&mut self, n: usize) -> Result<&Token> {
        while self.peeked.len() <= n {
            let token = self.scan_token()?;
            self.peeked.push(token);
        }
        Ok(&self.peeked[n])
    }

    /// Get the next token, consuming it.
    pub fn next_token_result(&mut self) -> Result<Token> {
        if !self.peeked.is_empty() {
            return Ok(self.peeked.remove(0));
        }
        self.scan_token()
    }

    /// Consume the next token if it matches the expected kind.
    pub fn consume(&mut self, expected: &TokenKind) -> Result<Option<Token>> {
        let token = self.peek()?;
        if &token.kind == expected {
            Ok(Some(self.next_token_result()?))
        } else {
            Ok(None)
        }
    }

    /// Consume the next token if it's the specified keyword.
    pub fn consume_keyword(&mut self, keyword: Keyword) -> Result<Option<Token>> {
        let token = self.peek()?;
        if token.is_keyword(keyword) {
            Ok(Some(self.next_token_result()?))
        } else {
            Ok(None)
        }
    }

    /// Expect and consume a specific token kind.
    pub fn expect(&mut self, expected: &TokenKind) -> Result<Token> {
        let token = self.next_token_result()?;
        if &token.kind == expected {
            Ok(token)
        } else {
            Err(Error::syntax(
                format!("expected {}, found {}", expected, token.kind),
                token.span.start,
            ))
        }
    }

    /// Expect and consume a specific keyword.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        let token = self.next_token_result()?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(Error::syntax(
                format!("expected keyword {}, found {}", keyword, token.kind),
                token.span.start,
            ))
        }
    }

    // Scanning ---------------------------------------------------------

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.pos;

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, Span::point(start), "")),
        };

        match c {
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dot, start))
            }
            ',' => {
                self.advance();
                Ok(self.make_token(TokenKind::Comma, start))
            }
            ';' => {
                self.advance();
                Ok(self.make_token(TokenKind::Semicolon, start))
            }
            '*' => {
                self.advance();
                Ok(self.make_token(TokenKind::Star, start))
            }
            '(' => {
                self.advance();
                Ok(self.make_token(TokenKind::LParen, start))
            }
            ')' => {
                self.advance();
                Ok(self.make_token(TokenKind::RParen, start))
            }
            '=' => {
                self.advance();
                Ok(self.make_token(TokenKind::Eq, start))
            }
            '!' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::NotEq, start))
                } else {
                    Err(Error::syntax(
                        "unexpected character '!'; did you mean '!='?",
                        start,
                    ))
                }
            }
            '<' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        Ok(self.make_token(TokenKind::LtEq, start))
                    }
                    Some('>') => {
                        self.advance();
                        Ok(self.make_token(TokenKind::NotEq, start))
                    }
                    _ => Ok(self.make_token(TokenKind::Lt, start)),
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::GtEq, start))
                } else {
                    Ok(self.make_token(TokenKind::Gt, start))
                }
            }
            '\'' => self.scan_string(start),
            '"' => Err(Error::syntax(
                "double-quoted literals are not supported; use single quotes",
                start,
            )),
            c if c.is_ascii_digit() => self.scan_number(start),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier_or_keyword(start),
            other => Err(Error::syntax(
                format!("unexpected character '{}'", other),
                start,
            )),
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<Token> {
        // Opening quote already peeked, not yet consumed.
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => return Err(Error::syntax("unterminated string literal", start)),
                Some('\'') => {
                    self.advance();
                    if self.peek_char() == Some('\'') {
                        // `''` is an escaped single quote.
                        self.advance();
                        value.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        let text = self.input[start..self.pos].to_string();
        Ok(Token::new(TokenKind::String(value), Span::new(start, self.pos), text))
    }

    fn scan_number(&mut self, start: usize) -> Result<Token> {
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_char() == Some('.') {
            self.advance();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = self.input[start..self.pos].to_string();
        let value: f64 = text
            .parse()
            .map_err(|_| Error::invalid_literal(format!("invalid number '{}'", text), start))?;
        Ok(Token::new(TokenKind::Number(value), Span::new(start, self.pos), text))
    }

    fn scan_identifier_or_keyword(&mut self, start: usize) -> Result<Token> {
        while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = self.input[start..self.pos].to_string();
        let upper = text.to_ascii_uppercase();
        let span = Span::new(start, self.pos);
        match Keyword::from_str(&upper) {
            Some(kw) => Ok(Token::new(TokenKind::Keyword(kw), span, text)),
            None => Ok(Token::new(TokenKind::Ident(text.clone()), span, text)),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        let text = self.input[start..self.pos].to_string();
        Token::new(kind, Span::new(start, self.pos), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(sql: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(sql);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token_result().unwrap();
            let eof = tok.is_eof();
            out.push(tok.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn test_simple_select() {
        let toks = tokens("SELECT * FROM students");
        assert_eq!(
            toks,
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Star,
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident("students".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let toks = tokens("42 3.14 0");
        assert_eq!(
            toks,
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.14),
                TokenKind::Number(0.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let toks = tokens("'O''Brien'");
        assert_eq!(
            toks,
            vec![TokenKind::String("O'Brien".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_is_syntax_error() {
        let mut lexer = Lexer::new("'abc");
        let err = lexer.next_token_result().unwrap_err();
        assert!(matches!(err.kind(), crate::error::ErrorKind::SyntaxError(_)));
    }

    #[test]
    fn test_double_quote_rejected() {
        let mut lexer = Lexer::new("\"abc\"");
        let err = lexer.next_token_result().unwrap_err();
        assert!(matches!(err.kind(), crate::error::ErrorKind::SyntaxError(_)));
    }

    #[test]
    fn test_operators() {
        let toks = tokens("= != <> < <= > >=");
        assert_eq!(
            toks,
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let toks = tokens("select Select SELECT");
        for t in &toks[..3] {
            assert_eq!(t, &TokenKind::Keyword(Keyword::Select));
        }
    }

    #[test]
    fn test_reserved_keyword_tokenizes_but_parser_rejects_later() {
        let toks = tokens("HAVING");
        assert_eq!(toks[0], TokenKind::Keyword(Keyword::Having));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("@");
        let err = lexer.next_token_result().unwrap_err();
        assert!(matches!(err.kind(), crate::error::ErrorKind::SyntaxError(_)));
    }

    #[test]
    fn test_auto_increment_is_single_keyword() {
        let toks = tokens("AUTO_INCREMENT");
        assert_eq!(toks[0], TokenKind::Keyword(Keyword::AutoIncrement));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("SELECT 1");
        assert_eq!(lexer.peek().unwrap().kind, TokenKind::Keyword(Keyword::Select));
        assert_eq!(lexer.peek().unwrap().kind, TokenKind::Keyword(Keyword::Select));
        let first = lexer.next_token_result().unwrap();
        assert_eq!(first.kind, TokenKind::Keyword(Keyword::Select));
    }
}
