//! DDL and DML statement parsing: `CREATE TABLE`, `ALTER TABLE`,
//! `DROP TABLE`, `INSERT`, `UPDATE`, `DELETE`.

use super::Parser;
use crate::ast::*;
use crate::error::{Error, Result, Span};
use crate::lexer::{Keyword, TokenKind};
use crate::types::SqlType;

impl<'a> Parser<'a> {
    /// `CREATE TABLE ident '(' col_def (',' col_def)* ')'`
    pub(super) fn parse_create_table(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_identifier()?;

        self.expect(&TokenKind::LParen)?;
        let mut columns = vec![self.parse_column_def()?];
        while self.consume(&TokenKind::Comma)?.is_some() {
            columns.push(self.parse_column_def()?);
        }
        self.expect(&TokenKind::RParen)?;

        self.reject_duplicate_primary_key(&columns)?;

        Ok(StatementKind::CreateTable(CreateTable { name, columns }))
    }

    /// `ALTER TABLE ident ADD COLUMN col_def`
    pub(super) fn parse_alter_table(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_identifier()?;
        self.expect_keyword(Keyword::Add)?;
        self.consume_keyword(Keyword::Column)?;
        let add_column = self.parse_column_def()?;
        Ok(StatementKind::AlterTable(AlterTable { name, add_column }))
    }

    /// `DROP TABLE ident`
    pub(super) fn parse_drop_table(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_identifier()?;
        Ok(StatementKind::DropTable(DropTable { name }))
    }

    /// `INSERT INTO ident '(' ident (',' ident)* ')' VALUES '(' literal (',' literal)* ')'`
    pub(super) fn parse_insert(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_identifier()?;

        self.expect(&TokenKind::LParen)?;
        let mut columns = vec![self.parse_identifier()?];
        while self.consume(&TokenKind::Comma)?.is_some() {
            columns.push(self.parse_identifier()?);
        }
        self.expect(&TokenKind::RParen)?;

        self.expect_keyword(Keyword::Values)?;
        self.expect(&TokenKind::LParen)?;
        let mut values = vec![self.parse_literal()?];
        while self.consume(&TokenKind::Comma)?.is_some() {
            values.push(self.parse_literal()?);
        }
        self.expect(&TokenKind::RParen)?;

        if columns.len() != values.len() {
            return Err(Error::syntax(
                format!(
                    "column list has {} column(s) but VALUES has {} value(s)",
                    columns.len(),
                    values.len()
                ),
                self.current_position(),
            ));
        }

        Ok(StatementKind::Insert(Insert {
            table,
            columns,
            values,
        }))
    }

    /// `UPDATE ident SET assignment (',' assignment)* [WHERE predicate]`
    pub(super) fn parse_update(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_identifier()?;
        self.expect_keyword(Keyword::Set)?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.consume(&TokenKind::Comma)?.is_some() {
            assignments.push(self.parse_assignment()?);
        }

        let where_clause = if self.consume_keyword(Keyword::Where)?.is_some() {
            Some(self.parse_predicate()?)
        } else {
            None
        };

        Ok(StatementKind::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.parse_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_literal()?;
        Ok(Assignment { column, value })
    }

    /// `DELETE FROM ident [WHERE predicate]`
    pub(super) fn parse_delete(&mut self) -> Result<StatementKind> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_identifier()?;

        let where_clause = if self.consume_keyword(Keyword::Where)?.is_some() {
            Some(self.parse_predicate()?)
        } else {
            None
        };

        Ok(StatementKind::Delete(Delete {
            table,
            where_clause,
        }))
    }

    /// `col_def := ident type_spec constraint*`
    /// `type_spec := type_name ['(' number ')']`
    /// `constraint := PRIMARY KEY | AUTO_INCREMENT | NOT NULL | NULL`
    fn parse_column_def(&mut self) -> Result<ColumnDefAst> {
        let start = self.peek()?.span.start;
        let name = self.parse_identifier()?;
        let ty_token = self.advance()?;
        let ty_name = ty_token
            .as_identifier()
            .ok_or_else(|| {
                Error::syntax(
                    format!("expected a type name, found {}", ty_token.kind),
                    ty_token.span.start,
                )
            })?
            .to_string();
        let ty = SqlType::from_type_name(&ty_name).ok_or_else(|| {
            Error::syntax(
                format!("unknown type '{}'", ty_name),
                ty_token.span.start,
            )
        })?;

        let size = if self.consume(&TokenKind::LParen)?.is_some() {
            let token = self.advance()?;
            let n = match token.kind {
                TokenKind::Number(n) if n >= 0.0 && n.fract() == 0.0 => n as u32,
                _ => {
                    return Err(Error::syntax(
                        "expected an integer size",
                        token.span.start,
                    ))
                }
            };
            self.expect(&TokenKind::RParen)?;
            Some(n)
        } else {
            None
        };

        let mut primary_key = false;
        let mut auto_increment = false;
        let mut not_null = false;
        loop {
            if self.consume_keyword(Keyword::Primary)?.is_some() {
                self.expect_keyword(Keyword::Key)?;
                if primary_key {
                    return Err(Error::syntax(
                        "multiple primary keys not supported",
                        self.current_position(),
                    ));
                }
                primary_key = true;
                not_null = true;
            } else if self.consume_keyword(Keyword::AutoIncrement)?.is_some() {
                auto_increment = true;
                not_null = true;
            } else if self.consume_keyword(Keyword::Not)?.is_some() {
                self.expect_keyword(Keyword::Null)?;
                not_null = true;
            } else if self.consume_keyword(Keyword::Null)?.is_some() {
                // Explicit NULL is the default; nothing to record.
            } else {
                break;
            }
        }

        let end = self.current_position();
        Ok(ColumnDefAst {
            name,
            ty,
            size,
            primary_key,
            auto_increment,
            not_null,
            span: Span::new(start, end),
        })
    }

    fn reject_duplicate_primary_key(&self, columns: &[ColumnDefAst]) -> Result<()> {
        let count = columns.iter().filter(|c| c.primary_key).count();
        if count > 1 {
            return Err(Error::syntax(
                "multiple primary keys not supported",
                columns.last().map(|c| c.span.start).unwrap_or(0),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table() {
        let mut parser = Parser::new(
            "CREATE TABLE students (id NUMBER PRIMARY KEY AUTO_INCREMENT, name VARCHAR(50) NOT NULL)",
        );
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::CreateTable(ct) => {
                assert_eq!(ct.name.name, "students");
                assert_eq!(ct.columns.len(), 2);
                assert!(ct.columns[0].primary_key);
                assert!(ct.columns[0].auto_increment);
                assert_eq!(ct.columns[1].size, Some(50));
                assert!(ct.columns[1].not_null);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_duplicate_primary_key_rejected() {
        let mut parser =
            Parser::new("CREATE TABLE t (a NUMBER PRIMARY KEY, b NUMBER PRIMARY KEY)");
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_unknown_type_is_syntax_error() {
        let mut parser = Parser::new("CREATE TABLE t (a WIDGET)");
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_alter_table_add_column() {
        let mut parser = Parser::new("ALTER TABLE students ADD COLUMN email VARCHAR(100)");
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::AlterTable(at) => {
                assert_eq!(at.name.name, "students");
                assert_eq!(at.add_column.name.name, "email");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_drop_table() {
        let mut parser = Parser::new("DROP TABLE students");
        let stmt = parser.parse().unwrap();
        assert!(matches!(stmt.kind, StatementKind::DropTable(_)));
    }

    #[test]
    fn test_insert_with_columns() {
        let mut parser =
            Parser::new("INSERT INTO students (id, forename) VALUES (1, 'Ada')");
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::Insert(ins) => {
                assert_eq!(ins.columns.len(), 2);
                assert_eq!(ins.values.len(), 2);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_insert_column_value_count_mismatch() {
        let mut parser = Parser::new("INSERT INTO students (id) VALUES (1, 2)");
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_update_with_where() {
        let mut parser =
            Parser::new("UPDATE students SET surname = 'Lovelace' WHERE id = 1");
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::Update(u) => {
                assert_eq!(u.assignments.len(), 1);
                assert!(u.where_clause.is_some());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_delete_without_where_truncates() {
        let mut parser = Parser::new("DELETE FROM students");
        let stmt = parser.parse().unwrap();
        match stmt.kind {
            StatementKind::Delete(d) => assert!(d.where_clause.is_none()),
            _ => unreachable!(),
        }
    }
}
