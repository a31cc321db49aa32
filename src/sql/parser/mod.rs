use std::collections::BTreeMap;
use std::iter::Peekable;

use log::debug;

use crate::error::{Error, Result};
use crate::sql::parser::ast::{Operator, Predicate, SelectColumns, Statement};
use crate::sql::parser::lexer::{Lexer, Token};
use crate::sql::schema::Column;
use crate::sql::types::{DataType, Value};

pub mod ast;
pub mod lexer;

/// SQL Parser - Converts tokens into Abstract Syntax Tree (AST)
///
/// Recognizes one statement, optionally followed by `;`. Anything after that
/// is rejected, so AND/OR chains and batches fail instead of being ignored.
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input).peekable(),
        }
    }

    /// Parses the input SQL statement into an AST
    pub fn parse(&mut self) -> Result<Statement> {
        if self.peek().is_none() {
            return Err(Error::Syntax("empty query".into()));
        }
        let stmt = self.parse_statement()?;
        self.next_if_token(Token::Semicolon);
        if let Some(token) = self.peek() {
            return Err(Error::Syntax(format!("unexpected token '{}'", token)));
        }
        debug!("parsed statement {:?}", stmt);
        Ok(stmt)
    }

    /// Parses a statement based on the first token
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek() {
            Some(t) if t.is_keyword("CREATE") => self.parse_create_table(),
            Some(t) if t.is_keyword("INSERT") => self.parse_insert(),
            Some(t) if t.is_keyword("SELECT") => self.parse_select(),
            Some(t) if t.is_keyword("UPDATE") => self.parse_update(),
            Some(t) if t.is_keyword("DELETE") => self.parse_delete(),
            Some(t) => Err(Error::Syntax(format!("unknown command: {}", t))),
            None => Err(Error::Syntax("unexpected end of input".into())),
        }
    }

    /// Parses CREATE TABLE statement
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.next_expect_keyword("CREATE")?;
        self.next_expect_keyword("TABLE")?;
        let name = self.next_ident()?;
        self.next_expect(Token::OpenParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column()?);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        self.next_expect(Token::CloseParen)?;
        Ok(Statement::CreateTable { name, columns })
    }

    /// Parses one column definition: `name TYPE [(size)] [constraint]*`
    fn parse_column(&mut self) -> Result<Column> {
        let name = self.next_ident()?;
        let type_name = self.next_ident()?;
        let datatype = DataType::from_name(&type_name).ok_or_else(|| {
            Error::Syntax(format!("unknown data type '{}' for column '{}'", type_name, name))
        })?;
        let mut column = Column::new(name, datatype);

        if self.next_if_token(Token::OpenParen).is_some() {
            let size = self
                .next()?
                .as_str()
                .parse::<usize>()
                .map_err(|_| Error::Syntax(format!("invalid size for column '{}'", column.name)))?;
            self.next_expect(Token::CloseParen)?;
            match datatype {
                DataType::Varchar => column.size = Some(size),
                _ => debug!("ignoring size {} on {} column '{}'", size, datatype, column.name),
            }
        }

        // NOT NULL / PRIMARY KEY until the next ',' or ')'; anything else is skipped
        while let Some(token) = self.next_if(|t| !matches!(t, Token::Comma | Token::CloseParen)) {
            if token.is_keyword("NOT") && self.next_if_keyword("NULL") {
                column.not_null = true;
            } else if token.is_keyword("PRIMARY") && self.next_if_keyword("KEY") {
                column.primary = true;
            } else {
                debug!("skipping unknown constraint token '{}' on column '{}'", token, column.name);
            }
        }

        Ok(column)
    }

    /// Parses INSERT statement
    fn parse_insert(&mut self) -> Result<Statement> {
        self.next_expect_keyword("INSERT")?;
        self.next_expect_keyword("INTO")?;
        let table_name = self.next_ident()?;

        // Check if specific columns are specified
        let columns = if self.next_if_token(Token::OpenParen).is_some() {
            let mut cols: Vec<String> = Vec::new();
            loop {
                let col = self.next_ident()?;
                if cols.contains(&col) {
                    return Err(Error::Syntax(format!("duplicate column '{}' in column list", col)));
                }
                cols.push(col);
                match self.next()? {
                    Token::CloseParen => break,
                    Token::Comma => {}
                    token => return Err(Error::Syntax(format!("unexpected token '{}' in column list", token))),
                }
            }
            Some(cols)
        } else {
            None
        };

        if !self.next_if_keyword("VALUES") {
            return Err(Error::Syntax("missing VALUES clause".into()));
        }
        self.next_expect(Token::OpenParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_value()?);
            match self.next()? {
                Token::CloseParen => break,
                Token::Comma => {}
                token => return Err(Error::Syntax(format!("unexpected token '{}' in value list", token))),
            }
        }

        if let Some(cols) = &columns {
            if values.len() > cols.len() {
                return Err(Error::Syntax("too many values".into()));
            }
        }

        Ok(Statement::Insert {
            table_name,
            columns,
            values,
        })
    }

    /// Parses SELECT statement
    fn parse_select(&mut self) -> Result<Statement> {
        self.next_expect_keyword("SELECT")?;

        let mut names = Vec::new();
        loop {
            names.push(self.next_ident()?);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        let columns = if names.len() == 1 && names[0] == "*" {
            SelectColumns::All
        } else {
            SelectColumns::Named(names)
        };

        if !self.next_if_keyword("FROM") {
            return Err(Error::Syntax("missing FROM clause".into()));
        }
        let table_name = self.next_ident()?;

        Ok(Statement::Select {
            table_name,
            columns,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// Parses UPDATE statement
    fn parse_update(&mut self) -> Result<Statement> {
        self.next_expect_keyword("UPDATE")?;
        let table_name = self.next_ident()?;
        if !self.next_if_keyword("SET") {
            return Err(Error::Syntax("missing SET clause".into()));
        }

        let mut columns = BTreeMap::new();
        loop {
            let col = self.next_ident()?;
            self.next_expect_keyword("=")?;
            let value = self.parse_value()?;
            // a = 1, a = 2 in one statement is ambiguous
            if columns.contains_key(&col) {
                return Err(Error::Syntax(format!("duplicate column '{}' in SET clause", col)));
            }
            columns.insert(col, value);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }

        Ok(Statement::Update {
            table_name,
            columns,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// Parses DELETE statement
    fn parse_delete(&mut self) -> Result<Statement> {
        self.next_expect_keyword("DELETE")?;
        if !self.next_if_keyword("FROM") {
            return Err(Error::Syntax("invalid DELETE syntax, expected FROM".into()));
        }
        let table_name = self.next_ident()?;

        Ok(Statement::Delete {
            table_name,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// Parses the optional `WHERE column op value`
    fn parse_where_clause(&mut self) -> Result<Option<Predicate>> {
        if !self.next_if_keyword("WHERE") {
            return Ok(None);
        }
        let column = self.next_ident()?;
        let op = self.next_ident()?;
        let operator = match Operator::parse(&op) {
            Some(Operator::Is) if self.next_if_keyword("NOT") => Operator::IsNot,
            Some(operator) => operator,
            None => return Err(Error::Syntax(format!("unknown operator: {}", op))),
        };
        let value = self.parse_value()?;
        Ok(Some(Predicate {
            column,
            operator,
            value,
        }))
    }

    /// Parses a literal: NULL, TRUE/FALSE, integer, or text
    fn parse_value(&mut self) -> Result<Value> {
        match self.next()? {
            Token::Word(w) => Ok(Value::from_literal(&w)),
            Token::Quoted(q) => Ok(Value::from_literal(&q)),
            token => Err(Error::Syntax(format!("expected value, got '{}'", token))),
        }
    }

    /// Peeks at the next token
    fn peek(&mut self) -> Option<Token> {
        self.lexer.peek().cloned()
    }

    /// Consumes and returns the next token
    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .ok_or_else(|| Error::Syntax("unexpected end of input".into()))
    }

    /// Expects and consumes a name (table or column)
    /// Table and column names may be quoted: `"name"` reads as `name`
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Word(ident) | Token::Quoted(ident) => Ok(ident),
            token => Err(Error::Syntax(format!("expected name, got '{}'", token))),
        }
    }

    /// Expects a specific token, returns error if different
    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Syntax(format!("expected '{}', got '{}'", expect, token)));
        }
        Ok(())
    }

    /// Expects a keyword (case-insensitive)
    fn next_expect_keyword(&mut self, keyword: &str) -> Result<()> {
        let token = self.next()?;
        if !token.is_keyword(keyword) {
            return Err(Error::Syntax(format!("expected {}, got '{}'", keyword, token)));
        }
        Ok(())
    }

    /// Consumes next token if it satisfies the predicate
    fn next_if<F: Fn(&Token) -> bool>(&mut self, predicate: F) -> Option<Token> {
        self.lexer.next_if(|t| predicate(t))
    }

    /// Consumes next token if it is the given keyword
    fn next_if_keyword(&mut self, keyword: &str) -> bool {
        self.next_if(|t| t.is_keyword(keyword)).is_some()
    }

    /// Consumes next token if it matches the given token
    fn next_if_token(&mut self, token: Token) -> Option<Token> {
        self.next_if(|t| t == &token)
    }
}
