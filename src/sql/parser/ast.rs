use std::{cmp::Ordering, collections::BTreeMap, fmt::Display};

use log::trace;

use crate::{
    error::Result,
    sql::{
        schema::{Column, Table},
        types::{Row, Value, like_match},
    },
};

/// Abstract Syntax Tree (AST) node definitions for SQL statements
#[derive(Debug, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    /// INSERT statement; `columns` is None when values bind positionally
    Insert {
        table_name: String,
        columns: Option<Vec<String>>,
        values: Vec<Value>,
    },
    /// SELECT statement
    Select {
        table_name: String,
        columns: SelectColumns,
        where_clause: Option<Predicate>,
    },
    /// UPDATE statement
    Update {
        table_name: String,
        columns: BTreeMap<String, Value>,
        where_clause: Option<Predicate>,
    },
    /// DELETE statement
    Delete {
        table_name: String,
        where_clause: Option<Predicate>,
    },
}

/// SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumns {
    /// `*`: every column in declared order
    All,
    Named(Vec<String>),
}

/// Comparison operators allowed in a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Equal,
    /// Both `!=` and `<>`
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Like,
    Is,
    IsNot,
}

impl Operator {
    /// Parses a single-token operator; `IS NOT` is assembled by the parser
    pub fn parse(op: &str) -> Option<Operator> {
        Some(match op.to_uppercase().as_ref() {
            "=" => Operator::Equal,
            "!=" | "<>" => Operator::NotEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "<" => Operator::Less,
            "<=" => Operator::LessEqual,
            "LIKE" => Operator::Like,
            "IS" => Operator::Is,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Like => "LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Single WHERE condition: `column op value`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    /// Evaluates the condition against one row of `table`.
    ///
    /// A stored NULL only satisfies IS / IS NOT; every other operator is false.
    /// Comparing against a NULL literal is false except through IS / IS NOT.
    pub fn evaluate(&self, table: &Table, row: &Row) -> Result<bool> {
        let stored = &row[table.get_col_index(&self.column)?];

        let matched = match (stored, &self.value) {
            (Value::Null, literal) => match self.operator {
                Operator::Is => literal.is_null(),
                Operator::IsNot => !literal.is_null(),
                _ => false,
            },
            (_, Value::Null) => self.operator == Operator::IsNot,
            (stored, literal) => {
                let ord = || stored.compare(literal);
                match self.operator {
                    Operator::Like => like_match(&stored.to_string(), &literal.to_string()),
                    Operator::Equal | Operator::Is => ord() == Ordering::Equal,
                    Operator::NotEqual | Operator::IsNot => ord() != Ordering::Equal,
                    Operator::Greater => ord() == Ordering::Greater,
                    Operator::GreaterEqual => ord() != Ordering::Less,
                    Operator::Less => ord() == Ordering::Less,
                    Operator::LessEqual => ord() != Ordering::Greater,
                }
            }
        };

        trace!("{} {} {} on {} -> {}", self.column, self.operator, self.value, stored, matched);
        Ok(matched)
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}
