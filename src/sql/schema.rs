use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sql::types::{DataType, Row, Value},
};

/// Table definition together with its rows
///
/// Only the name and columns are part of the metadata file; rows are
/// persisted separately, one file per table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(skip)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    /// Validates table schema
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Schema(format!("table '{}' has no columns", self.name)));
        }

        if self.columns.iter().filter(|c| c.primary).count() > 1 {
            return Err(Error::Schema(format!(
                "multiple primary keys defined for table '{}'",
                self.name
            )));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(Error::Schema(format!(
                    "duplicate column '{}' in table '{}'",
                    col.name, self.name
                )));
            }
        }

        Ok(())
    }

    /// Position of the primary key column, if the table has one
    pub fn primary_key_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.primary)
    }

    /// Returns the column index for a given column name
    pub fn get_col_index(&self, col_name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == col_name)
            .ok_or_else(|| Error::Schema(format!("column '{}' does not exist", col_name)))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DataType,
    /// Maximum length for VARCHAR columns; no limit when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub primary: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            datatype,
            size: None,
            not_null: false,
            primary: false,
        }
    }

    /// Converts a non-null value into this column's type.
    ///
    /// INTEGER accepts integers and integer text, VARCHAR accepts the text
    /// rendering of any value within `size` characters, BOOLEAN accepts
    /// booleans, 0/1 and the usual true/false spellings.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        let invalid = |kind: &str, value: &Value| {
            Error::Type(format!(
                "column '{}': invalid {} value '{}'",
                self.name, kind, value
            ))
        };

        match self.datatype {
            DataType::Integer => match value {
                Value::Integer(_) => Ok(value),
                Value::String(ref s) => s
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| invalid("integer", &value)),
                _ => Err(invalid("integer", &value)),
            },
            DataType::Varchar => {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                match self.size {
                    Some(size) if size > 0 && text.chars().count() > size => {
                        Err(Error::Constraint(format!(
                            "column '{}': string too long (max {})",
                            self.name, size
                        )))
                    }
                    _ => Ok(Value::String(text)),
                }
            }
            DataType::Boolean => match value {
                Value::Boolean(_) => Ok(value),
                Value::Integer(0) => Ok(Value::Boolean(false)),
                Value::Integer(1) => Ok(Value::Boolean(true)),
                Value::String(ref s) => match s.as_str() {
                    "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Value::Boolean(true)),
                    "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Value::Boolean(false)),
                    _ => Err(invalid("boolean", &value)),
                },
                _ => Err(invalid("boolean", &value)),
            },
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.datatype)?;
        if let Some(size) = self.size {
            write!(f, "({})", size)?;
        }
        if self.primary {
            write!(f, " PRIMARY KEY")?;
        }
        if self.not_null {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Everything a database owns: its name and tables by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    #[serde(default)]
    pub tables: BTreeMap<String, Table>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: BTreeMap::new(),
        }
    }
}
