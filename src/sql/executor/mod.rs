use std::fmt::Display;

use crate::{
    error::Result,
    sql::{
        engine::Database,
        executor::{
            mutation::{Delete, Insert, Update},
            query::Scan,
            schema::CreateTable,
        },
        parser::ast::Statement,
        types::Row,
    },
    storage::Storage,
};

mod mutation;
mod query;
mod schema;

/// SQL executor trait
pub trait Executor<S: Storage> {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet>;
}

/// Builds an executor from a parsed statement
///
/// The `'static` bound is required for trait object usage.
impl<S: Storage + 'static> dyn Executor<S> {
    pub fn build(stmt: Statement) -> Box<dyn Executor<S>> {
        match stmt {
            Statement::CreateTable { name, columns } => CreateTable::new(name, columns),
            Statement::Insert {
                table_name,
                columns,
                values,
            } => Insert::new(table_name, columns, values),
            Statement::Select {
                table_name,
                columns,
                where_clause,
            } => Scan::new(table_name, columns, where_clause),
            Statement::Update {
                table_name,
                columns,
                where_clause,
            } => Update::new(table_name, columns, where_clause),
            Statement::Delete {
                table_name,
                where_clause,
            } => Delete::new(table_name, where_clause),
        }
    }
}

/// Execution result set
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    CreateTable { table_name: String },
    Insert { count: usize },
    Scan { columns: Vec<String>, rows: Vec<Row> },
    Update { count: usize },
    Delete { count: usize },
}

impl ResultSet {
    /// Status line for statements that do not return rows
    pub fn message(&self) -> Option<String> {
        match self {
            ResultSet::CreateTable { table_name } => {
                Some(format!("Table '{}' created successfully", table_name))
            }
            ResultSet::Insert { count: 1 } => Some("1 row inserted".to_string()),
            ResultSet::Insert { count } => Some(format!("{} rows inserted", count)),
            ResultSet::Update { count } => Some(format!("{} row(s) updated", count)),
            ResultSet::Delete { count } => Some(format!("{} row(s) deleted", count)),
            ResultSet::Scan { .. } => None,
        }
    }
}

/// Renders a status line, or the row set as a bordered table
impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (columns, rows) = match self {
            ResultSet::Scan { columns, rows } => (columns, rows),
            other => return write!(f, "{}", other.message().unwrap_or_default()),
        };
        if rows.is_empty() {
            return write!(f, "No rows returned");
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = format!(
            "+{}+",
            widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
        );
        let line = |values: &[String]| {
            let inner = values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!(" {:<width$} ", v, width = w))
                .collect::<Vec<_>>()
                .join("|");
            format!("|{}|", inner)
        };

        writeln!(f, "{}", border)?;
        writeln!(f, "{}", line(&columns[..]))?;
        writeln!(f, "{}", border)?;
        for row in &cells {
            writeln!(f, "{}", line(&row[..]))?;
        }
        writeln!(f, "{}", border)?;
        write!(f, "{} row(s) returned", rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::ResultSet;
    use crate::sql::types::Value;

    #[test]
    fn test_messages() {
        assert_eq!(
            ResultSet::CreateTable { table_name: "users".into() }.to_string(),
            "Table 'users' created successfully"
        );
        assert_eq!(ResultSet::Insert { count: 1 }.to_string(), "1 row inserted");
        assert_eq!(ResultSet::Update { count: 3 }.to_string(), "3 row(s) updated");
        assert_eq!(ResultSet::Delete { count: 0 }.to_string(), "0 row(s) deleted");
    }

    #[test]
    fn test_render_rows() {
        let result = ResultSet::Scan {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec![Value::Integer(1), Value::String("Alice".into())],
                vec![Value::Integer(22), Value::Null],
            ],
        };
        assert_eq!(
            result.to_string(),
            "+----+-------+\n\
             | id | name  |\n\
             +----+-------+\n\
             | 1  | Alice |\n\
             | 22 | NULL  |\n\
             +----+-------+\n\
             2 row(s) returned"
        );

        let empty = ResultSet::Scan {
            columns: vec!["id".into()],
            rows: vec![],
        };
        assert_eq!(empty.to_string(), "No rows returned");
        assert_eq!(empty.message(), None);
    }
}
