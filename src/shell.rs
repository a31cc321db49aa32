//! Interactive shell for minirdb.
//!
//! Reads one statement per line, runs it against a [`Database`] and prints
//! the result. Besides SQL the shell understands a few words of its own:
//!
//! - `help`: print the supported grammar
//! - `tables`: list tables with their columns
//! - `exit` / `quit`: leave the shell (so does end of input)
use std::io::{self, BufRead, Write};

use crate::{sql::engine::Database, storage::Storage};

const HELP: &str = "\
Commands:
  CREATE TABLE table_name (column_name data_type [constraints], ...)
  INSERT INTO table_name [(columns)] VALUES (values)
  SELECT columns FROM table_name [WHERE condition]
  UPDATE table_name SET column = value [, ...] [WHERE condition]
  DELETE FROM table_name [WHERE condition]

Special Commands:
  tables    - Show all tables
  help      - Show this help
  exit/quit - Exit the program

Data Types:
  INTEGER
  VARCHAR(size)
  BOOLEAN

Constraints:
  NOT NULL
  PRIMARY KEY

Examples:
  CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50) NOT NULL, age INTEGER);
  INSERT INTO users VALUES (1, 'Alice', 25);
  SELECT * FROM users WHERE age > 20;
  UPDATE users SET age = 26 WHERE name = 'Alice';
  DELETE FROM users WHERE id = 1;";

/// One line of user input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `exit`, `quit`, or end of input
    Exit,
    Help,
    Tables,
    /// Blank line
    Empty,
    /// Anything else goes to the SQL parser
    Statement(String),
}

impl From<&str> for Command {
    fn from(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "exit" | "quit" => Command::Exit,
            "help" => Command::Help,
            "tables" => Command::Tables,
            "" => Command::Empty,
            _ => Command::Statement(line.to_string()),
        }
    }
}

/// Prints the prompt and reads one command.
pub fn prompt<R, W>(mut reader: R, mut writer: W) -> io::Result<Command>
where
    R: BufRead,
    W: Write,
{
    write!(writer, "SQL> ")?;
    writer.flush()?;

    let mut s = String::default();
    if reader.read_line(&mut s)? == 0 {
        return Ok(Command::Exit);
    }
    Ok(Command::from(s.as_str()))
}

/// Runs the read-eval-print loop until `exit` or end of input.
///
/// Statement failures are printed and the loop carries on.
pub fn run<S, R, W>(db: &mut Database<S>, mut reader: R, mut writer: W) -> io::Result<()>
where
    S: Storage + 'static,
    R: BufRead,
    W: Write,
{
    loop {
        match prompt(&mut reader, &mut writer)? {
            Command::Exit => {
                writeln!(writer, "Goodbye!")?;
                return Ok(());
            }
            Command::Help => writeln!(writer, "{}", HELP)?,
            Command::Tables => write_tables(db, &mut writer)?,
            Command::Empty => {}
            Command::Statement(sql) => match db.execute(&sql) {
                Ok(result) => writeln!(writer, "{}", result)?,
                Err(err) => writeln!(writer, "Error: {}", err)?,
            },
        }
    }
}

fn write_tables<S: Storage, W: Write>(db: &Database<S>, mut writer: W) -> io::Result<()> {
    let mut tables = db.tables().peekable();
    if tables.peek().is_none() {
        return writeln!(writer, "No tables found");
    }
    writeln!(writer, "Tables:")?;
    for table in tables {
        let columns = table
            .columns
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "  {} ({})", table.name, columns)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session(input: &str) -> String {
        let mut db = Database::open(MemoryStorage::new(), "shell").unwrap();
        let mut output = Vec::new();
        run(&mut db, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).expect("not valid UTF-8")
    }

    #[test]
    fn command_from_line() {
        let inputs = vec![
            ("exit\n", Command::Exit),
            ("QUIT", Command::Exit),
            (" help ", Command::Help),
            ("tables", Command::Tables),
            ("   \n", Command::Empty),
            ("select * from t;\n", Command::Statement("select * from t;".to_string())),
        ];

        for (line, expected) in inputs {
            assert_eq!(Command::from(line), expected);
        }
    }

    #[test]
    fn prompt_prints_correctly() {
        let mut output = Vec::new();
        let cmd = prompt(&b"exit\n"[..], &mut output).unwrap();
        assert_eq!(cmd, Command::Exit);
        assert_eq!(String::from_utf8(output).unwrap(), "SQL> ");
    }

    #[test]
    fn prompt_end_of_input_exits() {
        let cmd = prompt(&b""[..], Vec::new()).unwrap();
        assert_eq!(cmd, Command::Exit);
    }

    #[test]
    fn run_statements_and_errors() {
        let output = session(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(10))\n\
             INSERT INTO users VALUES (1, 'Alice')\n\
             INSERT INTO users VALUES (1, 'Again')\n\
             \n\
             SELECT name FROM users\n\
             tables\n\
             exit\n\
             SELECT * FROM never_reached\n",
        );

        assert!(output.contains("Table 'users' created successfully"));
        assert!(output.contains("1 row inserted"));
        assert!(output.contains("Error: constraint violation: duplicate primary key value: 1"));
        assert!(output.contains("| Alice |"));
        assert!(output.contains("1 row(s) returned"));
        assert!(output.contains("  users (id INTEGER PRIMARY KEY, name VARCHAR(10))"));
        assert!(output.ends_with("Goodbye!\n"));
        assert!(!output.contains("never_reached"));
    }

    #[test]
    fn run_without_tables() {
        let output = session("tables\nhelp\n");
        assert!(output.contains("No tables found"));
        assert!(output.contains("Special Commands:"));
        assert!(output.ends_with("Goodbye!\n"));
    }
}
