//! Database location settings

use std::path::PathBuf;

/// Where a database lives on disk and what it is called
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parent directory holding `db_<name>` directories
    pub data_dir: PathBuf,
    /// Database name
    pub name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            name: "mydb".to_string(),
        }
    }
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            name: name.into(),
        }
    }

    /// Directory holding `metadata.json` and one `<table>.json` per table
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(format!("db_{}", self.name))
    }
}
