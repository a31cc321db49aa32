//! JSON directory storage backend.
//!
//! A database directory holds one `metadata.json` with the schema of every
//! table and one `<table>.json` per table with its rows:
//!
//! ```text
//! db_mydb/
//!   metadata.json   { "name": ..., "tables": { "users": { "name": ..., "columns": [...] } } }
//!   users.json      [ { "id": 1, "name": "Alice", "active": true }, ... ]
//! ```
//!
//! Saves rewrite every file in full. There is no write-ahead log, so a crash
//! between the metadata write and a table write leaves them out of sync.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    sql::{
        schema::{Catalog, Table},
        types::{Row, Value},
    },
    storage::engine::Storage,
};

const METADATA_FILE: &str = "metadata.json";

/// Disk-backed storage writing pretty-printed JSON files
#[derive(Debug, Clone)]
pub struct DiskStorage {
    dir: PathBuf,
}

impl DiskStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    fn table_path(&self, table_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", table_name))
    }

    /// Reads a table's row file. Missing or malformed files yield no rows.
    fn load_rows(&self, table: &Table) -> Vec<Row> {
        let path = self.table_path(&table.name);
        let records: Vec<BTreeMap<String, Value>> = match fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|data| serde_json::from_str(&data).map_err(Error::from))
        {
            Ok(records) => records,
            Err(err) => {
                warn!("could not load rows of table '{}' from {:?}: {}", table.name, path, err);
                return Vec::new();
            }
        };

        records
            .into_iter()
            .map(|mut record| {
                table
                    .columns
                    .iter()
                    .map(|col| record.remove(&col.name).unwrap_or(Value::Null))
                    .collect()
            })
            .collect()
    }

    fn save_rows(&self, table: &Table) -> Result<()> {
        let records = table
            .rows
            .iter()
            .map(|row| {
                table
                    .columns
                    .iter()
                    .map(|c| c.name.as_str())
                    .zip(row.iter())
                    .collect::<BTreeMap<_, _>>()
            })
            .collect::<Vec<_>>();
        fs::write(self.table_path(&table.name), serde_json::to_string_pretty(&records)?)?;
        Ok(())
    }
}

impl Storage for DiskStorage {
    fn load(&mut self) -> Result<Option<Catalog>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.metadata_path();
        if !path.exists() {
            info!("no metadata at {:?}, starting empty", path);
            return Ok(None);
        }

        let mut catalog: Catalog = serde_json::from_str(&fs::read_to_string(&path)?)?;
        for table in catalog.tables.values_mut() {
            table.rows = self.load_rows(table);
            debug!("loaded {} row(s) into table '{}'", table.rows.len(), table.name);
        }
        info!("loaded database '{}' with {} table(s)", catalog.name, catalog.tables.len());
        Ok(Some(catalog))
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.metadata_path(), serde_json::to_string_pretty(catalog)?)?;
        for table in catalog.tables.values() {
            self.save_rows(table)?;
        }
        debug!("saved database '{}' to {:?}", catalog.name, self.dir);
        Ok(())
    }

    /// Table names become file names next to `metadata.json`
    fn check_table_name(&self, name: &str) -> Result<()> {
        if name == "metadata" || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::Schema(format!("invalid table name '{}'", name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::DiskStorage;
    use crate::{
        error::{Error, Result},
        sql::{
            schema::{Catalog, Column, Table},
            types::{DataType, Value},
        },
        storage::engine::Storage,
    };

    fn catalog() -> Catalog {
        let mut t = Table::new(
            "t".into(),
            vec![Column::new("a", DataType::Integer), Column::new("b", DataType::Varchar)],
        );
        t.rows = vec![vec![Value::Integer(1), Value::String("x".into())]];
        let mut catalog = Catalog::new("demo");
        catalog.tables.insert("t".into(), t);
        catalog
    }

    #[test]
    fn test_file_layout() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = DiskStorage::new(dir.path().join("db_demo"));
        storage.save(&catalog())?;

        let meta: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.dir().join("metadata.json"))?)?;
        assert_eq!(
            meta,
            serde_json::json!({
                "name": "demo",
                "tables": {
                    "t": {
                        "name": "t",
                        "columns": [
                            {"name": "a", "type": "INTEGER", "not_null": false, "primary": false},
                            {"name": "b", "type": "VARCHAR", "not_null": false, "primary": false}
                        ]
                    }
                }
            })
        );

        let rows: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.dir().join("t.json"))?)?;
        assert_eq!(rows, serde_json::json!([{"a": 1, "b": "x"}]));
        Ok(())
    }

    #[test]
    fn test_missing_or_corrupt_rows_recover_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = DiskStorage::new(dir.path().join("db_demo"));
        storage.save(&catalog())?;

        fs::write(storage.dir().join("t.json"), "not json")?;
        let loaded = storage.load()?.expect("catalog");
        assert!(loaded.tables["t"].rows.is_empty());
        assert_eq!(loaded.tables["t"].columns.len(), 2);

        fs::remove_file(storage.dir().join("t.json"))?;
        assert!(storage.load()?.expect("catalog").tables["t"].rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_record_missing_column_loads_null() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = DiskStorage::new(dir.path().join("db_demo"));
        storage.save(&catalog())?;

        fs::write(storage.dir().join("t.json"), r#"[{"a": 7}]"#)?;
        let loaded = storage.load()?.expect("catalog");
        assert_eq!(loaded.tables["t"].rows, vec![vec![Value::Integer(7), Value::Null]]);
        Ok(())
    }

    #[test]
    fn test_corrupt_metadata_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = DiskStorage::new(dir.path().join("db_demo"));
        storage.save(&catalog())?;

        fs::write(storage.dir().join("metadata.json"), "{")?;
        assert!(matches!(storage.load(), Err(Error::Persistence(_))));
        Ok(())
    }

    #[test]
    fn test_check_table_name() {
        let storage = DiskStorage::new("unused");
        assert!(storage.check_table_name("users").is_ok());
        assert!(storage.check_table_name("metadata").is_err());
        assert!(storage.check_table_name("../escape").is_err());
        assert!(storage.check_table_name("a/b").is_err());
    }
}
