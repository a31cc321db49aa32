use std::collections::{BTreeMap, HashMap};

use log::{debug, info};

use crate::{
    config::Config,
    error::{Error, Result},
    sql::{
        executor::{Executor, ResultSet},
        parser::{
            Parser,
            ast::{Predicate, SelectColumns},
        },
        schema::{Catalog, Column, Table},
        types::{Row, Value},
    },
    storage::{DiskStorage, Storage},
};

/// Relational engine
///
/// Sole owner of every table. Mutating operations take `&mut self` and
/// persist the whole catalog once they succeed; a failed save is reported
/// but the in-memory change stays.
pub struct Database<S: Storage> {
    catalog: Catalog,
    storage: S,
}

impl Database<DiskStorage> {
    /// Opens (or starts) the disk-backed database described by `config`
    pub fn open_config(config: &Config) -> Result<Self> {
        Self::open(DiskStorage::from_config(config), &config.name)
    }
}

impl<S: Storage> Database<S> {
    /// Loads the catalog from `storage`; an empty database named `name`
    /// when nothing has been saved yet
    pub fn open(mut storage: S, name: &str) -> Result<Self> {
        let catalog = match storage.load()? {
            Some(catalog) => catalog,
            None => Catalog::new(name),
        };
        info!("opened database '{}' ({} table(s))", catalog.name, catalog.tables.len());
        Ok(Self { catalog, storage })
    }

    pub fn name(&self) -> &str {
        &self.catalog.name
    }

    /// Tables in name order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.catalog.tables.values()
    }

    pub fn table(&self, table_name: &str) -> Option<&Table> {
        self.catalog.tables.get(table_name)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns table info, returns error if table doesn't exist
    pub fn must_get_table(&self, table_name: &str) -> Result<&Table> {
        self.table(table_name)
            .ok_or_else(|| Error::Schema(format!("table '{}' does not exist", table_name)))
    }

    fn must_get_table_mut(&mut self, table_name: &str) -> Result<&mut Table> {
        self.catalog
            .tables
            .get_mut(table_name)
            .ok_or_else(|| Error::Schema(format!("table '{}' does not exist", table_name)))
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(&self.catalog)
    }

    /// Registers an empty table
    pub fn create_table(&mut self, name: String, columns: Vec<Column>) -> Result<()> {
        if self.catalog.tables.contains_key(&name) {
            return Err(Error::Schema(format!("table '{}' already exists", name)));
        }
        self.storage.check_table_name(&name)?;

        let table = Table::new(name, columns);
        table.validate()?;

        info!("creating table '{}'", table.name);
        self.catalog.tables.insert(table.name.clone(), table);
        self.persist()
    }

    /// Inserts one row. Columns missing from `values` are stored as NULL.
    pub fn insert(&mut self, table_name: &str, values: HashMap<String, Value>) -> Result<()> {
        let table = self.must_get_table_mut(table_name)?;
        for col_name in values.keys() {
            table.get_col_index(col_name)?;
        }

        let mut row = Row::with_capacity(table.columns.len());
        for col in &table.columns {
            match values.get(&col.name) {
                None | Some(Value::Null) if col.not_null => {
                    return Err(Error::Constraint(format!("column '{}' cannot be null", col.name)));
                }
                None | Some(Value::Null) => row.push(Value::Null),
                Some(value) => row.push(col.coerce(value.clone())?),
            }
        }

        // Linear uniqueness check, there is no index
        if let Some(pk) = table.primary_key_index() {
            if table.rows.iter().any(|existing| existing[pk] == row[pk]) {
                return Err(Error::Constraint(format!(
                    "duplicate primary key value: {}",
                    row[pk]
                )));
            }
        }

        debug!("insert row into '{}': {:?}", table_name, row);
        table.rows.push(row);
        self.persist()
    }

    /// Returns copies of the matching rows, projected onto `columns`
    pub fn select(
        &self,
        table_name: &str,
        columns: &SelectColumns,
        predicate: Option<&Predicate>,
    ) -> Result<ResultSet> {
        let table = self.must_get_table(table_name)?;
        let names = match columns {
            SelectColumns::All => table.column_names(),
            SelectColumns::Named(names) => names.clone(),
        };
        let indexes = names
            .iter()
            .map(|name| table.get_col_index(name))
            .collect::<Result<Vec<_>>>()?;

        let rows = table
            .rows
            .iter()
            .zip(filter_rows(table, predicate)?)
            .filter(|(_, matched)| *matched)
            .map(|(row, _)| indexes.iter().map(|&i| row[i].clone()).collect::<Row>())
            .collect();

        Ok(ResultSet::Scan {
            columns: names,
            rows,
        })
    }

    /// Applies `assignments` to every matching row and returns how many
    /// rows were touched. Every assignment and the predicate are checked
    /// before the first row changes.
    pub fn update(
        &mut self,
        table_name: &str,
        assignments: &BTreeMap<String, Value>,
        predicate: Option<&Predicate>,
    ) -> Result<usize> {
        let table = self.must_get_table_mut(table_name)?;

        let mut resolved = Vec::with_capacity(assignments.len());
        for (col_name, value) in assignments {
            let index = table.get_col_index(col_name)?;
            let col = &table.columns[index];
            let value = match value {
                Value::Null if col.not_null => {
                    return Err(Error::Constraint(format!("column '{}' cannot be null", col.name)));
                }
                Value::Null => Value::Null,
                value => col.coerce(value.clone())?,
            };
            resolved.push((index, value));
        }

        let matched = filter_rows(table, predicate)?;
        check_unique_key(table, &resolved, &matched)?;

        let mut count = 0;
        for (row, hit) in table.rows.iter_mut().zip(&matched) {
            if !*hit {
                continue;
            }
            for (index, value) in &resolved {
                row[*index] = value.clone();
            }
            count += 1;
        }

        debug!("updated {} row(s) in '{}'", count, table_name);
        self.persist()?;
        Ok(count)
    }

    /// Removes matching rows (all rows without a predicate), keeping the
    /// order of the rest, and returns how many were removed
    pub fn delete(&mut self, table_name: &str, predicate: Option<&Predicate>) -> Result<usize> {
        let table = self.must_get_table_mut(table_name)?;
        let matched = filter_rows(table, predicate)?;

        let mut count = 0;
        let mut kept = Vec::with_capacity(table.rows.len());
        for (row, hit) in std::mem::take(&mut table.rows).into_iter().zip(matched) {
            if hit {
                count += 1;
            } else {
                kept.push(row);
            }
        }
        table.rows = kept;

        debug!("deleted {} row(s) from '{}'", count, table_name);
        self.persist()?;
        Ok(count)
    }
}

impl<S: Storage + 'static> Database<S> {
    /// Parses and executes one SQL statement
    pub fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let stmt = Parser::new(sql).parse()?;
        <dyn Executor<S>>::build(stmt).execute(self)
    }
}

/// Evaluates the predicate on every row; true everywhere without one
fn filter_rows(table: &Table, predicate: Option<&Predicate>) -> Result<Vec<bool>> {
    match predicate {
        None => Ok(vec![true; table.rows.len()]),
        Some(predicate) => {
            table.get_col_index(&predicate.column)?;
            table
                .rows
                .iter()
                .map(|row| predicate.evaluate(table, row))
                .collect()
        }
    }
}

/// Rejects an update that would leave two rows with the same primary key
fn check_unique_key(table: &Table, resolved: &[(usize, Value)], matched: &[bool]) -> Result<()> {
    let Some(pk) = table.primary_key_index() else {
        return Ok(());
    };
    let Some((_, value)) = resolved.iter().find(|(index, _)| *index == pk) else {
        return Ok(());
    };

    let hits = matched.iter().filter(|m| **m).count();
    let clash = table
        .rows
        .iter()
        .zip(matched)
        .any(|(row, hit)| !*hit && row[pk] == *value);
    if hits > 1 || (hits == 1 && clash) {
        return Err(Error::Constraint(format!("duplicate primary key value: {}", value)));
    }
    Ok(())
}
