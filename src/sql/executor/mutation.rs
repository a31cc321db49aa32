use std::collections::{BTreeMap, HashMap};

use crate::{
    error::{Error, Result},
    sql::{
        engine::Database,
        executor::{Executor, ResultSet},
        parser::ast::Predicate,
        types::Value,
    },
    storage::Storage,
};

/// INSERT executor
pub struct Insert {
    table_name: String,
    columns: Option<Vec<String>>,
    values: Vec<Value>,
}

impl Insert {
    pub fn new(table_name: String, columns: Option<Vec<String>>, values: Vec<Value>) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            values,
        })
    }
}

impl<S: Storage> Executor<S> for Insert {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet> {
        // Without a column list, values bind to the declared column order:
        // tbl(a, b, c, d), insert into tbl values(1, 2) sets a = 1, b = 2
        let columns = match self.columns {
            Some(columns) => columns,
            None => db.must_get_table(&self.table_name)?.column_names(),
        };
        if self.values.len() > columns.len() {
            return Err(Error::Syntax("too many values".into()));
        }

        let values: HashMap<String, Value> = columns.into_iter().zip(self.values).collect();
        db.insert(&self.table_name, values)?;
        Ok(ResultSet::Insert { count: 1 })
    }
}

/// UPDATE executor
pub struct Update {
    table_name: String,
    columns: BTreeMap<String, Value>,
    filter: Option<Predicate>,
}

impl Update {
    pub fn new(
        table_name: String,
        columns: BTreeMap<String, Value>,
        filter: Option<Predicate>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            filter,
        })
    }
}

impl<S: Storage> Executor<S> for Update {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet> {
        let count = db.update(&self.table_name, &self.columns, self.filter.as_ref())?;
        Ok(ResultSet::Update { count })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    filter: Option<Predicate>,
}

impl Delete {
    pub fn new(table_name: String, filter: Option<Predicate>) -> Box<Self> {
        Box::new(Self { table_name, filter })
    }
}

impl<S: Storage> Executor<S> for Delete {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet> {
        let count = db.delete(&self.table_name, self.filter.as_ref())?;
        Ok(ResultSet::Delete { count })
    }
}
