use crate::{
    error::Result,
    sql::{
        engine::Database,
        executor::{Executor, ResultSet},
        parser::ast::{Predicate, SelectColumns},
    },
    storage::Storage,
};

/// Table scan executor (SELECT)
pub struct Scan {
    table_name: String,
    columns: SelectColumns,
    filter: Option<Predicate>,
}

impl Scan {
    pub fn new(table_name: String, columns: SelectColumns, filter: Option<Predicate>) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            filter,
        })
    }
}

impl<S: Storage> Executor<S> for Scan {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet> {
        db.select(&self.table_name, &self.columns, self.filter.as_ref())
    }
}
