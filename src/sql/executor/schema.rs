use crate::{
    error::Result,
    sql::{
        engine::Database,
        executor::{Executor, ResultSet},
        schema::Column,
    },
    storage::Storage,
};

/// CREATE TABLE executor
pub struct CreateTable {
    name: String,
    columns: Vec<Column>,
}

impl CreateTable {
    pub fn new(name: String, columns: Vec<Column>) -> Box<Self> {
        Box::new(Self { name, columns })
    }
}

impl<S: Storage> Executor<S> for CreateTable {
    fn execute(self: Box<Self>, db: &mut Database<S>) -> Result<ResultSet> {
        db.create_table(self.name.clone(), self.columns)?;
        Ok(ResultSet::CreateTable {
            table_name: self.name,
        })
    }
}
