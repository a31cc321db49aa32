use crate::{error::Result, sql::schema::Catalog};

/// Abstract persistence interface (whole-catalog operations)
///
/// Different from sql::engine::Database which operates on rows. A backend
/// stores complete snapshots: every save overwrites what was there before.
pub trait Storage {
    /// Loads the last saved catalog, or None if nothing was ever saved
    fn load(&mut self) -> Result<Option<Catalog>>;

    /// Replaces the stored catalog with `catalog`, schema and rows alike
    fn save(&mut self, catalog: &Catalog) -> Result<()>;

    /// Rejects table names the backend cannot store
    fn check_table_name(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}
