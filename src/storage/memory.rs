use crate::{error::Result, sql::schema::Catalog, storage::engine::Storage};

/// In-memory storage backend
///
/// Keeps the last saved snapshot; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Option<Catalog>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self) -> Result<Option<Catalog>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        self.snapshot = Some(catalog.clone());
        self.saves += 1;
        Ok(())
    }
}
