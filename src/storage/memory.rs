use super::{StorageError, Table};

/// A table that lives only as long as its actor.
///
/// `load` hands back the rows it was seeded with; `save` is a no-op.
#[derive(Debug, Clone)]
pub struct MemoryTable<T> {
    name: String,
    rows: Vec<T>,
}

impl<T> MemoryTable<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Table<T> for MemoryTable<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.rows.clone())
    }

    fn save(&self, _rows: &[&T]) -> Result<(), StorageError> {
        Ok(())
    }
}
