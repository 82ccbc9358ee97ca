use super::{StorageError, Table};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A table stored as a JSON array in `<dir>/<name>.json`.
///
/// A missing file is an empty table. Saves write a sibling temp file and rename
/// it over the original, so readers only ever see a complete table.
#[derive(Debug, Clone)]
pub struct JsonFileTable {
    name: String,
    path: PathBuf,
}

impl JsonFileTable {
    /// Open the table `name` inside `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            table: name.clone(),
            source,
        })?;
        let path = dir.join(format!("{name}.json"));
        Ok(Self { name, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            table: self.name.clone(),
            source,
        }
    }
}

impl<T> Table<T> for JsonFileTable
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<T>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        let rows: Vec<T> = serde_json::from_str(&text).map_err(|source| StorageError::Malformed {
            table: self.name.clone(),
            source,
        })?;
        debug!(table = %self.name, rows = rows.len(), "Loaded table");
        Ok(rows)
    }

    fn save(&self, rows: &[&T]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(rows).map_err(|source| StorageError::Malformed {
            table: self.name.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(|e| self.io_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))?;
        debug!(table = %self.name, rows = rows.len(), "Saved table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        qty: u32,
    }

    #[test]
    fn missing_file_loads_as_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = JsonFileTable::open(dir.path(), "rows").unwrap();
        let rows: Vec<Row> = table.load().unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn saved_rows_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let table = JsonFileTable::open(dir.path().join("nested"), "rows").unwrap();
        let a = Row { id: "a".into(), qty: 1 };
        let b = Row { id: "b".into(), qty: 2 };
        table.save(&[&a, &b]).unwrap();

        let loaded: Vec<Row> = table.load().unwrap();
        assert_eq!(loaded, vec![a, b]);
        assert!(!table.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn rows_of_the_wrong_shape_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let table = JsonFileTable::open(dir.path(), "rows").unwrap();
        fs::write(table.path(), r#"[{"id": "a", "qty": "lots"}]"#).unwrap();

        let result: Result<Vec<Row>, _> = table.load();
        assert!(matches!(result, Err(StorageError::Malformed { table, .. }) if table == "rows"));
    }
}
