//! Table persistence.
//!
//! Each actor owns exactly one named table. The [`Table`] trait is the whole
//! repository contract an actor needs: read every row at startup, write every
//! row after each committed change.
//!
//! Two backends are provided:
//! - [`MemoryTable`] keeps nothing durable; used for tests and ephemeral runs.
//! - [`JsonFileTable`] stores `<dir>/<name>.json`, replaced atomically on each save.
//!
//! Rows are deserialised into typed records, so a row of the wrong shape fails
//! the load instead of leaking an untyped value into the system. The owning actor
//! then runs each record's own `validate` hook.

mod json_file;
mod memory;

pub use json_file::JsonFileTable;
pub use memory::MemoryTable;

use thiserror::Error;

/// The four tables of the storefront.
pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";
pub const ORDER_ITEMS: &str = "order_items";
pub const USERS: &str = "users";

/// Errors raised while loading or saving a table.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("I/O error on table {table}: {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored text is not a list of well-formed records.
    #[error("Malformed table {table}: {source}")]
    Malformed {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// A row decoded but breaks its record's invariants.
    #[error("Invalid row {id} in table {table}: {reason}")]
    InvalidRow {
        table: String,
        id: String,
        reason: String,
    },

    /// Two rows share a key.
    #[error("Duplicate id {id} in table {table}")]
    DuplicateId { table: String, id: String },
}

/// A named collection of records that can be loaded and saved as a whole.
pub trait Table<T>: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Read every stored row.
    fn load(&self) -> Result<Vec<T>, StorageError>;

    /// Replace the stored rows with `rows`.
    fn save(&self, rows: &[&T]) -> Result<(), StorageError>;
}

/// Lets the backend be picked at runtime.
impl<T: 'static> Table<T> for Box<dyn Table<T>> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Result<Vec<T>, StorageError> {
        (**self).load()
    }

    fn save(&self, rows: &[&T]) -> Result<(), StorageError> {
        (**self).save(rows)
    }
}
