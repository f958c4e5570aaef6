pub mod memory;
pub mod sqlite;

use crate::app::Result;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

/// Durable local key-value storage.
///
/// A successful `write` replaces the whole value stored under `key`.
pub trait KeyValuePersistence {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&self, key: &str, blob: &[u8]) -> Result<()>;
}
