pub mod entry_store;
pub mod memory_store;
pub mod pg_store;
pub mod pool;

pub use entry_store::{EntryStore, PersistenceError};
pub use memory_store::MemoryEntryStore;
pub use pg_store::PgEntryStore;
pub use pool::create_pool;

#[cfg(test)]
pub use entry_store::MockEntryStore;
