// Addresses infrastructure - SQLite and in-memory store implementations

mod in_memory;
mod sqlite_address_store;

pub use in_memory::InMemoryAddressStore;
pub use sqlite_address_store::SqliteAddressStore;
