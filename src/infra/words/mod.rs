// Words infrastructure - SQLite and in-memory store implementations

mod in_memory;
mod sqlite_word_store;

pub use in_memory::InMemoryWordStore;
pub use sqlite_word_store::SqliteWordStore;
