//! Key-value stores for PagePilot.
//!
//! [`SqliteStore`] persists to a SQLite file (or an in-memory database);
//! [`MemoryStore`] keeps everything in a map and is what tests use.

mod backend;
mod memory;
mod schema;

pub use backend::SqliteStore;
pub use memory::MemoryStore;
