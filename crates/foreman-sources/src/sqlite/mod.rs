//! SQLite-backed task source.

pub(crate) mod schema;
pub(crate) mod store;
pub(crate) mod tasks;

pub use store::SqliteSource;
