//! SQLite-backed notification store (Diesel ORM).

pub mod connection;
mod model;
pub mod schema;
mod sqlite;

pub use connection::{create_pool, run_migrations, DbPool, MIGRATIONS};
pub use sqlite::SqliteNotificationStore;
