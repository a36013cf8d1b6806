//! SQLite persistence for topic links and menu pointers

pub mod db;
pub mod migrations;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool, TopicLink, TopicRef};
