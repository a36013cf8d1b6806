//! Event routing: maps inbound chat events onto store mutations and menu
//! reconciliation.

pub mod commands;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use schema::schema;
pub use types::{parse_delete, DeleteRequest, HandlerDeps, HandlerError};
