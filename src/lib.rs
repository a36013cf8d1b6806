//! topicnav - Telegram bot that keeps a per-topic navigation menu pinned
//! to the bottom of each forum topic.
//!
//! Each topic in a supergroup can carry a small ordered list of links;
//! the bot republishes a single inline-button menu whenever new activity
//! occurs, so the menu is always the most recent message in the topic.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `storage`: SQLite link store and menu-pointer registry
//! - `telegram`: bot setup, rendering, reconciliation, and handlers

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool, TopicRef};
pub use crate::telegram::{create_bot, republish_menu, schema, HandlerDeps};
