//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod keyboard;
pub mod links;
pub mod menu;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps};
pub use keyboard::topic_keyboard;
pub use links::message_url;
pub use menu::{remove_menu, republish_menu};
