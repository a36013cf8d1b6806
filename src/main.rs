use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use topicnav::cli::{Cli, Commands};
use topicnav::core::{config, init_logger};
use topicnav::storage::create_pool;
use topicnav::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot
/// creation) - a bot that cannot reach its store or its credentials is a
/// startup failure, not a runtime condition.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config static is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting topicnav...");

    let bot = create_bot()?;

    let me = bot.get_me().await?;
    log::info!("Bot username: {:?}, id: {}", me.username, me.id);

    setup_bot_commands(&bot).await?;

    let db_pool = Arc::new(
        create_pool(&config::DATABASE_PATH)
            .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", &*config::DATABASE_PATH, e))?,
    );
    log::info!("Database ready at {}", &*config::DATABASE_PATH);

    if config::ADMIN_IDS.is_empty() {
        log::warn!("ADMIN_IDS is empty: every chat member may manage menu buttons");
    } else {
        log::info!("Allow-list active with {} admin id(s)", config::ADMIN_IDS.len());
    }

    let deps = HandlerDeps::new(db_pool, Arc::new(config::ADMIN_IDS.clone()));

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shut down gracefully");
    Ok(())
}
