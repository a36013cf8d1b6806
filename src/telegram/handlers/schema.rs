//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_add, handle_delete, handle_list, handle_myid, handle_start, handle_topic_activity};
use super::types::{parse_delete, DeleteRequest, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the dispatcher schema for the bot.
///
/// Branch order matters: slash commands first, then the plain-text
/// `delete ...` commands, and finally the catch-all group-activity branch
/// that keeps menus at the bottom of their topics. The same schema is used
/// in production and in tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_delete = deps.clone();
    let deps_activity = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(delete_handler(deps_delete))
        .branch(topic_activity_handler(deps_activity))
}

/// Handler for slash commands (/start, /add, /list, /myid)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command {:?} in chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start => handle_start(&bot, &msg).await?,
                    Command::Myid => handle_myid(&bot, &msg).await?,
                    Command::Add(title) => handle_add(&bot, &deps, &msg, &title).await?,
                    Command::List => handle_list(&bot, &deps, &msg).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Handler for the plain-text `delete N` / `delete all` commands
fn delete_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .filter_map(|msg: Message| msg.text().and_then(parse_delete))
        .endpoint(move |bot: Bot, msg: Message, request: DeleteRequest| {
            let deps = deps.clone();
            async move {
                log::info!("Received {:?} in chat {}", request, msg.chat.id);
                handle_delete(&bot, &deps, &msg, request).await?;
                Ok(())
            }
        })
}

/// Handler for every other group message: republishes the menu of the
/// topic the message landed in, if that topic has links. Messages authored
/// by bots are ignored so the bot's own menu posts do not retrigger it.
fn topic_activity_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| {
            (msg.chat.is_group() || msg.chat.is_supergroup())
                && !msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false)
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                handle_topic_activity(&bot, &deps, &msg).await?;
                Ok(())
            }
        })
}
