//! Command and message handlers

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::core::config;
use crate::core::{AppError, AppResult};
use crate::storage::db;
use crate::storage::{get_connection, TopicRef};
use crate::telegram::links::message_url;
use crate::telegram::menu::{delete_message_best_effort, remove_menu, republish_menu, DeleteOutcome};

use super::types::{DeleteRequest, HandlerDeps};

/// Send a reply to the given message.
async fn reply_to(bot: &Bot, msg: &Message, text: impl Into<String>) -> AppResult<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await
        .map_err(AppError::Telegram)?;
    Ok(())
}

/// Best-effort removal of the triggering command message, to keep the
/// topic clean. Failures (e.g. missing delete rights) never fail the
/// handler.
async fn discard_trigger(bot: &Bot, msg: &Message) {
    match delete_message_best_effort(bot, msg.chat.id, msg.id).await {
        DeleteOutcome::Deleted | DeleteOutcome::NotFound => {}
        DeleteOutcome::Failed(err) => {
            log::debug!("Could not delete trigger message {} in chat {}: {}", msg.id.0, msg.chat.id, err);
        }
    }
}

/// `/start` — usage help. Private chats get setup instructions, groups get
/// the command summary.
pub async fn handle_start(bot: &Bot, msg: &Message) -> AppResult<()> {
    let text = if msg.chat.is_private() {
        "Hi! I keep a navigation menu pinned to the bottom of forum topics.\n\n\
         1. Add me to a supergroup with topics enabled.\n\
         2. Grant me rights to send and delete messages.\n\
         3. Disable my privacy mode in BotFather (/setprivacy -> Disable).\n\n\
         Inside a topic:\n\
         - reply to a post with /add <title> to add a menu button\n\
         - /list shows the buttons with their numbers\n\
         - delete 1 or delete all removes them"
    } else {
        "Bot activated.\n\
         - /add <title> (as a reply to a post): add a menu button\n\
         - /list: list buttons (numbers for delete)\n\
         - delete 1: remove button number 1\n\
         - delete all: remove every button in this topic\n\n\
         Your id for the admin allow-list: /myid"
    };

    bot.send_message(msg.chat.id, text).await.map_err(AppError::Telegram)?;
    Ok(())
}

/// `/myid` — shows the caller's Telegram id for the ADMIN_IDS allow-list.
pub async fn handle_myid(bot: &Bot, msg: &Message) -> AppResult<()> {
    let uid = msg.from.as_ref().map(|u| u.id.0).unwrap_or(0);
    reply_to(
        bot,
        msg,
        format!(
            "Your id: {}\n\nPut it into the ADMIN_IDS environment variable so that only you can manage menu buttons.",
            uid
        ),
    )
    .await
}

/// `/add <title>` — invoked as a reply to a post inside a topic: appends a
/// button linking to that post and republishes the menu.
pub async fn handle_add(bot: &Bot, deps: &HandlerDeps, msg: &Message, title: &str) -> AppResult<()> {
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        bot.send_message(msg.chat.id, "This command is meant for groups/supergroups.")
            .await
            .map_err(AppError::Telegram)?;
        return Ok(());
    }

    if !deps.is_authorized(msg) {
        return reply_to(bot, msg, "Only a bot admin can add menu buttons.").await;
    }

    let Some(topic) = TopicRef::from_message(msg) else {
        return reply_to(bot, msg, "This command must be used inside a topic (forum thread).").await;
    };

    let Some(target) = msg.reply_to_message() else {
        return reply_to(
            bot,
            msg,
            "Reply to the post you want in the menu and write: /add <title>",
        )
        .await;
    };

    let title = title.trim();
    let title = if title.is_empty() { config::FALLBACK_LINK_TITLE } else { title };

    // Never a user-supplied raw URL: the target is always the replied-to
    // message's permalink.
    let url = message_url(msg.chat.id, msg.chat.username(), target.id);

    {
        let conn = get_connection(&deps.db_pool)?;
        db::add_link(&conn, topic, title, &url)?;
    }
    log::info!("Added link {:?} -> {} in {}", title, url, topic);

    republish_menu(bot, deps, topic).await?;
    discard_trigger(bot, msg).await;
    Ok(())
}

/// `/list` — replies with a 1-indexed enumeration of the topic's links.
pub async fn handle_list(bot: &Bot, deps: &HandlerDeps, msg: &Message) -> AppResult<()> {
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        bot.send_message(msg.chat.id, "This command is meant for groups/supergroups.")
            .await
            .map_err(AppError::Telegram)?;
        return Ok(());
    }

    if !deps.is_authorized(msg) {
        return reply_to(bot, msg, "Only a bot admin can list menu buttons.").await;
    }

    let Some(topic) = TopicRef::from_message(msg) else {
        return reply_to(bot, msg, "This command must be used inside a topic (forum thread).").await;
    };

    let conn = get_connection(&deps.db_pool)?;
    let links = db::get_links(&conn, topic)?;
    if links.is_empty() {
        return reply_to(bot, msg, "No menu buttons in this topic yet.").await;
    }

    let mut lines = vec!["Buttons in this topic (to remove: delete 1, delete 2, ... or delete all):".to_string()];
    for (idx, link) in links.iter().enumerate() {
        lines.push(format!("{}. {} - {}", idx + 1, link.title, link.url));
    }

    reply_to(bot, msg, lines.join("\n")).await
}

/// `delete N` / `delete all` — plain-text deletion commands inside a topic.
pub async fn handle_delete(bot: &Bot, deps: &HandlerDeps, msg: &Message, request: DeleteRequest) -> AppResult<()> {
    // Outside a topic the text is just ordinary chat; stay silent.
    let Some(topic) = TopicRef::from_message(msg) else {
        return Ok(());
    };

    if !deps.is_authorized(msg) {
        return reply_to(bot, msg, "Only a bot admin can delete menu buttons.").await;
    }

    match request {
        DeleteRequest::All => {
            {
                let conn = get_connection(&deps.db_pool)?;
                db::clear_links(&conn, topic)?;
            }
            log::info!("Cleared all links in {}", topic);

            remove_menu(bot, deps, topic).await?;
            discard_trigger(bot, msg).await;
        }
        DeleteRequest::Index(index) => {
            let removed = {
                let conn = get_connection(&deps.db_pool)?;
                db::remove_link_at_index(&conn, topic, index)?
            };

            if removed {
                log::info!("Removed link {} in {}", index, topic);
                republish_menu(bot, deps, topic).await?;
                discard_trigger(bot, msg).await;
            } else {
                reply_to(
                    bot,
                    msg,
                    format!("There is no button number {}. Check the numbers with /list.", index),
                )
                .await?;
            }
        }
    }

    Ok(())
}

/// Any other message in a monitored group: if the topic has links, the
/// menu is republished so it stays the most recent message there.
pub async fn handle_topic_activity(bot: &Bot, deps: &HandlerDeps, msg: &Message) -> AppResult<()> {
    let Some(topic) = TopicRef::from_message(msg) else {
        return Ok(());
    };

    let has_links = {
        let conn = get_connection(&deps.db_pool)?;
        !db::get_links(&conn, topic)?.is_empty()
    };
    if !has_links {
        return Ok(());
    }

    republish_menu(bot, deps, topic).await
}
