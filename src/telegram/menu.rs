//! Menu reconciliation: keeps at most one menu message per topic, always
//! the most recent message there.

use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};

use crate::core::{AppError, AppResult};
use crate::storage::db;
use crate::storage::{get_connection, TopicRef};
use crate::telegram::handlers::HandlerDeps;
use crate::telegram::keyboard::topic_keyboard;

/// Text carried by every menu message, above the button panel.
pub const MENU_TEXT: &str = "⬇️ Quick navigation for this topic";

/// Outcome of a best-effort message deletion.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The message existed and was deleted.
    Deleted,
    /// The message was already gone (deleted externally, expired, or never
    /// existed). Matches intent, so callers stay silent about it.
    NotFound,
    /// Any other failure. Callers log and move on; the stale message is
    /// superseded regardless.
    Failed(RequestError),
}

/// Delete a message, folding the error space into [`DeleteOutcome`].
/// Never returns an error: deletion here is always best-effort cleanup.
pub async fn delete_message_best_effort(bot: &Bot, chat_id: ChatId, message_id: MessageId) -> DeleteOutcome {
    match bot.delete_message(chat_id, message_id).await {
        Ok(_) => DeleteOutcome::Deleted,
        Err(err) if is_message_gone(&err) => DeleteOutcome::NotFound,
        Err(err) => DeleteOutcome::Failed(err),
    }
}

fn is_message_gone(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Api(ApiError::MessageToDeleteNotFound | ApiError::MessageIdInvalid)
    )
}

/// Re-publish the topic's menu so it becomes the most recent message.
///
/// 1. Render the panel for the current link list; an empty topic has no
///    menu, so nothing is sent and no pointer is touched.
/// 2. Best-effort delete the previous menu message, if one is recorded.
/// 3. Send a fresh menu into the topic.
/// 4. Record the new message id, overwriting any prior pointer.
///
/// Idempotent in effect: each call removes the previous menu first, so
/// repeated calls never accumulate duplicates.
pub async fn republish_menu(bot: &Bot, deps: &HandlerDeps, topic: TopicRef) -> AppResult<()> {
    let conn = get_connection(&deps.db_pool)?;

    let links = db::get_links(&conn, topic)?;
    let Some(keyboard) = topic_keyboard(&links) else {
        return Ok(());
    };

    if let Some(old_id) = db::get_menu_message_id(&conn, topic)? {
        match delete_message_best_effort(bot, topic.chat_id, old_id).await {
            DeleteOutcome::Deleted | DeleteOutcome::NotFound => {}
            DeleteOutcome::Failed(err) => {
                log::warn!("Failed to delete stale menu message {} in {}: {}", old_id.0, topic, err);
            }
        }
    }

    // Unlike the cleanup above, a failed publish leaves no panel live and
    // must surface.
    let sent = bot
        .send_message(topic.chat_id, MENU_TEXT)
        .message_thread_id(topic.thread_id)
        .reply_markup(keyboard)
        .await
        .map_err(AppError::Telegram)?;

    db::set_menu_message_id(&conn, topic, sent.id)?;
    Ok(())
}

/// Take down the topic's menu entirely: best-effort delete the live menu
/// message and forget the pointer. Used when the link list is emptied.
pub async fn remove_menu(bot: &Bot, deps: &HandlerDeps, topic: TopicRef) -> AppResult<()> {
    let conn = get_connection(&deps.db_pool)?;

    if let Some(old_id) = db::get_menu_message_id(&conn, topic)? {
        match delete_message_best_effort(bot, topic.chat_id, old_id).await {
            DeleteOutcome::Deleted | DeleteOutcome::NotFound => {}
            DeleteOutcome::Failed(err) => {
                log::warn!("Failed to delete menu message {} in {}: {}", old_id.0, topic, err);
            }
        }
        db::clear_menu_message_id(&conn, topic)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_deleted_messages_count_as_gone() {
        assert!(is_message_gone(&RequestError::Api(ApiError::MessageToDeleteNotFound)));
        assert!(is_message_gone(&RequestError::Api(ApiError::MessageIdInvalid)));
    }

    #[test]
    fn other_failures_are_not_treated_as_gone() {
        assert!(!is_message_gone(&RequestError::Api(ApiError::BotBlocked)));
    }
}
