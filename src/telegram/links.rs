//! Deep links to messages inside a chat

use teloxide::types::{ChatId, MessageId};

/// Build a permalink to a message.
///
/// Chats with a public handle get `https://t.me/<handle>/<message_id>`.
/// Private supergroups use the `t.me/c/...` form, where the path segment is
/// the absolute chat id with the leading `100` internal-id prefix stripped.
/// That transform is a platform convention; links do not resolve without it.
pub fn message_url(chat_id: ChatId, chat_username: Option<&str>, message_id: MessageId) -> String {
    if let Some(username) = chat_username {
        return format!("https://t.me/{}/{}", username, message_id.0);
    }

    let internal = chat_id.0.unsigned_abs().to_string();
    let internal = internal.strip_prefix("100").unwrap_or(&internal);

    format!("https://t.me/c/{}/{}", internal, message_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn public_chat_links_use_the_handle() {
        let url = message_url(ChatId(-1001234567890), Some("rustlang"), MessageId(42));
        assert_eq!(url, "https://t.me/rustlang/42");
    }

    #[test]
    fn private_supergroup_links_strip_the_internal_prefix() {
        let url = message_url(ChatId(-1001234567890), None, MessageId(77));
        assert_eq!(url, "https://t.me/c/1234567890/77");
    }

    #[test]
    fn ids_without_the_prefix_are_kept_verbatim() {
        let url = message_url(ChatId(-987654), None, MessageId(5));
        assert_eq!(url, "https://t.me/c/987654/5");
    }
}
