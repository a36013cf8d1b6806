//! Menu panel rendering

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::storage::TopicLink;

/// Render a topic's link list as an inline keyboard, one button per row,
/// rows in insertion order. An empty list means "no panel": the caller
/// must not publish a menu at all.
///
/// Stored URLs are bot-constructed; a row that no longer parses is
/// skipped with a warning instead of taking the whole menu down.
pub fn topic_keyboard(links: &[TopicLink]) -> Option<InlineKeyboardMarkup> {
    if links.is_empty() {
        return None;
    }

    let mut rows = Vec::with_capacity(links.len());
    for link in links {
        match Url::parse(&link.url) {
            Ok(url) => rows.push(vec![InlineKeyboardButton::url(link.title.clone(), url)]),
            Err(e) => log::warn!("Skipping link {:?} with unparseable URL {:?}: {}", link.title, link.url, e),
        }
    }

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}
