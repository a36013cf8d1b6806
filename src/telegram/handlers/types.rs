//! Handler dependencies and typed event payloads

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::types::Message;

use crate::storage::db::DbPool;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application context constructed once at startup and handed to every
/// handler. There is no global bot or store state anywhere else.
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    /// Allow-list of user ids permitted to manage links. Empty set means
    /// everyone is allowed.
    pub admin_ids: Arc<HashSet<i64>>,
}

impl HandlerDeps {
    pub fn new(db_pool: Arc<DbPool>, admin_ids: Arc<HashSet<i64>>) -> Self {
        Self { db_pool, admin_ids }
    }

    /// Whether the sender of a message may add, list, or delete links.
    /// Messages without a sender (e.g. anonymous channel posts) are never
    /// authorized to mutate.
    pub fn is_authorized(&self, msg: &Message) -> bool {
        if self.admin_ids.is_empty() {
            return true;
        }
        match msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()) {
            Some(id) => self.admin_ids.contains(&id),
            None => false,
        }
    }
}

/// Typed payload of a `delete ...` text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRequest {
    /// `delete all` — clear the topic's whole link list.
    All,
    /// `delete N` — remove the link at 1-based position N. The value is
    /// kept as given; range checking happens against the store.
    Index(i64),
}

#[allow(clippy::expect_used)]
static DELETE_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^delete\s+(\d{1,18})$").expect("delete regex is valid"));

/// Classify message text as a delete request, or `None` if it is ordinary
/// chat activity. Case-insensitive, tolerant of surrounding whitespace.
pub fn parse_delete(text: &str) -> Option<DeleteRequest> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("delete all") {
        return Some(DeleteRequest::All);
    }

    let caps = DELETE_INDEX_RE.captures(trimmed)?;
    caps.get(1)?.as_str().parse::<i64>().ok().map(DeleteRequest::Index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognizes_delete_by_index() {
        assert_eq!(parse_delete("delete 1"), Some(DeleteRequest::Index(1)));
        assert_eq!(parse_delete("  delete  12  "), Some(DeleteRequest::Index(12)));
        assert_eq!(parse_delete("DELETE 3"), Some(DeleteRequest::Index(3)));
    }

    #[test]
    fn recognizes_delete_all() {
        assert_eq!(parse_delete("delete all"), Some(DeleteRequest::All));
        assert_eq!(parse_delete("Delete All"), Some(DeleteRequest::All));
    }

    #[test]
    fn ordinary_chat_text_is_not_a_delete() {
        assert_eq!(parse_delete("delete"), None);
        assert_eq!(parse_delete("delete one"), None);
        assert_eq!(parse_delete("please delete 1"), None);
        assert_eq!(parse_delete("delete 1 now"), None);
        assert_eq!(parse_delete(""), None);
    }
}
