use std::fmt;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Result};
use teloxide::types::{ChatId, Message, MessageId, ThreadId};

use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Identity of a forum topic: the chat id alone does not disambiguate
/// topics, so every store operation is keyed by this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicRef {
    pub chat_id: ChatId,
    pub thread_id: ThreadId,
}

impl TopicRef {
    pub fn new(chat_id: ChatId, thread_id: ThreadId) -> Self {
        Self { chat_id, thread_id }
    }

    /// Extract the topic a message belongs to, or `None` for messages
    /// outside forum topics (private chats, the general chat stream).
    ///
    /// Requires `is_topic_message` in addition to a thread id: replies in
    /// non-forum supergroups (e.g. channel discussion groups) also carry a
    /// `message_thread_id`, but that thread is not a forum topic.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if !msg.is_topic_message {
            return None;
        }
        msg.thread_id.map(|thread_id| Self {
            chat_id: msg.chat.id,
            thread_id,
        })
    }
}

impl fmt::Display for TopicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat {} topic {}", self.chat_id.0, self.thread_id.0 .0)
    }
}

/// A navigation link shown as one button in a topic's menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLink {
    pub title: String,
    pub url: String,
}

/// Create a new database connection pool.
///
/// Initializes a pool with up to 10 connections and applies schema
/// migrations on the first connection. Migration failures are fatal.
///
/// # Arguments
/// * `database_path` - Path to the SQLite database file
pub fn create_pool(database_path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool. The connection returns to the pool
/// when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Append a link to a topic's list. Insertion order assigns the link its
/// display position; links are never reordered afterwards.
pub fn add_link(conn: &DbConnection, topic: TopicRef, title: &str, url: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO topic_links (chat_id, thread_id, title, url) VALUES (?1, ?2, ?3, ?4)",
        params![topic.chat_id.0, topic.thread_id.0 .0, title, url],
    )?;
    Ok(())
}

/// Fetch a topic's links in insertion order, oldest first.
pub fn get_links(conn: &DbConnection, topic: TopicRef) -> Result<Vec<TopicLink>> {
    let mut stmt = conn.prepare(
        "SELECT title, url FROM topic_links WHERE chat_id = ?1 AND thread_id = ?2 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![topic.chat_id.0, topic.thread_id.0 .0], |row| {
        Ok(TopicLink {
            title: row.get(0)?,
            url: row.get(1)?,
        })
    })?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row?);
    }
    Ok(links)
}

/// Delete the link at a 1-based display position.
///
/// Returns `Ok(true)` if a link was deleted, `Ok(false)` if the index is
/// outside `[1, count]` (the list is left unchanged). Surviving links keep
/// their relative order, so their display positions shift down by one.
pub fn remove_link_at_index(conn: &DbConnection, topic: TopicRef, index: i64) -> Result<bool> {
    let mut stmt = conn.prepare(
        "SELECT id FROM topic_links WHERE chat_id = ?1 AND thread_id = ?2 ORDER BY id ASC",
    )?;
    let ids = stmt
        .query_map(params![topic.chat_id.0, topic.thread_id.0 .0], |row| {
            row.get::<_, i64>(0)
        })?
        .collect::<Result<Vec<i64>>>()?;

    if index < 1 || index > ids.len() as i64 {
        return Ok(false);
    }

    conn.execute(
        "DELETE FROM topic_links WHERE id = ?1",
        params![ids[index as usize - 1]],
    )?;
    Ok(true)
}

/// Delete all links for a topic.
pub fn clear_links(conn: &DbConnection, topic: TopicRef) -> Result<()> {
    conn.execute(
        "DELETE FROM topic_links WHERE chat_id = ?1 AND thread_id = ?2",
        params![topic.chat_id.0, topic.thread_id.0 .0],
    )?;
    Ok(())
}

/// Get the id of the topic's currently-live menu message, if one is stored.
pub fn get_menu_message_id(conn: &DbConnection, topic: TopicRef) -> Result<Option<MessageId>> {
    conn.query_row(
        "SELECT menu_message_id FROM topic_menus WHERE chat_id = ?1 AND thread_id = ?2",
        params![topic.chat_id.0, topic.thread_id.0 .0],
        |row| row.get::<_, i32>(0).map(MessageId),
    )
    .optional()
}

/// Record the topic's menu message id, replacing any previous value.
pub fn set_menu_message_id(conn: &DbConnection, topic: TopicRef, message_id: MessageId) -> Result<()> {
    conn.execute(
        "INSERT INTO topic_menus (chat_id, thread_id, menu_message_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(chat_id, thread_id) DO UPDATE SET menu_message_id = excluded.menu_message_id",
        params![topic.chat_id.0, topic.thread_id.0 .0, message_id.0],
    )?;
    Ok(())
}

/// Forget the topic's menu message id.
pub fn clear_menu_message_id(conn: &DbConnection, topic: TopicRef) -> Result<()> {
    conn.execute(
        "DELETE FROM topic_menus WHERE chat_id = ?1 AND thread_id = ?2",
        params![topic.chat_id.0, topic.thread_id.0 .0],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn test_pool() -> (DbPool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (pool, dir)
    }

    fn topic(chat_id: i64, thread_id: i32) -> TopicRef {
        TopicRef::new(ChatId(chat_id), ThreadId(MessageId(thread_id)))
    }

    #[test]
    fn links_keep_insertion_order() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let t = topic(-100123, 7);

        add_link(&conn, t, "Intro", "https://t.me/c/123/501").unwrap();
        add_link(&conn, t, "Rules", "https://t.me/c/123/502").unwrap();
        add_link(&conn, t, "FAQ", "https://t.me/c/123/503").unwrap();

        let links = get_links(&conn, t).unwrap();
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Rules", "FAQ"]);
    }

    #[test]
    fn remove_at_index_shifts_positions_down() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let t = topic(-100123, 7);

        add_link(&conn, t, "Intro", "https://t.me/c/123/501").unwrap();
        add_link(&conn, t, "Rules", "https://t.me/c/123/502").unwrap();
        add_link(&conn, t, "FAQ", "https://t.me/c/123/503").unwrap();

        assert!(remove_link_at_index(&conn, t, 2).unwrap());

        let links = get_links(&conn, t).unwrap();
        assert_eq!(links.len(), 2);
        // "FAQ" is now reachable as index 2
        assert_eq!(links[0].title, "Intro");
        assert_eq!(links[1].title, "FAQ");
        assert!(remove_link_at_index(&conn, t, 2).unwrap());
        assert_eq!(get_links(&conn, t).unwrap()[0].title, "Intro");
    }

    #[test]
    fn remove_at_out_of_range_index_is_a_no_op() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let t = topic(-100123, 7);

        add_link(&conn, t, "Intro", "https://t.me/c/123/501").unwrap();

        assert!(!remove_link_at_index(&conn, t, 0).unwrap());
        assert!(!remove_link_at_index(&conn, t, 2).unwrap());
        assert!(!remove_link_at_index(&conn, t, -5).unwrap());
        assert_eq!(get_links(&conn, t).unwrap().len(), 1);
    }

    #[test]
    fn clear_links_empties_only_the_given_topic() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let a = topic(-100123, 7);
        let b = topic(-100123, 8);

        add_link(&conn, a, "Intro", "https://t.me/c/123/501").unwrap();
        add_link(&conn, b, "Other", "https://t.me/c/123/601").unwrap();

        clear_links(&conn, a).unwrap();

        assert!(get_links(&conn, a).unwrap().is_empty());
        assert_eq!(get_links(&conn, b).unwrap().len(), 1);
    }

    #[test]
    fn topics_in_the_same_chat_are_isolated() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let a = topic(-100123, 7);
        let b = topic(-100123, 8);

        add_link(&conn, a, "Intro", "https://t.me/c/123/501").unwrap();

        assert!(get_links(&conn, b).unwrap().is_empty());
        assert!(!remove_link_at_index(&conn, b, 1).unwrap());
        assert_eq!(get_links(&conn, a).unwrap().len(), 1);
    }

    #[test]
    fn menu_pointer_upsert_keeps_one_row_per_topic() {
        let (pool, _dir) = test_pool();
        let conn = get_connection(&pool).unwrap();
        let t = topic(-100123, 7);

        assert_eq!(get_menu_message_id(&conn, t).unwrap(), None);

        set_menu_message_id(&conn, t, MessageId(10)).unwrap();
        assert_eq!(get_menu_message_id(&conn, t).unwrap(), Some(MessageId(10)));

        // Last write wins
        set_menu_message_id(&conn, t, MessageId(11)).unwrap();
        assert_eq!(get_menu_message_id(&conn, t).unwrap(), Some(MessageId(11)));

        clear_menu_message_id(&conn, t).unwrap();
        assert_eq!(get_menu_message_id(&conn, t).unwrap(), None);
    }

    #[test]
    fn forum_topic_messages_resolve_to_their_topic() {
        let msg: Message = serde_json::from_str(
            r#"{
                "message_id": 200,
                "date": 1700000000,
                "chat": {"id": -1001234567890, "type": "supergroup", "title": "Club"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "message_thread_id": 5,
                "is_topic_message": true,
                "text": "hello"
            }"#,
        )
        .unwrap();

        assert_eq!(
            TopicRef::from_message(&msg),
            Some(topic(-1001234567890, 5))
        );
    }

    #[test]
    fn non_forum_replies_carry_a_thread_id_but_no_topic() {
        // A reply in a regular supergroup (e.g. a channel discussion group)
        // has a message_thread_id without being a forum topic message.
        let msg: Message = serde_json::from_str(
            r#"{
                "message_id": 201,
                "date": 1700000000,
                "chat": {"id": -1001234567890, "type": "supergroup", "title": "Club"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "message_thread_id": 5,
                "text": "hello"
            }"#,
        )
        .unwrap();

        assert!(!msg.is_topic_message);
        assert_eq!(TopicRef::from_message(&msg), None);
    }

    #[test]
    fn topic_ref_display_names_chat_and_topic() {
        // The Display form shows up in logs; keep it stable.
        let t = topic(-1001234567890, 42);
        assert_eq!(t.to_string(), "chat -1001234567890 topic 42");
    }
}
