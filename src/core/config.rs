use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::env;
use std::time::Duration;

/// Bot API token, read once from the BOT_TOKEN environment variable.
/// Empty when unset; `create_bot` treats that as a fatal startup error.
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| env::var("BOT_TOKEN").unwrap_or_default().trim().to_string());

/// Allow-list of user ids permitted to manage links, read from ADMIN_IDS
/// as a comma-separated list. An empty list means every caller is allowed.
///
/// Entries that do not parse as integers are skipped with a warning rather
/// than aborting startup.
pub static ADMIN_IDS: Lazy<HashSet<i64>> = Lazy::new(|| {
    let raw = env::var("ADMIN_IDS").unwrap_or_default();
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("Ignoring malformed ADMIN_IDS entry: {:?}", part);
                None
            }
        })
        .collect()
});

/// Path to the SQLite database file.
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "topicnav.sqlite".to_string()));

/// Path to the log file.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "topicnav.log".to_string()));

/// Button label used when /add is invoked without a title.
pub const FALLBACK_LINK_TITLE: &str = "Link";

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
