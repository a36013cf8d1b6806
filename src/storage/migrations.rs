use anyhow::{Context, Result};
use rusqlite::Connection;
use std::time::Duration;

mod embedded {
    use refinery::embed_migrations;

    embed_migrations!("./migrations");
}

/// Apply pending schema migrations.
///
/// Refinery wraps each migration in its own transaction; the busy timeout
/// keeps concurrent instances from failing immediately on a locked database.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_secs(30))
        .context("set SQLite busy timeout")?;

    embedded::migrations::runner()
        .run(conn)
        .map(|_| ())
        .context("apply migrations")
}
