use rusqlite::Connection;
use tracing::info;

/// Create the `messages` table and its indexes if they do not exist yet.
pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            sender      TEXT NOT NULL,
            recipient   TEXT NOT NULL,
            body        TEXT NOT NULL,
            isPublic    INTEGER NOT NULL DEFAULT 1,
            createdAt   TEXT NOT NULL,
            updatedAt   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_created
            ON messages(createdAt);

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(sender, recipient, createdAt);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
