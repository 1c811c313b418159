#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use pigeon_db::query::format_timestamp;
use pigeon_db::{Database, StoreConfig};
use pigeon_types::Message;

/// A throwaway database file, removed (with its WAL side files) on drop.
pub struct TempDb {
    pub path: PathBuf,
    pub db: Database,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("pigeon_test_{}.db", Uuid::new_v4().simple()));
        let db = Database::open(StoreConfig::new(&path)).expect("open test database");
        Self { path, db }
    }

    /// Insert a row directly, bypassing the store, so tests control `createdAt`.
    pub fn seed(&self, sender: &str, recipient: &str, body: &str, is_public: bool, at: DateTime<Utc>) {
        let conn = Connection::open(&self.path).expect("open seed connection");
        let stamp = format_timestamp(at);
        conn.execute(
            "INSERT INTO messages (id, sender, recipient, body, isPublic, createdAt, updatedAt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            rusqlite::params![Uuid::new_v4().simple().to_string(), sender, recipient, body, is_public, stamp],
        )
        .expect("seed message");
    }

    pub fn count(&self) -> i64 {
        let conn = Connection::open(&self.path).expect("open count connection");
        conn.query_row("SELECT COUNT(*) FROM messages", [], |r| r.get(0))
            .expect("count messages")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// True if `name` is either party of `message`. `name` must already be normalized.
pub fn involves(message: &Message, name: &str) -> bool {
    message.sender == name || message.recipient == name
}

pub const NEWEST_BETWEEN: &str = "Sorry, something came up.";
pub const NEWEST_OVERALL: &str = "Can you help me with something outside, Tom?";

/// Four public messages between tom and jerry, one from spike_bulldog to
/// tom, and one private tom/jerry message that no read path may return.
pub fn seed_cartoon(db: &TempDb) {
    let now = Utc::now();
    let days = |d: i64| now - Duration::days(d);

    db.seed("tom", "jerry", "Hey Jerry, want some cheese?", true, days(10));
    db.seed("jerry", "tom", "Only if you promise not to chase me.", true, days(9));
    db.seed("tom", "jerry", "I promise. Meet me in the kitchen at noon.", true, days(6));
    db.seed("jerry", "tom", NEWEST_BETWEEN, true, days(2));
    db.seed("spike_bulldog", "tom", NEWEST_OVERALL, true, days(1));
    db.seed("tom", "jerry", "This one stays between us.", false, now - Duration::hours(1));
}
