//! Statement construction for the `messages` table.
//!
//! Every statement text is a `'static` literal. Caller-supplied values, the
//! time-window cutoff and row limits included, travel only through
//! positional parameters.

use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use rusqlite::types::Value;

use pigeon_types::NewMessage;

use crate::error::ValidationError;
use crate::normalize::normalize;

/// Widest time window any retrieval may cover.
pub const MAX_SINCE_DAYS: u32 = 30;

/// Fixed-width textual form of stored timestamps. Text comparison on this
/// format matches chronological order, which the window filters rely on.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A look-back window in whole days, always within `0..=MAX_SINCE_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinceDays(u32);

impl SinceDays {
    pub fn new(days: i64) -> Result<Self, ValidationError> {
        if (0..=MAX_SINCE_DAYS as i64).contains(&days) {
            Ok(Self(days as u32))
        } else {
            Err(ValidationError::SinceDaysOutOfRange(days))
        }
    }

    /// Caps oversized windows at `MAX_SINCE_DAYS`. Negative windows are still rejected.
    pub fn clamped(days: i64) -> Result<Self, ValidationError> {
        Self::new(days.min(MAX_SINCE_DAYS as i64))
    }

    pub fn days(self) -> u32 {
        self.0
    }

    /// Oldest instant (exclusive) a message may carry to fall inside the window.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.0))
    }
}

/// A statement ready to execute: SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: &'static str,
    pub params: Vec<Value>,
}

const INSERT_SQL: &str = "INSERT INTO messages (id, sender, recipient, body, isPublic, createdAt, updatedAt)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)";

const BETWEEN_SINCE_SQL: &str = "SELECT id, sender, recipient, body, isPublic, createdAt, updatedAt
     FROM messages
     WHERE createdAt > ?1
       AND isPublic = 1
       AND ((recipient = ?2 AND sender = ?3) OR (recipient = ?3 AND sender = ?2))
     ORDER BY createdAt DESC, id DESC";

const BETWEEN_LIMIT_SQL: &str = "SELECT id, sender, recipient, body, isPublic, createdAt, updatedAt
     FROM messages
     WHERE isPublic = 1
       AND ((recipient = ?1 AND sender = ?2) OR (recipient = ?2 AND sender = ?1))
     ORDER BY createdAt DESC, id DESC
     LIMIT ?3";

const ALL_SINCE_SQL: &str = "SELECT id, sender, recipient, body, isPublic, createdAt, updatedAt
     FROM messages
     WHERE createdAt > ?1
       AND isPublic = 1
     ORDER BY createdAt DESC, id DESC";

const ALL_LIMIT_SQL: &str = "SELECT id, sender, recipient, body, isPublic, createdAt, updatedAt
     FROM messages
     WHERE isPublic = 1
     ORDER BY createdAt DESC, id DESC
     LIMIT ?1";

const DELETE_SQL: &str = "DELETE FROM messages WHERE id = ?1";

fn text(s: impl Into<String>) -> Value {
    Value::Text(s.into())
}

/// Insert one message. `createdAt` and `updatedAt` both receive `now`.
pub fn insert(id: &str, message: &NewMessage, now: DateTime<Utc>) -> Statement {
    Statement {
        sql: INSERT_SQL,
        params: vec![
            text(id),
            text(normalize(&message.sender)),
            text(normalize(&message.recipient)),
            text(message.body.as_str()),
            Value::Integer(i64::from(message.is_public)),
            text(format_timestamp(now)),
        ],
    }
}

/// Public messages exchanged between two parties, in either direction, inside the window.
///
/// There is no row cap here; the window bounds the result.
pub fn between_parties_since(
    recipient: &str,
    sender: &str,
    since: SinceDays,
    now: DateTime<Utc>,
) -> Statement {
    Statement {
        sql: BETWEEN_SINCE_SQL,
        params: vec![
            text(format_timestamp(since.cutoff(now))),
            text(normalize(recipient)),
            text(normalize(sender)),
        ],
    }
}

/// The newest `limit` public messages exchanged between two parties, in either direction.
pub fn between_parties_limit(recipient: &str, sender: &str, limit: NonZeroU32) -> Statement {
    Statement {
        sql: BETWEEN_LIMIT_SQL,
        params: vec![
            text(normalize(recipient)),
            text(normalize(sender)),
            Value::Integer(i64::from(limit.get())),
        ],
    }
}

/// Every public message inside the window.
pub fn all_since(since: SinceDays, now: DateTime<Utc>) -> Statement {
    Statement {
        sql: ALL_SINCE_SQL,
        params: vec![text(format_timestamp(since.cutoff(now)))],
    }
}

/// The newest `limit` public messages from anyone.
pub fn all_limit(limit: NonZeroU32) -> Statement {
    Statement {
        sql: ALL_LIMIT_SQL,
        params: vec![Value::Integer(i64::from(limit.get()))],
    }
}

pub fn delete(id: &str) -> Statement {
    Statement {
        sql: DELETE_SQL,
        params: vec![text(id)],
    }
}
