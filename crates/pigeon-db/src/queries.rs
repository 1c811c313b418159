use std::num::NonZeroU32;

use chrono::Utc;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info};
use uuid::Uuid;

use pigeon_types::{Message, NewMessage};

use crate::error::{Result, StoreError, ValidationError};
use crate::mapper::RowMapper;
use crate::normalize::normalize;
use crate::query::{self, SinceDays, Statement};
use crate::Database;

impl Database {
    // -- Writes --

    /// Store a new message and return its id (32 lowercase hex characters).
    ///
    /// Participants are normalized before storage. Empty fields are rejected
    /// before a connection is opened.
    pub fn create_message(&self, message: &NewMessage) -> Result<String> {
        validate(message)?;

        let id = Uuid::new_v4().simple().to_string();
        let stmt = query::insert(&id, message, Utc::now());

        self.with_conn("create_message", |conn| execute(conn, &stmt))?;

        info!(
            "Message {} created ({} -> {})",
            id,
            normalize(&message.sender),
            normalize(&message.recipient)
        );
        Ok(id)
    }

    /// Remove a message by id. Only used to tear down test data.
    pub fn delete_message(&self, id: &str) -> Result<()> {
        let stmt = query::delete(id);
        self.with_conn("delete_message", |conn| {
            match execute(conn, &stmt)? {
                0 => Err(StoreError::NotFound(id.to_string()).into()),
                _ => Ok(()),
            }
        })
    }

    // -- Reads --

    /// Public messages between two parties, either direction, from the last `since` days.
    pub fn messages_between_since(
        &self,
        recipient: &str,
        sender: &str,
        since: SinceDays,
    ) -> Result<Vec<Message>> {
        let stmt = query::between_parties_since(recipient, sender, since, Utc::now());
        self.with_conn("messages_between_since", |conn| fetch(conn, &stmt))
    }

    /// The newest `limit` public messages between two parties, either direction.
    pub fn messages_between_limit(
        &self,
        recipient: &str,
        sender: &str,
        limit: u32,
    ) -> Result<Vec<Message>> {
        let stmt = query::between_parties_limit(recipient, sender, non_zero(limit)?);
        self.with_conn("messages_between_limit", |conn| fetch(conn, &stmt))
    }

    /// Every public message from the last `since` days.
    pub fn messages_since(&self, since: SinceDays) -> Result<Vec<Message>> {
        let stmt = query::all_since(since, Utc::now());
        self.with_conn("messages_since", |conn| fetch(conn, &stmt))
    }

    /// The newest `limit` public messages from anyone.
    pub fn messages_limit(&self, limit: u32) -> Result<Vec<Message>> {
        let stmt = query::all_limit(non_zero(limit)?);
        self.with_conn("messages_limit", |conn| fetch(conn, &stmt))
    }
}

fn validate(message: &NewMessage) -> Result<(), ValidationError> {
    if normalize(&message.sender).is_empty() {
        return Err(ValidationError::EmptyField("sender"));
    }
    if normalize(&message.recipient).is_empty() {
        return Err(ValidationError::EmptyField("recipient"));
    }
    if message.body.trim().is_empty() {
        return Err(ValidationError::EmptyField("body"));
    }
    Ok(())
}

fn non_zero(limit: u32) -> Result<NonZeroU32, ValidationError> {
    NonZeroU32::new(limit).ok_or(ValidationError::ZeroLimit)
}

fn execute(conn: &Connection, stmt: &Statement) -> Result<usize> {
    let changed = conn.execute(stmt.sql, params_from_iter(stmt.params.iter()))?;
    Ok(changed)
}

/// Run a query and map every row. A single bad row fails the whole call.
fn fetch(conn: &Connection, stmt: &Statement) -> Result<Vec<Message>> {
    let mut prepared = conn.prepare(stmt.sql)?;
    let mapper = RowMapper::for_statement(&prepared)?;

    let mut rows = prepared.query(params_from_iter(stmt.params.iter()))?;
    let mut messages = Vec::new();
    while let Some(row) = rows.next()? {
        messages.push(mapper.map(row)?);
    }

    debug!("Fetched {} messages", messages.len());
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_first_empty_field() {
        let err = validate(&NewMessage::new("  ", "jerry", "hi")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("sender"));

        let err = validate(&NewMessage::new("tom", "", "hi")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("recipient"));

        let err = validate(&NewMessage::new("tom", "jerry", " \n")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("body"));

        assert!(validate(&NewMessage::new(" Tom", "Jerry ", "hi")).is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(non_zero(0), Err(ValidationError::ZeroLimit));
        assert_eq!(non_zero(5).unwrap().get(), 5);
    }
}
