use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::FromSql;
use rusqlite::{Row, Statement};

use pigeon_types::Message;

use crate::error::StoreError;

/// Parse a stored timestamp.
///
/// Accepts the store's own format, SQLite's `datetime('now')` output (no
/// fraction) and RFC 3339. Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|ndt| ndt.and_utc()))
}

/// Column positions for one result set, resolved by name.
///
/// Names are matched case-insensitively so `createdAt`, `CREATEDAT` and
/// `createdat` all resolve, and column order in the query does not matter.
#[derive(Debug, Clone, Copy)]
pub struct RowMapper {
    id: usize,
    sender: usize,
    recipient: usize,
    body: usize,
    is_public: Option<usize>,
    created_at: usize,
    updated_at: usize,
}

impl RowMapper {
    pub fn for_statement(stmt: &Statement<'_>) -> Result<Self, StoreError> {
        Self::from_names(&stmt.column_names())
    }

    pub fn from_names(names: &[&str]) -> Result<Self, StoreError> {
        let find = |wanted: &str| names.iter().position(|n| n.eq_ignore_ascii_case(wanted));
        let require = |wanted: &'static str| {
            find(wanted).ok_or_else(|| StoreError::Mapping {
                column: wanted,
                reason: "not present in result set".into(),
            })
        };

        Ok(Self {
            id: require("ID")?,
            sender: require("SENDER")?,
            recipient: require("RECIPIENT")?,
            body: require("BODY")?,
            is_public: find("ISPUBLIC"),
            created_at: require("CREATEDAT")?,
            updated_at: require("UPDATEDAT")?,
        })
    }

    pub fn map(&self, row: &Row<'_>) -> Result<Message, StoreError> {
        let is_public = match self.is_public {
            Some(idx) => get(row, idx, "ISPUBLIC")?,
            // Every read path filters on isPublic, so a projection without it is public.
            None => true,
        };

        Ok(Message {
            id: get(row, self.id, "ID")?,
            sender: get(row, self.sender, "SENDER")?,
            recipient: get(row, self.recipient, "RECIPIENT")?,
            body: get(row, self.body, "BODY")?,
            is_public,
            created_at: timestamp(row, self.created_at, "CREATEDAT")?,
            updated_at: timestamp(row, self.updated_at, "UPDATEDAT")?,
        })
    }
}

fn get<T: FromSql>(row: &Row<'_>, idx: usize, column: &'static str) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::Mapping {
        column,
        reason: e.to_string(),
    })
}

fn timestamp(row: &Row<'_>, idx: usize, column: &'static str) -> Result<DateTime<Utc>, StoreError> {
    let raw: String = get(row, idx, column)?;
    parse_timestamp(&raw).map_err(|e| StoreError::Mapping {
        column,
        reason: format!("malformed timestamp {raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rusqlite::Connection;

    fn map_single(sql: &str) -> Result<Message, StoreError> {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let mapper = RowMapper::for_statement(&stmt)?;
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().expect("one row");
        mapper.map(row)
    }

    #[test]
    fn maps_columns_by_name_in_any_order_and_case() {
        let msg = map_single(
            "SELECT '2024-01-02 03:04:05.000006' AS UpdatedAt,
                    'hello' AS BODY,
                    'jerry' AS recipient,
                    0 AS isPublic,
                    'tom' AS Sender,
                    '2024-01-02 03:04:05.000006' AS createdat,
                    'abc123' AS id",
        )
        .unwrap();

        assert_eq!(msg.id, "abc123");
        assert_eq!(msg.sender, "tom");
        assert_eq!(msg.recipient, "jerry");
        assert_eq!(msg.body, "hello");
        assert!(!msg.is_public);
        assert_eq!(
            msg.created_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::microseconds(6)
        );
        assert_eq!(msg.created_at, msg.updated_at);
    }

    #[test]
    fn missing_visibility_column_means_public() {
        let msg = map_single(
            "SELECT 'a' AS id, 'tom' AS sender, 'jerry' AS recipient, 'hi' AS body,
                    '2024-01-02 03:04:05' AS createdAt, '2024-01-02 03:04:05' AS updatedAt",
        )
        .unwrap();
        assert!(msg.is_public);
    }

    #[test]
    fn malformed_timestamp_fails() {
        let err = map_single(
            "SELECT 'a' AS id, 'tom' AS sender, 'jerry' AS recipient, 'hi' AS body,
                    'yesterday-ish' AS createdAt, '2024-01-02 03:04:05' AS updatedAt",
        )
        .unwrap_err();

        match err {
            StoreError::Mapping { column, reason } => {
                assert_eq!(column, "CREATEDAT");
                assert!(reason.contains("yesterday-ish"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_fails() {
        let err = map_single("SELECT 'a' AS id, 'tom' AS sender").unwrap_err();
        assert!(matches!(err, StoreError::Mapping { column: "RECIPIENT", .. }));
    }

    #[test]
    fn null_body_fails() {
        let err = map_single(
            "SELECT 'a' AS id, 'tom' AS sender, 'jerry' AS recipient, NULL AS body,
                    '2024-01-02 03:04:05' AS createdAt, '2024-01-02 03:04:05' AS updatedAt",
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Mapping { column: "BODY", .. }));
    }

    #[test]
    fn parses_rfc3339_and_sqlite_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-01T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01T12:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01 10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01 10:00:00.000000").unwrap(), expected);
        assert!(parse_timestamp("06/01/2024").is_err());
    }
}
