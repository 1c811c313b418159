use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored message.
///
/// `sender` and `recipient` are always in normalized form (trimmed,
/// lower-cased). Display casing is left to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 32 lowercase hex characters, assigned by the store.
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub body: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at`; messages are never edited.
    pub updated_at: DateTime<Utc>,
}

/// A message submitted for creation. The store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: String,
    pub recipient: String,
    pub body: String,
    pub is_public: bool,
}

impl NewMessage {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            body: body.into(),
            is_public: true,
        }
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }
}
