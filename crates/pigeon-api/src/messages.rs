use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use pigeon_db::{Database, SinceDays, ValidationError};
use pigeon_types::api::{CreateMessageRequest, CreateMessageResponse};
use pigeon_types::{Message, NewMessage};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Kept as text so a malformed value gets our own error message.
    pub since_days_ago: Option<String>,
}

impl HistoryQuery {
    /// `None` when absent. Values above 30 are clamped to 30.
    fn since(&self) -> Result<Option<SinceDays>, ApiError> {
        let Some(raw) = self.since_days_ago.as_deref() else {
            return Ok(None);
        };
        let days: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidSinceDaysAgo)?;
        SinceDays::clamped(days)
            .map(Some)
            .map_err(|_| ApiError::InvalidSinceDaysAgo)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::EmptyField(field)),
    }
}

/// Run a store call off the async runtime.
async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> pigeon_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db)).await?;
    Ok(result?)
}

pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let sender = required(req.sender, "sender")?;
    let recipient = required(req.recipient, "recipient")?;
    let body = required(req.body, "body")?;
    let message = NewMessage::new(sender, recipient, body).with_visibility(req.is_public);

    let id = blocking(&state, move |db| db.create_message(&message)).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/v1/messages/{id}"))],
        Json(CreateMessageResponse { id }),
    ))
}

/// History between two parties. Either party may be the sender of any given message.
pub async fn list_between(
    State(state): State<AppState>,
    Path((recipient, sender)): Path<(String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = match query.since()? {
        Some(since) => {
            blocking(&state, move |db| db.messages_between_since(&recipient, &sender, since)).await?
        }
        None => {
            let limit = state.default_results_limit;
            blocking(&state, move |db| db.messages_between_limit(&recipient, &sender, limit)).await?
        }
    };

    Ok(Json(messages))
}

/// History across all senders.
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = match query.since()? {
        Some(since) => blocking(&state, move |db| db.messages_since(since)).await?,
        None => {
            let limit = state.default_results_limit;
            blocking(&state, move |db| db.messages_limit(limit)).await?
        }
    };

    Ok(Json(messages))
}
