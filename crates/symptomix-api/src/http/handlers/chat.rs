//! Turn and reset endpoints.
//!
//! POST /get   -- one conversational turn: `{chat_id, msg}` in,
//!               `{"response": answer}` out. Missing body or empty field
//!               is a 400 with `{"error": message}`; generation failures
//!               come back as the fallback reply inside a normal 200.
//! POST /reset -- destroy a session: `{chat_id}` in, always succeeds with
//!               `{"message": "Chat reset."}`, idempotent.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// Fixed confirmation returned by every reset.
pub const RESET_CONFIRMATION: &str = "Chat reset.";

/// Request body for the turn endpoint.
///
/// Both fields are optional at the wire level so that absence is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Request body for the reset endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// POST /get -- handle one conversational turn.
pub async fn turn(
    State(state): State<AppState>,
    body: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|_| AppError::MissingBody)?;

    let chat_id = body.chat_id.unwrap_or_default();
    let msg = body.msg.unwrap_or_default();

    let response = state.chat_service.turn(&chat_id, &msg).await?;
    Ok(Json(json!({ "response": response })))
}

/// POST /reset -- destroy the named session.
pub async fn reset(
    State(state): State<AppState>,
    body: Result<Json<ResetRequest>, JsonRejection>,
) -> Json<Value> {
    if let Ok(Json(ResetRequest { chat_id: Some(chat_id) })) = body {
        state.chat_service.reset(&chat_id);
    }
    Json(json!({ "message": RESET_CONFIRMATION }))
}
