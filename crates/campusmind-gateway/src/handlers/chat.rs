// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat API: submit a message, read the transcript.

use axum::Json;
use axum::extract::State;
use campusmind_core::types::ChatTurn;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

/// Body shared by the chat and triage endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInputBody {
    #[serde(default)]
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub turn: ChatTurn,
}

#[derive(Debug, Serialize)]
pub struct Transcript {
    pub turns: Vec<ChatTurn>,
}

/// POST /api/chat
///
/// Flow failures never reach the caller: the reply is then the fixed
/// apology. Blank input is 400, a second message while one is pending 409.
pub async fn post_chat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UserInputBody>,
) -> Result<Json<ChatReply>, ApiError> {
    let exchange = state
        .chats
        .submit(user.uid(), &body.user_input, &state.flows)
        .await?;
    Ok(Json(ChatReply {
        response: exchange.response,
        turn: exchange.turn,
    }))
}

/// GET /api/chat
pub async fn get_transcript(State(state): State<AppState>, user: CurrentUser) -> Json<Transcript> {
    Json(Transcript {
        turns: state.chats.transcript(user.uid()),
    })
}
