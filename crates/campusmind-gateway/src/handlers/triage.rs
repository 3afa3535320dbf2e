// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use campusmind_core::types::{TriageCategory, TriageInput, TriageOutput};
use serde::Serialize;

use super::chat::UserInputBody;
use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

#[derive(Debug, Serialize)]
pub struct TriageReply {
    #[serde(flatten)]
    pub output: TriageOutput,
    pub category: TriageCategory,
}

/// POST /api/triage
pub async fn post_triage(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UserInputBody>,
) -> Result<Json<TriageReply>, ApiError> {
    let input = TriageInput::new(body.user_input)?;
    let output = state.flows.triage(&input).await?;
    let category = output.category();
    tracing::info!(uid = user.uid(), category = %category, "triage classified");
    Ok(Json(TriageReply { output, category }))
}
