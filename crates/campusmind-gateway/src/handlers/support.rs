// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use campusmind_core::types::SupportEmail;

use super::{ActionReply, failed};
use crate::server::AppState;
use crate::session::CurrentUser;

/// POST /api/support
pub async fn post_support(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(email): Json<SupportEmail>,
) -> ActionReply {
    let default_from = &state.config.mail.default_from;
    if let Err(e) = campusmind_mail::prepare(&email, default_from) {
        return failed(StatusCode::BAD_REQUEST, e.user_message());
    }
    let outcome = campusmind_mail::dispatch(state.mail.as_ref(), &email, default_from).await;
    tracing::info!(uid = user.uid(), success = outcome.success, "support email dispatched");
    let status = match (outcome.success, state.mail.is_some()) {
        (true, _) => StatusCode::OK,
        (false, false) => StatusCode::SERVICE_UNAVAILABLE,
        (false, true) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(outcome))
}
