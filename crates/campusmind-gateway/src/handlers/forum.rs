// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::catalog::forum::{ForumPost, NewPost, default_avatar};
use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

/// GET /api/forum
pub async fn list_posts(State(state): State<AppState>, _user: CurrentUser) -> Json<Vec<ForumPost>> {
    Json(state.forum.list())
}

/// POST /api/forum
///
/// The author is the caller's display name, falling back to the local part
/// of their email.
pub async fn post_forum(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(post): Json<NewPost>,
) -> Result<(StatusCode, Json<ForumPost>), ApiError> {
    post.validate()?;

    let record = match state.identity()?.get_user(user.uid()).await {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(uid = user.uid(), error = %e, "profile lookup failed, posting without it");
            None
        }
    };
    let author = record
        .as_ref()
        .and_then(|r| r.display_name.clone())
        .filter(|n| !n.trim().is_empty())
        .or_else(|| {
            user.0
                .email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Anonymous".to_string());
    let avatar = record
        .and_then(|r| r.photo_url)
        .unwrap_or_else(|| default_avatar(user.uid()));

    let created = state.forum.publish(&author, avatar, &post)?;
    Ok((StatusCode::CREATED, Json(created)))
}
