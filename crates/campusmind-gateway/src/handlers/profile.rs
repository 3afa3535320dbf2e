// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use campusmind_core::types::ProfileUpdate;
use campusmind_core::{CampusMindError, validation};

use super::{ActionReply, failed, succeeded};
use crate::error::status_for;
use crate::server::AppState;
use crate::session::CurrentUser;

const MIN_DISPLAY_NAME_LEN: usize = 2;

/// Trims fields and drops empty ones, then validates what is left.
pub fn normalize(update: ProfileUpdate) -> Result<ProfileUpdate, CampusMindError> {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let update = ProfileUpdate {
        display_name: clean(update.display_name),
        photo_url: clean(update.photo_url),
    };
    let name_check = match &update.display_name {
        Some(name) if name.chars().count() < MIN_DISPLAY_NAME_LEN => Err(
            CampusMindError::validation("displayName", "Display name must be at least 2 characters."),
        ),
        _ => Ok(()),
    };
    let photo_check = match &update.photo_url {
        Some(url) => validation::url("photoURL", url),
        None => Ok(()),
    };
    validation::collect([name_check, photo_check])?;
    Ok(update)
}

/// POST /api/profile -- updates the caller's own record.
pub async fn post_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> ActionReply {
    let update = match normalize(update) {
        Ok(update) => update,
        Err(e) => return failed(StatusCode::BAD_REQUEST, e.user_message()),
    };
    let identity = match state.identity() {
        Ok(identity) => identity,
        Err(e) => return failed(status_for(&e), e.to_string()),
    };
    match identity.update_profile(user.uid(), update).await {
        Ok(()) => {
            tracing::info!(uid = user.uid(), "profile updated");
            succeeded("Profile updated successfully.")
        }
        Err(e) => {
            tracing::error!(uid = user.uid(), error = %e, "profile update failed");
            failed(status_for(&e), "Failed to update profile.")
        }
    }
}
