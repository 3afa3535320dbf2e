// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative user management.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use campusmind_core::CampusMindError;
use campusmind_core::types::{Capabilities, UserRecord};
use campusmind_identity::ToggleOutcome;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::AppState;
use crate::session::CurrentUser;

pub const ACCESS_DENIED: &str = "You do not have permission to view this page.";

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DisabledBody {
    pub disabled: bool,
}

pub(crate) fn require_admin(user: &CurrentUser) -> Result<(), CampusMindError> {
    if user.can_administer() {
        Ok(())
    } else {
        tracing::warn!(uid = user.uid(), "non-admin attempted admin access");
        Err(CampusMindError::Forbidden(ACCESS_DENIED.into()))
    }
}

/// Loads the directory snapshot. A provider failure is reported in the
/// body rather than as an error status.
pub(crate) async fn load_users(state: &AppState) -> Result<UserList, CampusMindError> {
    let directory = state.directory()?;
    Ok(match directory.refresh().await {
        Ok(users) => UserList { users, error: None },
        Err(e) => {
            tracing::error!(error = %e, "failed to list users");
            UserList {
                users: Vec::new(),
                error: Some("Failed to fetch users.".into()),
            }
        }
    })
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserList>, ApiError> {
    require_admin(&user)?;
    Ok(Json(load_users(&state).await?))
}

/// POST /api/admin/users/{uid}/disabled
///
/// Responds 200 when the change stuck, 502 with the reverted record and an
/// error notification when the provider refused it.
pub async fn set_disabled(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(uid): Path<String>,
    Json(body): Json<DisabledBody>,
) -> Result<(StatusCode, Json<ToggleOutcome>), ApiError> {
    require_admin(&user)?;
    let directory = state.directory()?;
    if !directory.users().iter().any(|u| u.uid == uid) {
        directory.refresh().await?;
    }
    let outcome = directory.toggle_disabled(&uid, body.disabled).await?;
    let status = if outcome.applied {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((status, Json(outcome)))
}
