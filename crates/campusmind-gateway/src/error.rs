// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP mapping for [`CampusMindError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campusmind_core::CampusMindError;
use serde::Serialize;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Wrapper that lets handlers return `Result<_, ApiError>` and use `?`.
#[derive(Debug)]
pub struct ApiError(pub CampusMindError);

impl From<CampusMindError> for ApiError {
    fn from(e: CampusMindError) -> Self {
        Self(e)
    }
}

/// Status code for each error kind.
pub fn status_for(error: &CampusMindError) -> StatusCode {
    match error {
        CampusMindError::Validation { .. } => StatusCode::BAD_REQUEST,
        CampusMindError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        CampusMindError::Forbidden(_) => StatusCode::FORBIDDEN,
        CampusMindError::NotFound(_) => StatusCode::NOT_FOUND,
        CampusMindError::EmailAlreadyExists | CampusMindError::Busy => StatusCode::CONFLICT,
        CampusMindError::Provider { .. }
        | CampusMindError::Identity { .. }
        | CampusMindError::Mail { .. } => StatusCode::BAD_GATEWAY,
        CampusMindError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        CampusMindError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        CampusMindError::Config(_) | CampusMindError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        let field = match &self.0 {
            CampusMindError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.0.user_message(),
            field,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn busy_is_conflict() {
        assert_eq!(status_for(&CampusMindError::Busy), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let e = CampusMindError::Provider {
            message: "boom".into(),
            source: None,
        };
        assert_eq!(status_for(&e), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&CampusMindError::Timeout {
                duration: Duration::from_secs(30)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn unconfigured_collaborator_is_unavailable() {
        let e = CampusMindError::NotConfigured("no mail".into());
        assert_eq!(status_for(&e), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn validation_response_carries_field() {
        let resp = ApiError(CampusMindError::validation("userInput", "Please enter a message."))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
