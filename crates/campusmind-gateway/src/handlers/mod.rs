// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Axum request handlers.

pub mod admin;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod forum;
pub mod health;
pub mod profile;
pub mod support;
pub mod triage;
pub mod views;

use axum::Json;
use axum::http::StatusCode;
use campusmind_core::types::ActionOutcome;

/// Response shape shared by the form-style actions.
pub type ActionReply = (StatusCode, Json<ActionOutcome>);

pub(crate) fn succeeded(message: &str) -> ActionReply {
    (StatusCode::OK, Json(ActionOutcome::ok(message)))
}

pub(crate) fn failed(status: StatusCode, message: impl Into<String>) -> ActionReply {
    (status, Json(ActionOutcome::failed(message)))
}
