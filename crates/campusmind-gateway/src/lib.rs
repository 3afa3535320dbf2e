// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for CampusMind.
//!
//! Serves the JSON views behind the session gate, the auth form actions and
//! the `/api` endpoints. Handlers that act on the caller's identity take a
//! [`CurrentUser`], which verifies the session cookie with the identity
//! provider on every request.

pub mod catalog;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod server;
pub mod session;

pub use error::ApiError;
pub use gate::{GateDecision, GateRules};
pub use server::{AppState, router, serve};
pub use session::CurrentUser;
