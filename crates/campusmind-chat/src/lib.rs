// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session surface: one append-only transcript per signed-in user.

pub mod registry;
pub mod session;

pub use registry::{ChatRegistry, Exchange};
pub use session::{ChatSession, SessionState};
