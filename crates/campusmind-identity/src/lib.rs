// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity provider integration for CampusMind.
//!
//! [`FirebaseIdentity`] implements [`IdentityAdapter`](campusmind_core::IdentityAdapter)
//! over the Identity Toolkit REST API: account administration is authorized
//! with a service-account OAuth token, session cookies are verified locally
//! against the published signing keys. [`UserDirectory`] backs the
//! administrative view.

pub mod directory;
pub mod firebase;
mod jwt;
pub mod service_account;
pub mod verifier;

pub use directory::{Notification, NotificationVariant, ToggleOutcome, UserDirectory};
pub use firebase::FirebaseIdentity;
pub use service_account::ServiceAccount;

/// Message shown when identity operations are attempted without credentials.
pub const NOT_CONFIGURED_MESSAGE: &str = "Admin authentication is not configured. Please ensure the FIREBASE_SERVICE_ACCOUNT_KEY is set in your environment variables.";
