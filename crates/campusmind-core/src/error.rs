// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for CampusMind.

use thiserror::Error;

/// The primary error type used across all CampusMind adapter traits and core operations.
#[derive(Debug, Error)]
pub enum CampusMindError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected before any external call was made.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Hosted model errors (transport failure, API error, malformed reply).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Identity provider errors (token exchange, account mutation, lookup).
    #[error("identity error: {message}")]
    Identity {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Signup attempted for an email that already has an account.
    #[error("an account with this email already exists")]
    EmailAlreadyExists,

    /// Missing, expired, or forged session credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but lacks the required capability.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Outbound mail transport errors.
    #[error("mail error: {message}")]
    Mail {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A collaborator required by the operation was never configured.
    #[error("{0}")]
    NotConfigured(String),

    /// A previous submission for the same session has not settled yet.
    #[error("a reply is still pending for this session")]
    Busy,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CampusMindError {
    /// Shorthand for a [`CampusMindError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the user-facing message for validation errors, or the display string otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
