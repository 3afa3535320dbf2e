// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field validators shared by the form-style actions.
//!
//! Each validator returns a [`CampusMindError::Validation`] carrying the
//! message shown next to the offending field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CampusMindError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern is valid")
});

/// Validates an email address.
pub fn email(field: &str, value: &str) -> Result<(), CampusMindError> {
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(CampusMindError::validation(
            field,
            "Please enter a valid email address.",
        ))
    }
}

/// Validates a signup/login password.
pub fn password(field: &str, value: &str) -> Result<(), CampusMindError> {
    if value.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(CampusMindError::validation(
            field,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long."),
        ))
    }
}

/// Validates an absolute http(s) URL.
pub fn url(field: &str, value: &str) -> Result<(), CampusMindError> {
    if URL_RE.is_match(value) {
        Ok(())
    } else {
        Err(CampusMindError::validation(field, "Invalid url"))
    }
}

/// Rejects empty or whitespace-only text.
pub fn non_blank(field: &str, value: &str, message: &str) -> Result<(), CampusMindError> {
    if value.trim().is_empty() {
        Err(CampusMindError::validation(field, message))
    } else {
        Ok(())
    }
}

/// Runs every check and joins the failures into one validation error.
///
/// Form actions report all problems at once rather than the first.
pub fn collect(
    checks: impl IntoIterator<Item = Result<(), CampusMindError>>,
) -> Result<(), CampusMindError> {
    let mut fields = Vec::new();
    let mut messages = Vec::new();
    for check in checks {
        if let Err(CampusMindError::Validation { field, message }) = check {
            fields.push(field);
            messages.push(message);
        }
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(CampusMindError::Validation {
            field: fields.join(","),
            message: messages.join(" "),
        })
    }
}
