// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: cookie name syntax, session
//! lifetime bounds, path list shape, and mail sender syntax.

use campusmind_core::validation;

use crate::diagnostic::ConfigError;
use crate::model::CampusMindConfig;

/// Shortest session lifetime the identity provider accepts (5 minutes).
pub const MIN_SESSION_SECS: u64 = 5 * 60;
/// Longest session lifetime the identity provider accepts (14 days).
pub const MAX_SESSION_SECS: u64 = 14 * 24 * 60 * 60;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &CampusMindConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    let session = &config.session;
    if session.cookie_name.is_empty()
        || !session
            .cookie_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push(ConfigError::validation(format!(
            "session.cookie_name `{}` must be non-empty and use only letters, digits, `-` or `_`",
            session.cookie_name
        )));
    }

    if !(MIN_SESSION_SECS..=MAX_SESSION_SECS).contains(&session.max_age_secs) {
        errors.push(ConfigError::validation(format!(
            "session.max_age_secs must be between {MIN_SESSION_SECS} and {MAX_SESSION_SECS}, got {}",
            session.max_age_secs
        )));
    }

    for (name, paths) in [
        ("protected_paths", &session.protected_paths),
        ("auth_paths", &session.auth_paths),
    ] {
        for path in paths.iter().filter(|p| !p.starts_with('/')) {
            errors.push(ConfigError::validation(format!(
                "session.{name} entry `{path}` must start with `/`"
            )));
        }
    }

    for path in session
        .auth_paths
        .iter()
        .filter(|p| session.protected_paths.contains(p))
    {
        errors.push(ConfigError::validation(format!(
            "`{path}` cannot be both a protected path and an auth path"
        )));
    }

    if session.protected_paths.contains(&session.login_path) {
        errors.push(ConfigError::validation(format!(
            "session.login_path `{}` must not be protected, it would redirect to itself",
            session.login_path
        )));
    }

    if config.flows.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "flows.timeout_secs must be greater than 0",
        ));
    }

    if config.flows.fallback_response.trim().is_empty() {
        errors.push(ConfigError::validation(
            "flows.fallback_response must not be empty",
        ));
    }

    if config.mail.smtp_host.is_some()
        && validation::email("mail.default_from", &config.mail.default_from).is_err()
    {
        errors.push(ConfigError::validation(format!(
            "mail.default_from `{}` is not a valid email address",
            config.mail.default_from
        )));
    }

    if config.booking.horizon_days == 0 {
        errors.push(ConfigError::validation(
            "booking.horizon_days must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&CampusMindConfig::default()).is_ok());
    }

    #[test]
    fn bad_cookie_name_fails() {
        let mut config = CampusMindConfig::default();
        config.session.cookie_name = "my session".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "cookie_name"));
    }

    #[test]
    fn session_lifetime_is_bounded() {
        let mut config = CampusMindConfig::default();
        config.session.max_age_secs = 60;
        assert!(has_error(&validate_config(&config).unwrap_err(), "max_age_secs"));

        config.session.max_age_secs = MAX_SESSION_SECS + 1;
        assert!(has_error(&validate_config(&config).unwrap_err(), "max_age_secs"));
    }

    #[test]
    fn overlapping_path_lists_fail() {
        let mut config = CampusMindConfig::default();
        config.session.auth_paths.push("/forum".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "both a protected path and an auth path"));
    }

    #[test]
    fn relative_paths_fail() {
        let mut config = CampusMindConfig::default();
        config.session.protected_paths.push("chat".into());
        assert!(has_error(&validate_config(&config).unwrap_err(), "must start with"));
    }

    #[test]
    fn protected_login_path_fails() {
        let mut config = CampusMindConfig::default();
        config.session.login_path = "/forum".into();
        assert!(has_error(&validate_config(&config).unwrap_err(), "login_path"));
    }

    #[test]
    fn mail_sender_checked_only_when_enabled() {
        let mut config = CampusMindConfig::default();
        config.mail.default_from = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.mail.smtp_host = Some("smtp.campus.edu".into());
        assert!(has_error(&validate_config(&config).unwrap_err(), "default_from"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = CampusMindConfig::default();
        config.server.host = "".into();
        config.flows.timeout_secs = 0;
        config.booking.horizon_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
