// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie handling and the `CurrentUser` extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use campusmind_config::model::SessionConfig;
use campusmind_core::CampusMindError;
use campusmind_core::types::{Capabilities, Role, SessionClaims, SessionCookie};
use campusmind_identity::NOT_CONFIGURED_MESSAGE;

use crate::error::ApiError;
use crate::server::AppState;

/// `Set-Cookie` value installing a session.
pub fn set_cookie(config: &SessionConfig, cookie: &SessionCookie) -> String {
    render(config, &cookie.value, cookie.max_age.as_secs())
}

/// `Set-Cookie` value deleting the session.
pub fn clear_cookie(config: &SessionConfig) -> String {
    render(config, "", 0)
}

fn render(config: &SessionConfig, value: &str, max_age: u64) -> String {
    let secure = if config.secure { "; Secure" } else { "" };
    format!(
        "{}={value}; HttpOnly{secure}; Path=/; Max-Age={max_age}; SameSite=Lax",
        config.cookie_name
    )
}

/// The session cookie's value, if present and non-empty.
pub fn cookie_value(jar: &CookieJar, config: &SessionConfig) -> Option<String> {
    jar.get(&config.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// The caller's verified session.
///
/// Every handler that acts on the caller's identity takes this extractor,
/// so the credential is verified with the identity provider regardless of
/// the gate mode.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

impl CurrentUser {
    pub fn uid(&self) -> &str {
        &self.0.uid
    }
}

impl Capabilities for CurrentUser {
    fn role(&self) -> Role {
        self.0.role
    }
}

/// Why `CurrentUser` could not be extracted.
///
/// API paths answer with JSON; views are sent back to the login page with
/// the stale cookie removed.
#[derive(Debug)]
pub struct AuthRejection {
    error: CampusMindError,
    api: bool,
    login_path: String,
    clear: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        if self.api || matches!(self.error, CampusMindError::NotConfigured(_)) {
            let mut response = ApiError(self.error).into_response();
            if let Ok(value) = HeaderValue::from_str(&self.clear) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            return response;
        }
        (
            StatusCode::SEE_OTHER,
            [
                (header::LOCATION, self.login_path),
                (header::SET_COOKIE, self.clear),
            ],
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = &state.config.session;
        let reject = |error| AuthRejection {
            error,
            api: parts.uri.path().starts_with("/api/"),
            login_path: session.login_path.clone(),
            clear: clear_cookie(session),
        };

        let Some(identity) = state.identity.as_ref() else {
            return Err(reject(CampusMindError::NotConfigured(
                NOT_CONFIGURED_MESSAGE.to_string(),
            )));
        };
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(value) = cookie_value(&jar, session) else {
            return Err(reject(CampusMindError::Unauthenticated(
                "User not authenticated.".into(),
            )));
        };

        match identity.verify_session_cookie(&value).await {
            Ok(claims) => Ok(CurrentUser(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "session cookie rejected");
                Err(reject(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn set_cookie_has_all_attributes() {
        let cookie = SessionCookie {
            value: "abc".into(),
            max_age: Duration::from_secs(432_000),
        };
        assert_eq!(
            set_cookie(&SessionConfig::default(), &cookie),
            "firebase-session=abc; HttpOnly; Secure; Path=/; Max-Age=432000; SameSite=Lax"
        );
    }

    #[test]
    fn insecure_cookie_omits_secure() {
        let config = SessionConfig {
            secure: false,
            ..SessionConfig::default()
        };
        assert!(!clear_cookie(&config).contains("Secure"));
        assert!(clear_cookie(&config).starts_with("firebase-session=;"));
        assert!(clear_cookie(&config).contains("Max-Age=0"));
    }

    #[test]
    fn empty_cookie_is_absent() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::COOKIE, "firebase-session=; other=1".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(cookie_value(&jar, &SessionConfig::default()), None);
    }
}
