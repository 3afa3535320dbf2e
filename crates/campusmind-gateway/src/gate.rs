// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session gate for view paths.
//!
//! The decision itself is a pure function of the path and whether the
//! request carries a session. The middleware only works out that boolean
//! (cookie presence, or a verified cookie in `verify` mode) and turns a
//! redirect decision into a `303 See Other`.

use std::collections::HashSet;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use campusmind_config::model::{GateMode, SessionConfig};

use crate::server::AppState;
use crate::session;

/// Path lists the gate matches against.
#[derive(Debug, Clone)]
pub struct GateRules {
    protected: HashSet<String>,
    auth: HashSet<String>,
    login_path: String,
    home_path: String,
}

impl GateRules {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            protected: config.protected_paths.iter().cloned().collect(),
            auth: config.auth_paths.iter().cloned().collect(),
            login_path: config.login_path.clone(),
            home_path: config.home_path.clone(),
        }
    }

    /// Decides what to do with a request for `path`.
    ///
    /// Rules, in order: a session on an auth path goes home; no session on a
    /// protected path goes to login; everything else passes.
    pub fn decide(&self, path: &str, has_session: bool) -> GateDecision {
        let path = normalize(path);
        if has_session && self.auth.contains(path) {
            GateDecision::Redirect(self.home_path.clone())
        } else if !has_session && self.protected.contains(path) {
            GateDecision::Redirect(self.login_path.clone())
        } else {
            GateDecision::Pass
        }
    }
}

/// `/chat/` matches `/chat`; the root stays `/`.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(String),
}

/// Middleware applied to the whole router.
///
/// Only `GET`/`HEAD` navigations are gated; form actions posted to an auth
/// path must still reach their handler.
pub async fn session_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    let cookie = jar
        .get(&state.config.session.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    let (has_session, stale) = match (cookie, state.config.session.gate_mode) {
        (None, _) => (false, false),
        (Some(_), GateMode::Presence) => (true, false),
        (Some(value), GateMode::Verify) => {
            let valid = match &state.identity {
                Some(identity) => identity.verify_session_cookie(&value).await.is_ok(),
                None => false,
            };
            (valid, !valid)
        }
    };

    let path = request.uri().path().to_string();
    match state.gate.decide(&path, has_session) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(location) => {
            tracing::debug!(path = %path, location = %location, has_session, "gate redirect");
            let mut response =
                (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
            if stale {
                let cleared = session::clear_cookie(&state.config.session);
                if let Ok(value) = HeaderValue::from_str(&cleared) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rules() -> GateRules {
        GateRules::from_config(&SessionConfig::default())
    }

    #[test]
    fn anonymous_admin_goes_to_login() {
        assert_eq!(
            rules().decide("/admin", false),
            GateDecision::Redirect("/auth/login".into())
        );
    }

    #[test]
    fn signed_in_login_goes_home() {
        assert_eq!(
            rules().decide("/auth/login", true),
            GateDecision::Redirect("/".into())
        );
    }

    #[test]
    fn unlisted_paths_pass() {
        assert_eq!(rules().decide("/health", false), GateDecision::Pass);
        assert_eq!(rules().decide("/api/chat", false), GateDecision::Pass);
        assert_eq!(rules().decide("/auth/signup", false), GateDecision::Pass);
        assert_eq!(rules().decide("/chat", true), GateDecision::Pass);
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            rules().decide("/chat/", false),
            GateDecision::Redirect("/auth/login".into())
        );
        assert_eq!(
            rules().decide("/", false),
            GateDecision::Redirect("/auth/login".into())
        );
    }

    proptest! {
        #[test]
        fn protected_paths_never_pass_anonymously(idx in 0usize..9) {
            let config = SessionConfig::default();
            let path = &config.protected_paths[idx];
            let decision = GateRules::from_config(&config).decide(path, false);
            prop_assert_eq!(decision, GateDecision::Redirect(config.login_path.clone()));
        }

        #[test]
        fn sessions_never_see_auth_views(idx in 0usize..2) {
            let config = SessionConfig::default();
            let path = &config.auth_paths[idx];
            let decision = GateRules::from_config(&config).decide(path, true);
            prop_assert_eq!(decision, GateDecision::Redirect(config.home_path.clone()));
        }

        #[test]
        fn unknown_paths_always_pass(path in "/x[a-z]{0,12}", has_session: bool) {
            prop_assert_eq!(rules().decide(&path, has_session), GateDecision::Pass);
        }
    }
}
