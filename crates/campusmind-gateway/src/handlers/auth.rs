// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signup, login and logout form actions.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use campusmind_core::types::NewUser;
use campusmind_core::{CampusMindError, validation};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{ActionReply, failed, succeeded};
use crate::error::status_for;
use crate::server::AppState;
use crate::session;

const SIGNUP_OK: &str = "Signup successful! Please log in.";
const SIGNUP_DUPLICATE: &str = "An account with this email already exists.";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
const LOGIN_OK: &str = "Login successful! Redirecting...";
const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";
const LOGOUT_OK: &str = "Logged out successfully.";

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Either an ID token from client-side sign-in, or credentials to sign in
/// with server-side.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /auth/signup
pub async fn signup(State(state): State<AppState>, Json(form): Json<SignupForm>) -> ActionReply {
    if let Err(e) = validation::collect([
        validation::email("email", &form.email),
        validation::password("password", &form.password),
    ]) {
        return failed(StatusCode::BAD_REQUEST, e.user_message());
    }
    let identity = match state.identity() {
        Ok(identity) => identity,
        Err(e) => return failed(status_for(&e), e.to_string()),
    };

    let email = form.email.trim().to_string();
    let display_name = email.split('@').next().map(str::to_string);
    let request = NewUser {
        email,
        password: form.password,
        display_name,
    };
    match identity.create_user(request).await {
        Ok(user) => {
            info!(uid = %user.uid, "account created");
            succeeded(SIGNUP_OK)
        }
        Err(CampusMindError::EmailAlreadyExists) => failed(StatusCode::CONFLICT, SIGNUP_DUPLICATE),
        Err(e) => {
            error!(error = %e, "signup failed");
            failed(status_for(&e), SIGNUP_FAILED)
        }
    }
}

/// POST /auth/login
///
/// Exchanges the ID token for a session credential and installs it as the
/// session cookie.
pub async fn login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Response {
    match establish_session(&state, form).await {
        Ok(set_cookie) => {
            let (status, body) = succeeded(LOGIN_OK);
            (status, [(header::SET_COOKIE, set_cookie)], body).into_response()
        }
        Err(e) => {
            let message = match &e {
                CampusMindError::Validation { message, .. } => message.clone(),
                CampusMindError::NotConfigured(message) => message.clone(),
                _ => LOGIN_FAILED.to_string(),
            };
            warn!(error = %e, "login failed");
            failed(status_for(&e), message).into_response()
        }
    }
}

async fn establish_session(state: &AppState, form: LoginForm) -> Result<String, CampusMindError> {
    let id_token = match form.id_token.filter(|t| !t.trim().is_empty()) {
        Some(token) => {
            state.identity()?;
            token
        }
        None => {
            let email = form.email.unwrap_or_default();
            let password = form.password.unwrap_or_default();
            validation::collect([
                validation::email("email", &email),
                validation::non_blank("password", &password, "Password is required."),
            ])?;
            state
                .identity()?
                .sign_in_with_password(email.trim(), &password)
                .await?
        }
    };

    let max_age = Duration::from_secs(state.config.session.max_age_secs);
    let cookie = state
        .identity()?
        .create_session_cookie(&id_token, max_age)
        .await?;
    info!("session established");
    Ok(session::set_cookie(&state.config.session, &cookie))
}

/// POST /auth/logout
///
/// Always clears the cookie. When the cookie still verifies, the caller's
/// chat transcript is dropped as well.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(value) = session::cookie_value(&jar, &state.config.session)
        && let Some(identity) = &state.identity
        && let Ok(claims) = identity.verify_session_cookie(&value).await
    {
        state.chats.end(&claims.uid);
        info!(uid = %claims.uid, "signed out");
    }
    let (status, body) = succeeded(LOGOUT_OK);
    (
        status,
        [(header::SET_COOKIE, session::clear_cookie(&state.config.session))],
        body,
    )
        .into_response()
}
