// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service-account credentials and the OAuth access tokens minted from them.

use std::time::Duration;

use campusmind_config::model::FirebaseConfig;
use campusmind_core::CampusMindError;
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::jwt;

/// Env var holding the inline service-account JSON.
pub const SERVICE_ACCOUNT_ENV: &str = "FIREBASE_SERVICE_ACCOUNT_KEY";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth scopes needed for account administration.
const SCOPES: &str = "https://www.googleapis.com/auth/identitytoolkit \
                      https://www.googleapis.com/auth/firebase \
                      https://www.googleapis.com/auth/cloud-platform";

/// Lifetime requested for each signed assertion.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Refresh this long before the access token actually expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account key file that are used here.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    /// Parses a key file's JSON.
    pub fn from_json(json: &str) -> Result<Self, CampusMindError> {
        serde_json::from_str(json).map_err(|e| {
            CampusMindError::Config(format!("service account key is not valid JSON: {e}"))
        })
    }

    /// Locates the credentials: `firebase.service_account_key`, then
    /// `firebase.service_account_path`, then `FIREBASE_SERVICE_ACCOUNT_KEY`.
    ///
    /// `Ok(None)` means identity is simply not configured.
    pub fn discover(
        config: &FirebaseConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, CampusMindError> {
        if let Some(inline) = config.service_account_key.as_deref().filter(|s| !s.is_empty()) {
            return Self::from_json(inline).map(Some);
        }
        if let Some(path) = config.service_account_path.as_deref() {
            let json = std::fs::read_to_string(path).map_err(|e| {
                CampusMindError::Config(format!("cannot read service account file {path}: {e}"))
            })?;
            return Self::from_json(&json).map(Some);
        }
        match env(SERVICE_ACCOUNT_ENV).filter(|s| !s.is_empty()) {
            Some(json) => Self::from_json(&json).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_TTL_SECS
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Mints and caches OAuth access tokens via the JWT-bearer grant.
pub struct TokenSource {
    http: reqwest::Client,
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    key: RsaKeyPair,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(account: &ServiceAccount, http: reqwest::Client) -> Result<Self, CampusMindError> {
        let key = jwt::key_pair_from_pem(&account.private_key)?;
        info!(client_email = %account.client_email, "service account loaded");
        Ok(Self {
            http,
            client_email: account.client_email.clone(),
            key_id: account.private_key_id.clone(),
            token_uri: account.token_uri.clone(),
            key,
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid access token, refreshing it when close to expiry.
    pub async fn access_token(&self) -> Result<String, CampusMindError> {
        let mut cached = self.cached.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = cached.as_ref()
            && token.expires_at - REFRESH_MARGIN_SECS > now
        {
            return Ok(token.value.clone());
        }

        let fresh = self.exchange(now).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn exchange(&self, now: i64) -> Result<CachedToken, CampusMindError> {
        let assertion = jwt::sign_rs256(
            &self.key,
            self.key_id.as_deref(),
            &AssertionClaims {
                iss: &self.client_email,
                scope: SCOPES,
                aud: &self.token_uri,
                iat: now,
                exp: now + ASSERTION_TTL_SECS,
            },
        )?;
        let body = format!(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion={assertion}"
        );

        let response = self
            .http
            .post(&self.token_uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| CampusMindError::Identity {
                message: format!("token exchange failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CampusMindError::Identity {
                message: format!("token endpoint returned {status}: {body}"),
                source: None,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| CampusMindError::Identity {
            message: format!("invalid token response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(expires_in = token.expires_in, "access token minted");
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}
