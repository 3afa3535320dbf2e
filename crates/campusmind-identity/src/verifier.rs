// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie verification.
//!
//! Session cookies are RS256 JWTs. Signing keys are published as a JWK set
//! and cached for an hour; claims are checked against the project.

use std::collections::HashMap;
use std::time::Duration;

use campusmind_core::CampusMindError;
use campusmind_core::types::{Role, SessionClaims};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::jwt::{self, Unverified};

/// Where the session cookie signing keys are published.
pub const SESSION_KEYS_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/sessionCookiePublicKeys";

const ISSUER_PREFIX: &str = "https://session.firebase.google.com/";

const KEY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Tolerated clock drift when checking `iat` and `exp`.
const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct PublicKey {
    n: Vec<u8>,
    e: Vec<u8>,
}

struct KeyCache {
    keys: HashMap<String, PublicKey>,
    fetched_at: Option<tokio::time::Instant>,
}

/// Raw claims as they appear in a session cookie.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClaims {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    /// Custom claim set for administrators.
    #[serde(default)]
    pub admin: bool,
}

/// Checks issuer, audience, subject and lifetime. Pure, so it is testable
/// without keys.
pub fn validate_claims(
    claims: RawClaims,
    project_id: &str,
    now: i64,
) -> Result<SessionClaims, CampusMindError> {
    let reject = |why: &str| Err(CampusMindError::Unauthenticated(why.to_string()));

    if claims.iss != format!("{ISSUER_PREFIX}{project_id}") {
        return reject("session issued for another project");
    }
    if claims.aud != project_id {
        return reject("session audience mismatch");
    }
    if claims.sub.is_empty() || claims.sub.len() > 128 {
        return reject("session subject is invalid");
    }
    if claims.exp <= now - CLOCK_SKEW_SECS {
        return reject("session expired");
    }
    if claims.iat > now + CLOCK_SKEW_SECS {
        return reject("session issued in the future");
    }

    Ok(SessionClaims {
        uid: claims.sub,
        email: claims.email,
        issued_at: claims.iat,
        expires_at: claims.exp,
        role: if claims.admin { Role::Admin } else { Role::Student },
    })
}

/// Verifies session cookies for one project.
pub struct SessionVerifier {
    http: reqwest::Client,
    keys_url: String,
    project_id: String,
    cache: RwLock<KeyCache>,
}

impl SessionVerifier {
    pub fn new(http: reqwest::Client, keys_url: impl Into<String>, project_id: &str) -> Self {
        Self {
            http,
            keys_url: keys_url.into(),
            project_id: project_id.to_string(),
            cache: RwLock::new(KeyCache {
                keys: HashMap::new(),
                fetched_at: None,
            }),
        }
    }

    pub async fn verify(&self, cookie: &str) -> Result<SessionClaims, CampusMindError> {
        let token = Unverified::parse(cookie)?;
        if token.header.alg != "RS256" {
            return Err(CampusMindError::Unauthenticated(format!(
                "unexpected signing algorithm {}",
                token.header.alg
            )));
        }
        let kid = token
            .header
            .kid
            .clone()
            .ok_or_else(|| CampusMindError::Unauthenticated("session token has no key id".into()))?;

        let claims: RawClaims = {
            self.ensure_fresh(&kid).await?;
            let cache = self.cache.read().await;
            let key = cache.keys.get(&kid).ok_or_else(|| {
                CampusMindError::Unauthenticated("session signed with an unknown key".into())
            })?;
            token.verify(&key.n, &key.e)?
        };
        validate_claims(claims, &self.project_id, chrono::Utc::now().timestamp())
    }

    /// Refetches the key set when it is stale or does not know `kid`.
    async fn ensure_fresh(&self, kid: &str) -> Result<(), CampusMindError> {
        {
            let cache = self.cache.read().await;
            let fresh = cache
                .fetched_at
                .is_some_and(|at| at.elapsed() < KEY_CACHE_TTL);
            if fresh && cache.keys.contains_key(kid) {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if cache.keys.contains_key(kid)
            && cache
                .fetched_at
                .is_some_and(|at| at.elapsed() < KEY_CACHE_TTL)
        {
            return Ok(());
        }

        let set = self.fetch_keys().await?;
        cache.keys = set
            .keys
            .into_iter()
            .filter_map(|k| match (jwt::decode_b64url(&k.n), jwt::decode_b64url(&k.e)) {
                (Ok(n), Ok(e)) => Some((k.kid, PublicKey { n, e })),
                _ => {
                    warn!(kid = %k.kid, "skipping undecodable signing key");
                    None
                }
            })
            .collect();
        cache.fetched_at = Some(tokio::time::Instant::now());
        debug!(keys = cache.keys.len(), "session signing keys refreshed");
        Ok(())
    }

    async fn fetch_keys(&self) -> Result<JwkSet, CampusMindError> {
        let response = self
            .http
            .get(&self.keys_url)
            .send()
            .await
            .map_err(|e| CampusMindError::Identity {
                message: format!("failed to fetch session signing keys: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CampusMindError::Identity {
                message: format!("signing key endpoint returned {status}"),
                source: None,
            });
        }
        response.json().await.map_err(|e| CampusMindError::Identity {
            message: format!("invalid signing key set: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
